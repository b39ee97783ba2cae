/*!
Runtime tunables for every simulation component.

`SimSettings::default()` holds the shipped values. The server mirrors these into a
single-row `sim_settings` table so clients can read the exact limits the server
enforces (cooldowns, ranges, lifetimes) and predict outcomes locally.

Notes
- Distances are world units, durations are milliseconds, speeds are units per second.
- Squared bands (`*_sq`) are compared against squared lengths so validators never
  take a square root before a vector is known to be sane.
*/

/// Chunk activation and per-kind slot spawning rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRules {
    /// Deterministic salt fed to the positional hash for this entity kind.
    pub salt: u32,
    /// Chunks whose eligibility roll is `>= threshold` host one slot.
    pub threshold: f32,
    /// Never spawn in chunk `(0, 0)`.
    pub exclude_origin: bool,
    /// Delay between an entity leaving its slot and the next spawn.
    pub cooldown_ms: i64,
}

/// Soft anti-cheat limits for position updates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementSettings {
    /// Fastest legal planar speed.
    pub max_speed: f32,
    /// Flat allowance added to every planar step (absorbs jitter and rounding).
    pub leeway: f32,
    /// Largest vertical change accepted in a single update.
    pub max_vertical_step: f32,
}

/// Ranged attack validation limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireballSettings {
    pub cast_cooldown_ms: i64,
    pub ttl_ms: i64,
    pub min_direction_len_sq: f32,
    pub max_direction_len_sq: f32,
    pub min_spawn_distance_sq: f32,
    pub max_spawn_distance_sq: f32,
}

/// Ring drop lifetime, pickup and scatter geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingSettings {
    pub lifetime_ms: i64,
    pub collect_radius: f32,
    pub hover_height: f32,
    pub max_spill_rings: u32,
    pub spill_radius: f32,
}

/// Goomba behavior tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoombaSettings {
    pub spawn: SpawnRules,
    pub leash_radius: f32,
    pub enrage_radius: f32,
    pub wander_speed: f32,
    pub run_speed: f32,
    pub hit_radius: f32,
    /// Distance within which a player may stomp/hit a goomba.
    pub hit_range: f32,
    pub charge_windup_ms: i64,
    pub charge_jitter_ms: i64,
    pub enraged_duration_ms: i64,
    pub cooldown_ms: i64,
    pub defeated_respawn_ms: i64,
    pub defeat_ring_count: u32,
    pub burst_radius: f32,
    /// Height of the goomba's origin above the terrain.
    pub ground_offset: f32,
}

/// Mystery box tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MysteryBoxSettings {
    pub spawn: SpawnRules,
    /// Horizontal-only hit range.
    pub hit_range: f32,
    pub despawn_delay_ms: i64,
    pub ring_burst_count: u32,
    pub burst_radius: f32,
    /// Height of the box above the terrain.
    pub float_height: f32,
}

/// Rate limits for the opportunistic ticks driven by player commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickSettings {
    /// Chebyshev radius (in chunks) kept active around every connected player.
    pub active_chunk_radius: i32,
    pub goomba_min_interval_ms: i64,
    pub mystery_box_min_interval_ms: i64,
    pub prune_min_interval_ms: i64,
    /// Largest simulated step a single goomba tick may take.
    pub max_tick_dt_ms: i64,
}

/// Chat limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChatSettings {
    pub ttl_ms: i64,
}

/// Every tunable used by the command handlers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimSettings {
    pub movement: MovementSettings,
    pub fireball: FireballSettings,
    pub rings: RingSettings,
    pub goomba: GoombaSettings,
    pub mystery_box: MysteryBoxSettings,
    pub ticks: TickSettings,
    pub chat: ChatSettings,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            max_speed: 40.0,
            leeway: 1.5,
            max_vertical_step: 6.0,
        }
    }
}

impl Default for FireballSettings {
    fn default() -> Self {
        Self {
            cast_cooldown_ms: 220,
            ttl_ms: 1_600,
            // |dir| in [0.5, 2.0]
            min_direction_len_sq: 0.25,
            max_direction_len_sq: 4.0,
            // origin within 3 units of the caster
            min_spawn_distance_sq: 0.0,
            max_spawn_distance_sq: 9.0,
        }
    }
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            lifetime_ms: 12_000,
            collect_radius: 2.5,
            hover_height: 1.0,
            max_spill_rings: 12,
            spill_radius: 2.2,
        }
    }
}

impl Default for GoombaSettings {
    fn default() -> Self {
        Self {
            spawn: SpawnRules {
                salt: 0x6006_BA00,
                threshold: 0.72,
                exclude_origin: true,
                cooldown_ms: 8_000,
            },
            leash_radius: 6.0,
            enrage_radius: 16.0,
            wander_speed: 1.6,
            run_speed: 9.0,
            hit_radius: 1.4,
            hit_range: 4.5,
            charge_windup_ms: 650,
            charge_jitter_ms: 250,
            enraged_duration_ms: 1_800,
            cooldown_ms: 1_200,
            defeated_respawn_ms: 6_000,
            defeat_ring_count: 3,
            burst_radius: 1.4,
            ground_offset: 0.5,
        }
    }
}

impl Default for MysteryBoxSettings {
    fn default() -> Self {
        Self {
            spawn: SpawnRules {
                salt: 0xB0C5_0000,
                threshold: 0.80,
                exclude_origin: false,
                cooldown_ms: 15_000,
            },
            hit_range: 3.2,
            despawn_delay_ms: 2_500,
            ring_burst_count: 5,
            burst_radius: 1.6,
            float_height: 2.5,
        }
    }
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            active_chunk_radius: 2,
            goomba_min_interval_ms: 50,
            mystery_box_min_interval_ms: 100,
            prune_min_interval_ms: 1_000,
            max_tick_dt_ms: 250,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self { ttl_ms: 15_000 }
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            movement: MovementSettings::default(),
            fireball: FireballSettings::default(),
            rings: RingSettings::default(),
            goomba: GoombaSettings::default(),
            mystery_box: MysteryBoxSettings::default(),
            ticks: TickSettings::default(),
            chat: ChatSettings::default(),
        }
    }
}
