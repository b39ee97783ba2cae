use shared::settings::*;
use spacetimedb::*;

/// Simulation tunables shared by server and clients.
///
/// A single-row table (`id = 1`) seeded by `init`. Every reducer reads it, and clients
/// subscribe to it to predict cooldowns, ranges and lifetimes locally.
///
/// Notes
/// - Distances are world units, durations milliseconds, speeds units per second.
/// - `*_sq` fields are squared lengths.
#[table(name = sim_settings, public)]
#[derive(Clone, Debug)]
pub struct SimSettingsRow {
    /// Unique id (primary key). Use a single row with `id = 1`.
    #[primary_key]
    pub id: u32,

    // Movement reconciliation.
    pub max_speed: f32,
    pub movement_leeway: f32,
    pub max_vertical_step: f32,

    // Fireballs.
    pub cast_cooldown_ms: i64,
    pub fireball_ttl_ms: i64,
    pub min_direction_len_sq: f32,
    pub max_direction_len_sq: f32,
    pub min_spawn_distance_sq: f32,
    pub max_spawn_distance_sq: f32,

    // Rings.
    pub ring_lifetime_ms: i64,
    pub ring_collect_radius: f32,
    pub ring_hover_height: f32,
    pub max_spill_rings: u32,
    pub spill_radius: f32,

    // Goombas.
    pub goomba_spawn_salt: u32,
    pub goomba_spawn_threshold: f32,
    pub goomba_exclude_origin: bool,
    pub goomba_respawn_cooldown_ms: i64,
    pub goomba_leash_radius: f32,
    pub goomba_enrage_radius: f32,
    pub goomba_wander_speed: f32,
    pub goomba_run_speed: f32,
    pub goomba_hit_radius: f32,
    pub goomba_hit_range: f32,
    pub goomba_charge_windup_ms: i64,
    pub goomba_charge_jitter_ms: i64,
    pub goomba_enraged_duration_ms: i64,
    pub goomba_cooldown_ms: i64,
    pub goomba_defeated_respawn_ms: i64,
    pub goomba_defeat_ring_count: u32,
    pub goomba_burst_radius: f32,
    pub goomba_ground_offset: f32,

    // Mystery boxes.
    pub mystery_box_spawn_salt: u32,
    pub mystery_box_spawn_threshold: f32,
    pub mystery_box_exclude_origin: bool,
    pub mystery_box_respawn_cooldown_ms: i64,
    pub mystery_box_hit_range: f32,
    pub mystery_box_despawn_delay_ms: i64,
    pub mystery_box_ring_burst_count: u32,
    pub mystery_box_burst_radius: f32,
    pub mystery_box_float_height: f32,

    // Opportunistic ticks.
    pub active_chunk_radius: i32,
    pub goomba_min_interval_ms: i64,
    pub mystery_box_min_interval_ms: i64,
    pub prune_min_interval_ms: i64,
    pub max_tick_dt_ms: i64,

    // Chat.
    pub chat_ttl_ms: i64,
}

impl SimSettingsRow {
    pub fn from_settings(id: u32, s: &SimSettings) -> Self {
        Self {
            id,
            max_speed: s.movement.max_speed,
            movement_leeway: s.movement.leeway,
            max_vertical_step: s.movement.max_vertical_step,
            cast_cooldown_ms: s.fireball.cast_cooldown_ms,
            fireball_ttl_ms: s.fireball.ttl_ms,
            min_direction_len_sq: s.fireball.min_direction_len_sq,
            max_direction_len_sq: s.fireball.max_direction_len_sq,
            min_spawn_distance_sq: s.fireball.min_spawn_distance_sq,
            max_spawn_distance_sq: s.fireball.max_spawn_distance_sq,
            ring_lifetime_ms: s.rings.lifetime_ms,
            ring_collect_radius: s.rings.collect_radius,
            ring_hover_height: s.rings.hover_height,
            max_spill_rings: s.rings.max_spill_rings,
            spill_radius: s.rings.spill_radius,
            goomba_spawn_salt: s.goomba.spawn.salt,
            goomba_spawn_threshold: s.goomba.spawn.threshold,
            goomba_exclude_origin: s.goomba.spawn.exclude_origin,
            goomba_respawn_cooldown_ms: s.goomba.spawn.cooldown_ms,
            goomba_leash_radius: s.goomba.leash_radius,
            goomba_enrage_radius: s.goomba.enrage_radius,
            goomba_wander_speed: s.goomba.wander_speed,
            goomba_run_speed: s.goomba.run_speed,
            goomba_hit_radius: s.goomba.hit_radius,
            goomba_hit_range: s.goomba.hit_range,
            goomba_charge_windup_ms: s.goomba.charge_windup_ms,
            goomba_charge_jitter_ms: s.goomba.charge_jitter_ms,
            goomba_enraged_duration_ms: s.goomba.enraged_duration_ms,
            goomba_cooldown_ms: s.goomba.cooldown_ms,
            goomba_defeated_respawn_ms: s.goomba.defeated_respawn_ms,
            goomba_defeat_ring_count: s.goomba.defeat_ring_count,
            goomba_burst_radius: s.goomba.burst_radius,
            goomba_ground_offset: s.goomba.ground_offset,
            mystery_box_spawn_salt: s.mystery_box.spawn.salt,
            mystery_box_spawn_threshold: s.mystery_box.spawn.threshold,
            mystery_box_exclude_origin: s.mystery_box.spawn.exclude_origin,
            mystery_box_respawn_cooldown_ms: s.mystery_box.spawn.cooldown_ms,
            mystery_box_hit_range: s.mystery_box.hit_range,
            mystery_box_despawn_delay_ms: s.mystery_box.despawn_delay_ms,
            mystery_box_ring_burst_count: s.mystery_box.ring_burst_count,
            mystery_box_burst_radius: s.mystery_box.burst_radius,
            mystery_box_float_height: s.mystery_box.float_height,
            active_chunk_radius: s.ticks.active_chunk_radius,
            goomba_min_interval_ms: s.ticks.goomba_min_interval_ms,
            mystery_box_min_interval_ms: s.ticks.mystery_box_min_interval_ms,
            prune_min_interval_ms: s.ticks.prune_min_interval_ms,
            max_tick_dt_ms: s.ticks.max_tick_dt_ms,
            chat_ttl_ms: s.chat.ttl_ms,
        }
    }

    pub fn to_settings(&self) -> SimSettings {
        SimSettings {
            movement: MovementSettings {
                max_speed: self.max_speed,
                leeway: self.movement_leeway,
                max_vertical_step: self.max_vertical_step,
            },
            fireball: FireballSettings {
                cast_cooldown_ms: self.cast_cooldown_ms,
                ttl_ms: self.fireball_ttl_ms,
                min_direction_len_sq: self.min_direction_len_sq,
                max_direction_len_sq: self.max_direction_len_sq,
                min_spawn_distance_sq: self.min_spawn_distance_sq,
                max_spawn_distance_sq: self.max_spawn_distance_sq,
            },
            rings: RingSettings {
                lifetime_ms: self.ring_lifetime_ms,
                collect_radius: self.ring_collect_radius,
                hover_height: self.ring_hover_height,
                max_spill_rings: self.max_spill_rings,
                spill_radius: self.spill_radius,
            },
            goomba: GoombaSettings {
                spawn: SpawnRules {
                    salt: self.goomba_spawn_salt,
                    threshold: self.goomba_spawn_threshold,
                    exclude_origin: self.goomba_exclude_origin,
                    cooldown_ms: self.goomba_respawn_cooldown_ms,
                },
                leash_radius: self.goomba_leash_radius,
                enrage_radius: self.goomba_enrage_radius,
                wander_speed: self.goomba_wander_speed,
                run_speed: self.goomba_run_speed,
                hit_radius: self.goomba_hit_radius,
                hit_range: self.goomba_hit_range,
                charge_windup_ms: self.goomba_charge_windup_ms,
                charge_jitter_ms: self.goomba_charge_jitter_ms,
                enraged_duration_ms: self.goomba_enraged_duration_ms,
                cooldown_ms: self.goomba_cooldown_ms,
                defeated_respawn_ms: self.goomba_defeated_respawn_ms,
                defeat_ring_count: self.goomba_defeat_ring_count,
                burst_radius: self.goomba_burst_radius,
                ground_offset: self.goomba_ground_offset,
            },
            mystery_box: MysteryBoxSettings {
                spawn: SpawnRules {
                    salt: self.mystery_box_spawn_salt,
                    threshold: self.mystery_box_spawn_threshold,
                    exclude_origin: self.mystery_box_exclude_origin,
                    cooldown_ms: self.mystery_box_respawn_cooldown_ms,
                },
                hit_range: self.mystery_box_hit_range,
                despawn_delay_ms: self.mystery_box_despawn_delay_ms,
                ring_burst_count: self.mystery_box_ring_burst_count,
                burst_radius: self.mystery_box_burst_radius,
                float_height: self.mystery_box_float_height,
            },
            ticks: TickSettings {
                active_chunk_radius: self.active_chunk_radius,
                goomba_min_interval_ms: self.goomba_min_interval_ms,
                mystery_box_min_interval_ms: self.mystery_box_min_interval_ms,
                prune_min_interval_ms: self.prune_min_interval_ms,
                max_tick_dt_ms: self.max_tick_dt_ms,
            },
            chat: ChatSettings {
                ttl_ms: self.chat_ttl_ms,
            },
        }
    }
}
