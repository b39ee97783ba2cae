//! Goomba NPC.
//!
//! Phases
//! - `Idle`: wanders a Lissajous loop inside its leash and scans for players within the enrage
//!   radius.
//! - `Charge`: wind-up facing the target; lasts the base wind-up plus a jitter drawn from the
//!   goomba's PRNG cursor.
//! - `Enraged`: runs at the target. Contact spills the player's rings and ends the run.
//! - `Cooldown`: holds position facing the last target, then charges again or goes idle.
//! - `Defeated`: frozen until `respawn_at_ms`, then the row is deleted and the chunk slot spawns a
//!   fresh goomba.
//!
//! Determinism
//! - Every live tick advances `rng_cursor` exactly one LCG step, and players are visited in
//!   identity order, so replaying the same ticks over the same rows reproduces the same result.

use std::f32::consts::TAU;

use nalgebra as na;

use crate::error::{CommandError, CommandResult};
use crate::motion::{
    advance_along_yaw, planar, planar_distance_sq, step_on_ground, yaw_from_xz,
};
use crate::rings::{ring_burst, spill_rings};
use crate::rng::{lcg_next, lcg_unit, seed_cursor};
use crate::rows::{GoombaBehavior, GoombaState, PlayerId, PlayerState, RingSource};
use crate::settings::{GoombaSettings, SimSettings, SpawnRules};
use crate::spawn::{SlotEntity, SpawnSite};
use crate::store::{SlotTable, WorldStore};

/// Fraction of the leash radius the wander loop spans.
const WANDER_EXTENT: f32 = 0.8;

/// Lissajous angular rates (radians per second) for the X and Z axes.
const WANDER_RATE_X: f32 = 0.23;
const WANDER_RATE_Z: f32 = 0.31;

/// Slot entity marker for the goomba table.
pub struct Goomba;

impl SlotEntity for Goomba {
    const TABLE: SlotTable = SlotTable::Goomba;

    fn rules(settings: &SimSettings) -> SpawnRules {
        settings.goomba.spawn
    }

    fn exists<S: WorldStore + ?Sized>(store: &S, entity_id: &str) -> bool {
        store.find_goomba(entity_id).is_some()
    }

    fn live<S: WorldStore + ?Sized>(store: &S) -> Vec<(String, String)> {
        store
            .goombas()
            .into_iter()
            .map(|e| (e.goomba_id, e.chunk_key))
            .collect()
    }

    fn spawn<S: WorldStore + ?Sized>(store: &mut S, site: &SpawnSite, settings: &SimSettings) {
        store.put_goomba(new_goomba(site, &settings.goomba));
    }

    fn despawn<S: WorldStore + ?Sized>(store: &mut S, entity_id: &str) {
        store.delete_goomba(entity_id);
    }
}

pub fn new_goomba(site: &SpawnSite, settings: &GoombaSettings) -> GoombaState {
    let y = site.ground.y + settings.ground_offset;
    let cursor = seed_cursor(site.chunk.x, site.chunk.z, site.sequence, settings.spawn.salt);
    GoombaState {
        goomba_id: site.entity_id.clone(),
        chunk_key: site.chunk_key.clone(),
        spawn_x: site.ground.x,
        spawn_y: y,
        spawn_z: site.ground.z,
        x: site.ground.x,
        y,
        z: site.ground.z,
        yaw: 0.0,
        behavior: GoombaBehavior::Idle,
        target_identity: None,
        state_ends_at_ms: site.now_ms,
        rng_cursor: cursor,
        wander_seed: cursor,
        respawn_at_ms: None,
        updated_at_ms: site.now_ms,
    }
}

/// Point on the wander loop at `now_ms`; always within `WANDER_EXTENT * leash_radius` of spawn.
pub fn wander_point(goomba: &GoombaState, leash_radius: f32, now_ms: i64) -> na::Vector2<f32> {
    let phase = lcg_unit(goomba.wander_seed) * TAU;
    // Wrap time so f32 keeps precision on long-lived servers.
    let t = (now_ms.rem_euclid(3_600_000)) as f32 / 1000.0;
    let r = leash_radius * WANDER_EXTENT;
    // Both components are in [-r/sqrt2, r/sqrt2], so the point stays within r.
    let k = r * std::f32::consts::FRAC_1_SQRT_2;
    na::Vector2::new(
        goomba.spawn_x + k * (t * WANDER_RATE_X + phase).sin(),
        goomba.spawn_z + k * (t * WANDER_RATE_Z + 2.0 * phase).sin(),
    )
}

/// Nearest player within `radius` on the XZ plane. Ties go to the lowest identity.
fn nearest_player<'a>(
    players: &'a [PlayerState],
    from: &na::Vector3<f32>,
    radius: f32,
) -> Option<&'a PlayerState> {
    let r_sq = radius * radius;
    players
        .iter()
        .map(|p| (p, planar_distance_sq(from, &p.position())))
        .filter(|(_, d)| *d <= r_sq)
        .min_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.identity.cmp(&b.identity)))
        .map(|(p, _)| p)
}

fn find_target<'a>(players: &'a [PlayerState], id: Option<PlayerId>) -> Option<&'a PlayerState> {
    let id = id?;
    players.iter().find(|p| p.identity == id)
}

fn face(goomba: &mut GoombaState, at: &na::Vector3<f32>) {
    if let Some(yaw) = yaw_from_xz(planar(at) - planar(&goomba.position())) {
        goomba.yaw = yaw;
    }
}

fn set_position(goomba: &mut GoombaState, p: na::Vector3<f32>) {
    goomba.x = p.x;
    goomba.y = p.y;
    goomba.z = p.z;
}

fn start_charge(goomba: &mut GoombaState, target: &PlayerState, settings: &GoombaSettings, now_ms: i64) {
    let jitter = (lcg_unit(goomba.rng_cursor) * settings.charge_jitter_ms as f32) as i64;
    goomba.behavior = GoombaBehavior::Charge;
    goomba.target_identity = Some(target.identity);
    goomba.state_ends_at_ms = now_ms + settings.charge_windup_ms + jitter;
    face(goomba, &target.position());
}

fn go_idle(goomba: &mut GoombaState, now_ms: i64) {
    goomba.behavior = GoombaBehavior::Idle;
    goomba.target_identity = None;
    goomba.state_ends_at_ms = now_ms;
}

fn go_cooldown(goomba: &mut GoombaState, settings: &GoombaSettings, now_ms: i64) {
    goomba.behavior = GoombaBehavior::Cooldown;
    goomba.state_ends_at_ms = now_ms + settings.cooldown_ms;
}

/// Idle movement: follow the wander loop while inside the leash, otherwise head home.
fn wander(goomba: &mut GoombaState, settings: &GoombaSettings, dt_seconds: f32, now_ms: i64) {
    let home = goomba.spawn_position();
    let leash_sq = settings.leash_radius * settings.leash_radius;
    let inside = planar_distance_sq(&home, &goomba.position()) <= leash_sq;

    let (target, speed) = if inside {
        (wander_point(goomba, settings.leash_radius, now_ms), settings.wander_speed)
    } else {
        (planar(&home), settings.run_speed)
    };

    let step = step_on_ground(
        goomba.position(),
        target,
        speed,
        dt_seconds,
        0.0,
        settings.ground_offset,
    );
    set_position(goomba, step.position);
    if let Some(yaw) = step.yaw {
        goomba.yaw = yaw;
    }
}

/// Advances one goomba by `dt_ms`. Returns the players it ran into.
pub fn step_goomba(
    goomba: &mut GoombaState,
    players: &[PlayerState],
    settings: &GoombaSettings,
    dt_ms: i64,
    now_ms: i64,
) -> Vec<PlayerId> {
    let mut victims = Vec::new();
    if goomba.behavior == GoombaBehavior::Defeated {
        return victims;
    }

    goomba.rng_cursor = lcg_next(goomba.rng_cursor);
    let dt = dt_ms.max(0) as f32 / 1000.0;
    let before = goomba.behavior;

    match goomba.behavior {
        GoombaBehavior::Idle => {
            match nearest_player(players, &goomba.position(), settings.enrage_radius) {
                Some(target) => start_charge(goomba, target, settings, now_ms),
                None => wander(goomba, settings, dt, now_ms),
            }
        }
        GoombaBehavior::Charge => {
            if let Some(target) = find_target(players, goomba.target_identity) {
                face(goomba, &target.position());
            }
            if now_ms >= goomba.state_ends_at_ms {
                match nearest_player(players, &goomba.position(), settings.enrage_radius) {
                    Some(target) => {
                        goomba.behavior = GoombaBehavior::Enraged;
                        goomba.target_identity = Some(target.identity);
                        goomba.state_ends_at_ms = now_ms + settings.enraged_duration_ms;
                        face(goomba, &target.position());
                    }
                    None => go_idle(goomba, now_ms),
                }
            }
        }
        GoombaBehavior::Enraged => {
            if let Some(target) = find_target(players, goomba.target_identity) {
                face(goomba, &target.position());
            }
            let p = advance_along_yaw(
                goomba.position(),
                goomba.yaw,
                settings.run_speed,
                dt,
                settings.ground_offset,
            );
            set_position(goomba, p);

            let hit_sq = settings.hit_radius * settings.hit_radius;
            victims.extend(
                players
                    .iter()
                    .filter(|pl| (pl.position() - p).norm_squared() <= hit_sq)
                    .map(|pl| pl.identity),
            );
            if !victims.is_empty() || now_ms >= goomba.state_ends_at_ms {
                go_cooldown(goomba, settings, now_ms);
            }
        }
        GoombaBehavior::Cooldown => {
            if let Some(target) = find_target(players, goomba.target_identity) {
                face(goomba, &target.position());
            }
            if now_ms >= goomba.state_ends_at_ms {
                match nearest_player(players, &goomba.position(), settings.enrage_radius) {
                    Some(target) => start_charge(goomba, target, settings, now_ms),
                    None => go_idle(goomba, now_ms),
                }
            }
        }
        GoombaBehavior::Defeated => {}
    }

    if goomba.behavior != before {
        log::debug!(
            "goomba {} {} -> {}",
            goomba.goomba_id,
            before.as_str(),
            goomba.behavior.as_str()
        );
    }
    goomba.updated_at_ms = now_ms;
    victims
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoombaTickReport {
    pub stepped: usize,
    pub removed: Vec<String>,
    /// `(victim, rings lost)`
    pub spills: Vec<(PlayerId, u32)>,
}

/// Advances every goomba. Defeated goombas past their respawn time are deleted so the
/// coordinator can spawn a replacement.
pub fn tick_goombas<S: WorldStore + ?Sized>(
    store: &mut S,
    settings: &SimSettings,
    dt_ms: i64,
    now_ms: i64,
) -> GoombaTickReport {
    let mut players = store.players();
    players.sort_by(|a, b| a.identity.cmp(&b.identity));
    let mut goombas = store.goombas();
    goombas.sort_by(|a, b| a.goomba_id.cmp(&b.goomba_id));

    let mut report = GoombaTickReport::default();
    for mut goomba in goombas {
        if goomba.behavior == GoombaBehavior::Defeated {
            if goomba.respawn_at_ms.is_some_and(|t| now_ms >= t) {
                store.delete_goomba(&goomba.goomba_id);
                report.removed.push(goomba.goomba_id);
            }
            continue;
        }

        let victims = step_goomba(&mut goomba, &players, &settings.goomba, dt_ms, now_ms);
        for id in victims {
            if let Some(victim) = players.iter().find(|p| p.identity == id) {
                let lost = spill_rings(store, victim, &settings.rings, now_ms);
                report.spills.push((id, lost));
            }
        }
        store.put_goomba(goomba);
        report.stepped += 1;
    }
    report
}

/// Player attack on a goomba. Hitting an already defeated goomba succeeds without effect.
pub fn hit_goomba<S: WorldStore + ?Sized>(
    store: &mut S,
    caller: &PlayerId,
    goomba_id: &str,
    settings: &SimSettings,
    now_ms: i64,
) -> CommandResult {
    let player = store.find_player(caller).ok_or(CommandError::PlayerMissing)?;
    let mut goomba = store
        .find_goomba(goomba_id)
        .ok_or(CommandError::GoombaMissing)?;

    let range = settings.goomba.hit_range;
    if (goomba.position() - player.position()).norm_squared() > range * range {
        return Err(CommandError::GoombaOutOfRange);
    }

    if goomba.behavior == GoombaBehavior::Defeated {
        return Ok(());
    }

    let respawn_at = now_ms + settings.goomba.defeated_respawn_ms;
    goomba.behavior = GoombaBehavior::Defeated;
    goomba.target_identity = None;
    goomba.state_ends_at_ms = respawn_at;
    goomba.respawn_at_ms = Some(respawn_at);
    goomba.updated_at_ms = now_ms;

    ring_burst(
        store,
        &goomba.position(),
        settings.goomba.defeat_ring_count,
        settings.goomba.burst_radius,
        RingSource::Goomba,
        &settings.rings,
        now_ms,
    );

    if let Some(mut slot) = store.find_spawn_slot(SlotTable::Goomba, &goomba.chunk_key) {
        slot.next_spawn_at_ms = respawn_at;
        store.put_spawn_slot(SlotTable::Goomba, slot);
    }

    log::debug!("goomba {goomba_id} defeated by {caller:?}");
    store.put_goomba(goomba);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkCoord;
    use crate::memory_store::MemoryStore;
    use crate::rings::{ring_count, set_ring_count};
    use crate::rows::MotionState;
    use crate::terrain::terrain_height;

    fn site() -> SpawnSite {
        let (x, z) = (40.0, 40.0);
        SpawnSite {
            entity_id: "1:1#0".into(),
            chunk: ChunkCoord::new(1, 1),
            chunk_key: "1:1".into(),
            sequence: 0,
            ground: na::Vector3::new(x, terrain_height(x, z), z),
            now_ms: 0,
        }
    }

    fn player_at(id: u8, x: f32, z: f32) -> PlayerState {
        let mut bytes = [0u8; 32];
        bytes[0] = id;
        PlayerState {
            identity: PlayerId(bytes),
            display_name: format!("p{id}"),
            x,
            y: terrain_height(x, z) + 0.5,
            z,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            planar_speed: 0.0,
            motion_state: MotionState::Idle,
            last_input_seq: 0,
            updated_at_ms: 0,
            last_cast_at_ms: None,
        }
    }

    #[test]
    fn idle_goomba_stays_inside_leash_with_distant_player() {
        let settings = GoombaSettings::default();
        let mut g = new_goomba(&site(), &settings);
        let players = [player_at(1, 60.0, 40.0)]; // 20 units away
        let home = g.spawn_position();
        for i in 1..=400 {
            step_goomba(&mut g, &players, &settings, 50, i * 50);
            assert_eq!(g.behavior, GoombaBehavior::Idle);
            let d = planar_distance_sq(&home, &g.position()).sqrt();
            assert!(d <= settings.leash_radius + 1.0e-3, "tick {i}: {d}");
        }
    }

    #[test]
    fn charge_then_enrage_then_cooldown() {
        let settings = GoombaSettings::default();
        let mut g = new_goomba(&site(), &settings);
        let players = [player_at(1, 50.0, 40.0)];

        step_goomba(&mut g, &players, &settings, 50, 50);
        assert_eq!(g.behavior, GoombaBehavior::Charge);
        let windup = g.state_ends_at_ms - 50;
        assert!((settings.charge_windup_ms..settings.charge_windup_ms + settings.charge_jitter_ms).contains(&windup));

        let charge_ends = g.state_ends_at_ms;
        step_goomba(&mut g, &players, &settings, 50, charge_ends);
        assert_eq!(g.behavior, GoombaBehavior::Enraged);

        // Contact or timeout, whichever comes first, ends the run.
        let ends = g.state_ends_at_ms;
        let mut now = ends - settings.enraged_duration_ms;
        while g.behavior == GoombaBehavior::Enraged {
            now += 50;
            step_goomba(&mut g, &players, &settings, 50, now);
            assert!(now <= ends);
        }
        assert_eq!(g.behavior, GoombaBehavior::Cooldown);
        assert_eq!(g.state_ends_at_ms, now + settings.cooldown_ms);
    }

    #[test]
    fn enraged_contact_spills_rings() {
        let settings = SimSettings::default();
        let mut store = MemoryStore::new();
        let victim = player_at(1, 40.0, 40.5);
        store.put_player(victim.clone());
        set_ring_count(&mut store, &victim.identity, None, 7, 0);

        let mut g = new_goomba(&site(), &settings.goomba);
        g.behavior = GoombaBehavior::Enraged;
        g.target_identity = Some(victim.identity);
        g.state_ends_at_ms = 10_000;
        store.put_goomba(g);

        let report = tick_goombas(&mut store, &settings, 50, 100);
        assert_eq!(report.spills, vec![(victim.identity, 7)]);
        assert_eq!(ring_count(&store, &victim.identity), 0);
        assert_eq!(store.ring_drops.len(), 7);
        assert_eq!(store.goombas["1:1#0"].behavior, GoombaBehavior::Cooldown);
    }

    #[test]
    fn replay_is_deterministic() {
        let settings = GoombaSettings::default();
        let players = [player_at(1, 52.0, 44.0), player_at(2, 30.0, 35.0)];
        let run = || {
            let mut g = new_goomba(&site(), &settings);
            let mut trace = Vec::new();
            for i in 1..=200 {
                step_goomba(&mut g, &players, &settings, 50, i * 50);
                trace.push((g.behavior, g.x.to_bits(), g.z.to_bits(), g.rng_cursor));
            }
            trace
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn hit_is_idempotent_and_bursts_once() {
        let settings = SimSettings::default();
        let mut store = MemoryStore::new();
        let p = player_at(1, 41.0, 40.0);
        store.put_player(p.clone());
        store.put_goomba(new_goomba(&site(), &settings.goomba));

        assert_eq!(hit_goomba(&mut store, &p.identity, "1:1#0", &settings, 1_000), Ok(()));
        assert_eq!(hit_goomba(&mut store, &p.identity, "1:1#0", &settings, 1_010), Ok(()));
        assert_eq!(store.ring_drops.len(), settings.goomba.defeat_ring_count as usize);

        let g = &store.goombas["1:1#0"];
        assert_eq!(g.behavior, GoombaBehavior::Defeated);
        assert_eq!(g.respawn_at_ms, Some(1_000 + settings.goomba.defeated_respawn_ms));
    }

    #[test]
    fn hit_rejections() {
        let settings = SimSettings::default();
        let mut store = MemoryStore::new();
        let p = player_at(1, 100.0, 100.0);
        assert_eq!(
            hit_goomba(&mut store, &p.identity, "1:1#0", &settings, 0),
            Err(CommandError::PlayerMissing)
        );
        store.put_player(p.clone());
        assert_eq!(
            hit_goomba(&mut store, &p.identity, "1:1#0", &settings, 0),
            Err(CommandError::GoombaMissing)
        );
        store.put_goomba(new_goomba(&site(), &settings.goomba));
        assert_eq!(
            hit_goomba(&mut store, &p.identity, "1:1#0", &settings, 0),
            Err(CommandError::GoombaOutOfRange)
        );
    }

    #[test]
    fn wander_phase_comes_from_the_spawn_cursor() {
        let settings = GoombaSettings::default();
        let g = new_goomba(&site(), &settings);
        assert_eq!(g.wander_seed, g.rng_cursor);

        let mut advanced = g.clone();
        for _ in 0..10 {
            advanced.rng_cursor = lcg_next(advanced.rng_cursor);
        }
        assert_eq!(
            wander_point(&advanced, settings.leash_radius, 1_234),
            wander_point(&g, settings.leash_radius, 1_234)
        );

        let mut reseeded = g.clone();
        reseeded.wander_seed = lcg_next(g.wander_seed);
        assert_ne!(
            wander_point(&reseeded, settings.leash_radius, 1_234),
            wander_point(&g, settings.leash_radius, 1_234)
        );
    }

    #[test]
    fn defeated_goomba_is_removed_after_respawn_delay() {
        let settings = SimSettings::default();
        let mut store = MemoryStore::new();
        let mut g = new_goomba(&site(), &settings.goomba);
        g.behavior = GoombaBehavior::Defeated;
        g.respawn_at_ms = Some(6_000);
        store.put_goomba(g.clone());

        let early = tick_goombas(&mut store, &settings, 50, 5_999);
        assert!(early.removed.is_empty());
        // Frozen while defeated.
        assert_eq!(store.goombas["1:1#0"], g);

        let late = tick_goombas(&mut store, &settings, 50, 6_000);
        assert_eq!(late.removed, vec!["1:1#0".to_string()]);
        assert!(store.goombas.is_empty());
    }
}
