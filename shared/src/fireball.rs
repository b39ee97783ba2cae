//! Fireball cast validation.
//!
//! Checks run in a fixed order and every rejection leaves the store untouched:
//! player, numeric payload, cooldown, live fireball cap, direction length, spawn distance.
//! The cap equals the caster's ring count; casting itself does not spend rings.

use nalgebra as na;

use crate::error::{CommandError, CommandResult};
use crate::rings::ring_count;
use crate::rows::{FireballEvent, PlayerId};
use crate::settings::FireballSettings;
use crate::store::WorldStore;

fn all_finite(v: &na::Vector3<f32>) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Live (non-expired) fireballs owned by `owner`, counting at most `cap`.
pub fn live_fireballs<S: WorldStore + ?Sized>(
    store: &S,
    owner: &PlayerId,
    cap: u32,
    now_ms: i64,
) -> u32 {
    store
        .fireballs_owned_by(owner)
        .filter(|f| f.expires_at_ms > now_ms)
        .take(cap as usize)
        .count() as u32
}

pub fn cast_fireball<S: WorldStore + ?Sized>(
    store: &mut S,
    caller: &PlayerId,
    origin: na::Vector3<f32>,
    direction: na::Vector3<f32>,
    settings: &FireballSettings,
    now_ms: i64,
) -> CommandResult<FireballEvent> {
    let mut player = store.find_player(caller).ok_or(CommandError::PlayerMissing)?;

    if !all_finite(&origin) || !all_finite(&direction) {
        log::warn!("non-finite fireball payload from {caller:?}");
        return Err(CommandError::InvalidNumericPayload);
    }

    if let Some(last) = player.last_cast_at_ms {
        if now_ms - last < settings.cast_cooldown_ms {
            return Err(CommandError::CastCooldown);
        }
    }

    let cap = ring_count(store, caller);
    if live_fireballs(store, caller, cap, now_ms) >= cap {
        return Err(CommandError::FireballLimitReached);
    }

    let len_sq = direction.norm_squared();
    if !(settings.min_direction_len_sq..=settings.max_direction_len_sq).contains(&len_sq) {
        return Err(CommandError::InvalidDirection);
    }

    let offset_sq = (origin - player.position()).norm_squared();
    if !(settings.min_spawn_distance_sq..=settings.max_spawn_distance_sq).contains(&offset_sq) {
        return Err(CommandError::InvalidSpawnDistance);
    }

    let dir = direction / len_sq.sqrt();
    let event = store.insert_fireball(FireballEvent {
        event_id: 0,
        owner_identity: *caller,
        origin_x: origin.x,
        origin_y: origin.y,
        origin_z: origin.z,
        dir_x: dir.x,
        dir_y: dir.y,
        dir_z: dir.z,
        created_at_ms: now_ms,
        expires_at_ms: now_ms + settings.ttl_ms,
    });

    player.last_cast_at_ms = Some(now_ms);
    store.put_player(player);
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::rings::set_ring_count;
    use crate::rows::{MotionState, PlayerState};

    fn setup(rings: u32) -> (MemoryStore, PlayerId) {
        let mut store = MemoryStore::new();
        let id = PlayerId([3; 32]);
        store.put_player(PlayerState {
            identity: id,
            display_name: "caster".into(),
            x: 0.0,
            y: 1.0,
            z: 0.0,
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
        });
        set_ring_count(&mut store, &id, None, rings, 0);
        (store, id)
    }

    fn origin() -> na::Vector3<f32> {
        na::Vector3::new(0.0, 1.5, -1.0)
    }

    fn forward() -> na::Vector3<f32> {
        na::Vector3::new(0.0, 0.0, -1.0)
    }

    #[test]
    fn cast_inserts_normalized_event_and_keeps_rings() {
        let (mut store, id) = setup(3);
        let s = FireballSettings::default();
        let ev = cast_fireball(&mut store, &id, origin(), forward() * 1.5, &s, 1_000).unwrap();
        assert!((ev.dir_z + 1.0).abs() < 1.0e-6);
        assert_eq!(ev.expires_at_ms, 1_000 + s.ttl_ms);
        assert_eq!(ring_count(&store, &id), 3);
        assert_eq!(store.players[&id].last_cast_at_ms, Some(1_000));
    }

    #[test]
    fn short_direction_is_rejected_without_mutation() {
        let (mut store, id) = setup(3);
        let s = FireballSettings::default();
        let before = store.clone();
        let r = cast_fireball(&mut store, &id, origin(), forward() * 0.3, &s, 1_000);
        assert_eq!(r, Err(CommandError::InvalidDirection));
        assert!(store.fireballs.is_empty());
        assert_eq!(store.players, before.players);
    }

    #[test]
    fn rejections_in_order() {
        let s = FireballSettings::default();
        let (mut store, id) = setup(1);

        assert_eq!(
            cast_fireball(&mut store, &PlayerId([0; 32]), origin(), forward(), &s, 0),
            Err(CommandError::PlayerMissing)
        );
        // Non-finite beats every later check.
        assert_eq!(
            cast_fireball(&mut store, &id, origin(), na::Vector3::new(f32::NAN, 0.0, 0.0), &s, 0),
            Err(CommandError::InvalidNumericPayload)
        );
        cast_fireball(&mut store, &id, origin(), forward(), &s, 0).unwrap();
        assert_eq!(
            cast_fireball(&mut store, &id, origin(), forward(), &s, 100),
            Err(CommandError::CastCooldown)
        );
        // One ring allows one live fireball.
        assert_eq!(
            cast_fireball(&mut store, &id, origin(), forward(), &s, 300),
            Err(CommandError::FireballLimitReached)
        );
        // Once it expires the slot frees up; a far origin is then the failing check.
        assert_eq!(
            cast_fireball(&mut store, &id, na::Vector3::new(10.0, 1.0, 0.0), forward(), &s, s.ttl_ms),
            Err(CommandError::InvalidSpawnDistance)
        );
    }

    #[test]
    fn no_rings_no_fireballs() {
        let (mut store, id) = setup(0);
        assert_eq!(
            cast_fireball(&mut store, &id, origin(), forward(), &FireballSettings::default(), 0),
            Err(CommandError::FireballLimitReached)
        );
    }

    #[test]
    fn live_count_never_exceeds_ring_count() {
        let (mut store, id) = setup(4);
        let s = FireballSettings::default();
        let mut now = 0;
        for _ in 0..40 {
            let _ = cast_fireball(&mut store, &id, origin(), forward(), &s, now);
            let live = store
                .fireballs
                .values()
                .filter(|f| f.expires_at_ms > now)
                .count();
            assert!(live <= 4);
            now += s.cast_cooldown_ms;
        }
    }
}
