//! Ring drops, collection and the per-player ring counters.
//!
//! Drops are short-lived rows scattered by mystery boxes, defeated goombas and
//! players who get hit. Counters live in `PlayerInventory` (current) and
//! `PlayerStats` (high-water mark); both are created lazily.

use std::f32::consts::TAU;

use nalgebra as na;

use crate::constants::{DEFAULT_DISPLAY_NAME, MAX_RING_COUNT};
use crate::error::{CommandError, CommandResult};
use crate::motion::clamp_to_world;
use crate::rng::roll_for;
use crate::rows::{PlayerId, PlayerInventory, PlayerState, PlayerStats, RingDrop, RingSource};
use crate::settings::RingSettings;
use crate::store::WorldStore;
use crate::terrain::terrain_height;

pub fn ring_count<S: WorldStore + ?Sized>(store: &S, identity: &PlayerId) -> u32 {
    store
        .find_inventory(identity)
        .map(|inv| inv.ring_count)
        .unwrap_or(0)
}

/// Sets the inventory to `count` (clamped) and raises the high-water mark when exceeded.
pub fn set_ring_count<S: WorldStore + ?Sized>(
    store: &mut S,
    identity: &PlayerId,
    display_name: Option<&str>,
    count: u32,
    now_ms: i64,
) -> u32 {
    let count = count.min(MAX_RING_COUNT);
    store.put_inventory(PlayerInventory {
        identity: *identity,
        ring_count: count,
        updated_at_ms: now_ms,
    });

    let existing = store.find_stats(identity);
    let created = existing.is_none();
    let mut stats = existing.unwrap_or_else(|| PlayerStats {
        identity: *identity,
        display_name: display_name.unwrap_or(DEFAULT_DISPLAY_NAME).to_string(),
        highest_ring_count: 0,
        updated_at_ms: now_ms,
    });
    if count > stats.highest_ring_count {
        stats.highest_ring_count = count;
        stats.updated_at_ms = now_ms;
        if let Some(name) = display_name {
            stats.display_name = name.to_string();
        }
        store.put_stats(stats);
    } else if created {
        store.put_stats(stats);
    }
    count
}

/// Ground-hugging drop position on a circle around `center`.
fn drop_position(center: &na::Vector3<f32>, angle: f32, radius: f32, hover: f32) -> na::Vector3<f32> {
    let x = center.x + angle.cos() * radius;
    let z = center.z + angle.sin() * radius;
    clamp_to_world(na::Vector3::new(x, terrain_height(x, z) + hover, z))
}

/// Inserts `count` drops evenly spaced on a circle of `radius` around `center`, starting at
/// `angle_offset`. Returns the new ring ids.
#[allow(clippy::too_many_arguments)]
pub fn scatter_drops<S: WorldStore + ?Sized>(
    store: &mut S,
    center: &na::Vector3<f32>,
    count: u32,
    radius: f32,
    angle_offset: f32,
    source: RingSource,
    settings: &RingSettings,
    now_ms: i64,
) -> Vec<u64> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let p = drop_position(center, angle_offset + step * i as f32, radius, settings.hover_height);
            store
                .insert_ring_drop(RingDrop {
                    ring_id: 0,
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    source,
                    collected: false,
                    spawned_at_ms: now_ms,
                    expires_at_ms: now_ms + settings.lifetime_ms,
                })
                .ring_id
        })
        .collect()
}

/// Burst from a mystery box or a defeated goomba.
pub fn ring_burst<S: WorldStore + ?Sized>(
    store: &mut S,
    center: &na::Vector3<f32>,
    count: u32,
    radius: f32,
    source: RingSource,
    settings: &RingSettings,
    now_ms: i64,
) -> Vec<u64> {
    scatter_drops(store, center, count, radius, 0.0, source, settings, now_ms)
}

/// The victim loses every ring; up to `max_spill_rings` are scattered around them.
/// Returns the number of rings lost.
pub fn spill_rings<S: WorldStore + ?Sized>(
    store: &mut S,
    victim: &PlayerState,
    settings: &RingSettings,
    now_ms: i64,
) -> u32 {
    let lost = ring_count(store, &victim.identity);
    if lost == 0 {
        return 0;
    }
    set_ring_count(store, &victim.identity, None, 0, now_ms);

    let angle = roll_for(victim.identity.seed(), now_ms) * TAU;
    let scattered = lost.min(settings.max_spill_rings);
    scatter_drops(
        store,
        &victim.position(),
        scattered,
        settings.spill_radius,
        angle,
        RingSource::Spill,
        settings,
        now_ms,
    );
    log::debug!("player {:?} spilled {lost} rings ({scattered} dropped)", victim.identity);
    lost
}

/// Validates and applies a ring pickup. Returns the caller's new ring count.
///
/// On `RingExpired` the stale drop has already been deleted; hosts should commit that deletion
/// even though the command is rejected.
pub fn collect_ring<S: WorldStore + ?Sized>(
    store: &mut S,
    caller: &PlayerId,
    ring_id: u64,
    settings: &RingSettings,
    now_ms: i64,
) -> CommandResult<u32> {
    let player = store.find_player(caller).ok_or(CommandError::PlayerMissing)?;
    let ring = store
        .find_ring_drop(ring_id)
        .filter(|r| !r.collected)
        .ok_or(CommandError::RingMissing)?;

    if now_ms >= ring.expires_at_ms {
        store.delete_ring_drop(ring_id);
        return Err(CommandError::RingExpired);
    }

    let dist_sq = (ring.position() - player.position()).norm_squared();
    if dist_sq > settings.collect_radius * settings.collect_radius {
        return Err(CommandError::RingOutOfRange);
    }

    store.delete_ring_drop(ring_id);
    let count = ring_count(store, caller).saturating_add(1);
    Ok(set_ring_count(
        store,
        caller,
        Some(&player.display_name),
        count,
        now_ms,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::rows::MotionState;

    fn player(store: &mut MemoryStore, id: u8, x: f32, z: f32) -> PlayerState {
        let mut bytes = [0u8; 32];
        bytes[0] = id;
        let row = PlayerState {
            identity: PlayerId(bytes),
            display_name: format!("p{id}"),
            x,
            y: terrain_height(x, z),
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
        };
        store.put_player(row.clone());
        row
    }

    #[test]
    fn burst_places_drops_on_circle_with_lifetime() {
        let mut store = MemoryStore::new();
        let settings = RingSettings::default();
        let center = na::Vector3::new(10.0, 0.0, 10.0);
        let ids = ring_burst(&mut store, &center, 5, 1.6, RingSource::MysteryBox, &settings, 1_000);
        assert_eq!(ids.len(), 5);
        for id in ids {
            let r = store.find_ring_drop(id).unwrap();
            let d = ((r.x - 10.0).powi(2) + (r.z - 10.0).powi(2)).sqrt();
            assert!((d - 1.6).abs() < 1.0e-3);
            assert_eq!(r.expires_at_ms, 1_000 + settings.lifetime_ms);
            assert_eq!(r.source, RingSource::MysteryBox);
        }
    }

    #[test]
    fn spill_empties_inventory_and_caps_drops() {
        let mut store = MemoryStore::new();
        let settings = RingSettings::default();
        let victim = player(&mut store, 1, 0.0, 0.0);
        set_ring_count(&mut store, &victim.identity, None, 40, 0);

        assert_eq!(spill_rings(&mut store, &victim, &settings, 500), 40);
        assert_eq!(ring_count(&store, &victim.identity), 0);
        assert_eq!(store.ring_drops.len(), settings.max_spill_rings as usize);
        // High-water mark survives the loss.
        assert_eq!(store.find_stats(&victim.identity).unwrap().highest_ring_count, 40);
    }

    #[test]
    fn spill_with_no_rings_drops_nothing() {
        let mut store = MemoryStore::new();
        let victim = player(&mut store, 1, 0.0, 0.0);
        assert_eq!(spill_rings(&mut store, &victim, &RingSettings::default(), 0), 0);
        assert!(store.ring_drops.is_empty());
    }

    #[test]
    fn collect_checks_in_order() {
        let mut store = MemoryStore::new();
        let settings = RingSettings::default();
        let stranger = PlayerId([9; 32]);
        assert_eq!(
            collect_ring(&mut store, &stranger, 1, &settings, 0),
            Err(CommandError::PlayerMissing)
        );

        let p = player(&mut store, 1, 0.0, 0.0);
        assert_eq!(
            collect_ring(&mut store, &p.identity, 1, &settings, 0),
            Err(CommandError::RingMissing)
        );

        let far = ring_burst(&mut store, &na::Vector3::new(20.0, 0.0, 0.0), 1, 0.0, RingSource::Goomba, &settings, 0)[0];
        assert_eq!(
            collect_ring(&mut store, &p.identity, far, &settings, 10),
            Err(CommandError::RingOutOfRange)
        );
        assert_eq!(
            collect_ring(&mut store, &p.identity, far, &settings, settings.lifetime_ms),
            Err(CommandError::RingExpired)
        );
        assert!(store.find_ring_drop(far).is_none());
    }

    #[test]
    fn collect_increments_and_clamps() {
        let mut store = MemoryStore::new();
        let settings = RingSettings::default();
        let p = player(&mut store, 1, 0.0, 0.0);
        set_ring_count(&mut store, &p.identity, None, MAX_RING_COUNT, 0);

        let id = ring_burst(&mut store, &p.position(), 1, 0.5, RingSource::Spill, &settings, 0)[0];
        assert_eq!(collect_ring(&mut store, &p.identity, id, &settings, 1), Ok(MAX_RING_COUNT));
        assert!(store.find_ring_drop(id).is_none());
        // Second attempt on the same ring.
        assert_eq!(
            collect_ring(&mut store, &p.identity, id, &settings, 2),
            Err(CommandError::RingMissing)
        );
    }
}
