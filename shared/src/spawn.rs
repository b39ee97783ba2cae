//! Chunk spawn coordinator.
//!
//! Each entity kind owns one slot table keyed by chunk. A chunk is *eligible* for a kind when its
//! positional hash clears the kind's threshold; eligible chunks near any player are *active* and
//! keep at most one live entity in their slot.
//!
//! Per pass, for each eligible active chunk:
//! - no slot row: create one and spawn immediately with sequence `0`;
//! - slot references an entity that no longer exists: clear the reference;
//! - slot is empty and `now >= next_spawn_at_ms`: spawn at the sequence's sample point, bump the
//!   sequence and push `next_spawn_at_ms` out by the kind's cooldown;
//! - otherwise nothing.
//!
//! Live entities whose chunk dropped out of the active set are despawned and their slot reference
//! cleared. The pass walks the live entities, not the slot tables, which keep a row for every
//! chunk ever visited. The sequence and timer survive, so a chunk that comes back respawns as
//! soon as its cooldown allows.
//!
//! Chunks whose inset spawn area is not fully inside the world box never host a slot.

use nalgebra as na;

use crate::chunk::ChunkCoord;
use crate::constants::{CHUNK_SIZE, SPAWN_EDGE_MARGIN, WORLD_HALF_EXTENT};
use crate::motion::clamp_to_world;
use crate::rng::{positional_hash, positional_hash_lane};
use crate::rows::ChunkSpawnState;
use crate::settings::{SimSettings, SpawnRules};
use crate::store::{SlotTable, WorldStore};
use crate::terrain::terrain_height;

/// Where and when a slot entity is being spawned.
#[derive(Clone, Debug)]
pub struct SpawnSite {
    pub entity_id: String,
    pub chunk: ChunkCoord,
    pub chunk_key: String,
    pub sequence: u32,
    /// Ground point (terrain height, no offset).
    pub ground: na::Vector3<f32>,
    pub now_ms: i64,
}

/// An entity kind managed by the coordinator.
pub trait SlotEntity {
    const TABLE: SlotTable;

    fn rules(settings: &SimSettings) -> SpawnRules;
    fn exists<S: WorldStore + ?Sized>(store: &S, entity_id: &str) -> bool;
    /// `(entity_id, chunk_key)` of every live entity of this kind.
    fn live<S: WorldStore + ?Sized>(store: &S) -> Vec<(String, String)>;
    fn spawn<S: WorldStore + ?Sized>(store: &mut S, site: &SpawnSite, settings: &SimSettings);
    fn despawn<S: WorldStore + ?Sized>(store: &mut S, entity_id: &str);
}

/// `"<chunkKey>#<sequence>"`
pub fn entity_id(chunk_key: &str, sequence: u32) -> String {
    format!("{chunk_key}#{sequence}")
}

/// Whether the chunk's inset spawn area lies entirely inside the world box.
pub fn spawn_area_in_world(chunk: ChunkCoord) -> bool {
    let (min_x, min_z) = chunk.min_corner();
    let inside = |min: f32| {
        min + SPAWN_EDGE_MARGIN >= -WORLD_HALF_EXTENT
            && min + CHUNK_SIZE - SPAWN_EDGE_MARGIN <= WORLD_HALF_EXTENT
    };
    inside(min_x) && inside(min_z)
}

pub fn is_eligible(chunk: ChunkCoord, rules: &SpawnRules) -> bool {
    if rules.exclude_origin && chunk == ChunkCoord::ORIGIN {
        return false;
    }
    if !spawn_area_in_world(chunk) {
        return false;
    }
    positional_hash(chunk.x, chunk.z, 0, rules.salt) >= rules.threshold
}

/// Deterministic spawn point for `(chunk, sequence)`, inset from the chunk edges and resting on
/// the terrain.
pub fn sample_spawn_point(chunk: ChunkCoord, sequence: u32, salt: u32) -> na::Vector3<f32> {
    let u = positional_hash_lane(chunk.x, chunk.z, sequence, salt, 1);
    let v = positional_hash_lane(chunk.x, chunk.z, sequence, salt, 2);
    let span = CHUNK_SIZE - 2.0 * SPAWN_EDGE_MARGIN;
    let (min_x, min_z) = chunk.min_corner();
    let x = min_x + SPAWN_EDGE_MARGIN + u * span;
    let z = min_z + SPAWN_EDGE_MARGIN + v * span;
    let p = clamp_to_world(na::Vector3::new(x, 0.0, z));
    clamp_to_world(na::Vector3::new(p.x, terrain_height(p.x, p.z), p.z))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorReport {
    pub spawned: Vec<String>,
    pub despawned: Vec<String>,
}

/// One coordinator pass for entity kind `E` over the sorted `active` chunk set.
pub fn run_coordinator<E, S>(
    store: &mut S,
    settings: &SimSettings,
    active: &[ChunkCoord],
    now_ms: i64,
) -> CoordinatorReport
where
    E: SlotEntity,
    S: WorldStore + ?Sized,
{
    let rules = E::rules(settings);
    let mut report = CoordinatorReport::default();

    let mut live = E::live(store);
    live.sort();
    for (id, chunk_key) in live {
        let still_active = ChunkCoord::parse_key(&chunk_key)
            .is_some_and(|chunk| active.binary_search(&chunk).is_ok());
        if still_active {
            continue;
        }

        E::despawn(store, &id);
        if let Some(mut slot) = store.find_spawn_slot(E::TABLE, &chunk_key) {
            if slot.active_entity_id.as_deref() == Some(id.as_str()) {
                slot.active_entity_id = None;
                store.put_spawn_slot(E::TABLE, slot);
            }
        }
        report.despawned.push(id);
    }

    for &chunk in active {
        if !is_eligible(chunk, &rules) {
            continue;
        }

        let key = chunk.key();
        let (mut slot, mut dirty) = match store.find_spawn_slot(E::TABLE, &key) {
            Some(slot) => (slot, false),
            None => (
                ChunkSpawnState {
                    chunk_key: key.clone(),
                    chunk_x: chunk.x,
                    chunk_z: chunk.z,
                    next_spawn_at_ms: now_ms,
                    spawn_sequence: 0,
                    active_entity_id: None,
                },
                true,
            ),
        };

        if let Some(id) = &slot.active_entity_id {
            if E::exists(store, id) {
                continue;
            }
            slot.active_entity_id = None;
            dirty = true;
        }

        if now_ms >= slot.next_spawn_at_ms {
            let sequence = slot.spawn_sequence;
            let site = SpawnSite {
                entity_id: entity_id(&key, sequence),
                chunk,
                chunk_key: key.clone(),
                sequence,
                ground: sample_spawn_point(chunk, sequence, rules.salt),
                now_ms,
            };
            E::spawn(store, &site, settings);
            log::debug!("spawned {} in chunk {key}", site.entity_id);

            slot.spawn_sequence = sequence.wrapping_add(1);
            slot.next_spawn_at_ms = now_ms + rules.cooldown_ms;
            slot.active_entity_id = Some(site.entity_id.clone());
            report.spawned.push(site.entity_id);
            dirty = true;
        }

        if dirty {
            store.put_spawn_slot(E::TABLE, slot);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::active_chunks;
    use crate::memory_store::MemoryStore;
    use crate::rows::{MysteryBoxPhase, MysteryBoxState};

    /// Minimal kind backed by the mystery box table.
    struct Marker;

    impl SlotEntity for Marker {
        const TABLE: SlotTable = SlotTable::MysteryBox;

        fn rules(_: &SimSettings) -> SpawnRules {
            SpawnRules {
                salt: 17,
                threshold: 0.0,
                exclude_origin: true,
                cooldown_ms: 1_000,
            }
        }

        fn exists<S: WorldStore + ?Sized>(store: &S, entity_id: &str) -> bool {
            store.find_mystery_box(entity_id).is_some()
        }

        fn live<S: WorldStore + ?Sized>(store: &S) -> Vec<(String, String)> {
            store
                .mystery_boxes()
                .into_iter()
                .map(|b| (b.mystery_box_id, b.chunk_key))
                .collect()
        }

        fn spawn<S: WorldStore + ?Sized>(store: &mut S, site: &SpawnSite, _: &SimSettings) {
            store.put_mystery_box(MysteryBoxState {
                mystery_box_id: site.entity_id.clone(),
                chunk_key: site.chunk_key.clone(),
                x: site.ground.x,
                y: site.ground.y,
                z: site.ground.z,
                phase: MysteryBoxPhase::Ready,
                depleted_at_ms: None,
                despawn_at_ms: None,
            });
        }

        fn despawn<S: WorldStore + ?Sized>(store: &mut S, entity_id: &str) {
            store.delete_mystery_box(entity_id);
        }
    }

    fn one_chunk() -> Vec<ChunkCoord> {
        vec![ChunkCoord::new(1, 1)]
    }

    #[test]
    fn sample_spawn_point_is_pure_and_inset() {
        let c = ChunkCoord::new(-2, 5);
        let a = sample_spawn_point(c, 4, 99);
        assert_eq!(a, sample_spawn_point(c, 4, 99));
        let (min_x, min_z) = c.min_corner();
        assert!(a.x >= min_x + SPAWN_EDGE_MARGIN && a.x <= min_x + CHUNK_SIZE - SPAWN_EDGE_MARGIN);
        assert!(a.z >= min_z + SPAWN_EDGE_MARGIN && a.z <= min_z + CHUNK_SIZE - SPAWN_EDGE_MARGIN);
        assert_eq!(a.y, terrain_height(a.x, a.z));
        assert_ne!(a, sample_spawn_point(c, 5, 99));
    }

    #[test]
    fn origin_exclusion() {
        let rules = Marker::rules(&SimSettings::default());
        assert!(!is_eligible(ChunkCoord::ORIGIN, &rules));
        assert!(is_eligible(ChunkCoord::new(0, 1), &rules));
    }

    #[test]
    fn first_pass_spawns_sequence_zero() {
        let mut store = MemoryStore::new();
        let settings = SimSettings::default();
        let report = run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 5_000);
        assert_eq!(report.spawned, vec!["1:1#0".to_string()]);
        let slot = store.find_spawn_slot(SlotTable::MysteryBox, "1:1").unwrap();
        assert_eq!(slot.spawn_sequence, 1);
        assert_eq!(slot.next_spawn_at_ms, 6_000);
        assert_eq!(slot.active_entity_id.as_deref(), Some("1:1#0"));
    }

    #[test]
    fn at_most_one_entity_per_slot() {
        let mut store = MemoryStore::new();
        let settings = SimSettings::default();
        for t in 0..10 {
            run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), t * 5_000);
        }
        assert_eq!(store.mystery_boxes.len(), 1);
    }

    #[test]
    fn missing_entity_respawns_after_cooldown() {
        let mut store = MemoryStore::new();
        let settings = SimSettings::default();
        run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 0);
        store.delete_mystery_box("1:1#0");

        // Before the cooldown the reference is cleared but nothing spawns.
        let early = run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 500);
        assert!(early.spawned.is_empty());
        let slot = store.find_spawn_slot(SlotTable::MysteryBox, "1:1").unwrap();
        assert_eq!(slot.active_entity_id, None);

        let later = run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 1_000);
        assert_eq!(later.spawned, vec!["1:1#1".to_string()]);
    }

    #[test]
    fn inactive_chunks_despawn_and_keep_sequence() {
        let mut store = MemoryStore::new();
        let settings = SimSettings::default();
        run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 0);

        let report = run_coordinator::<Marker, _>(&mut store, &settings, &[], 100);
        assert_eq!(report.despawned, vec!["1:1#0".to_string()]);
        assert!(store.mystery_boxes.is_empty());
        let slot = store.find_spawn_slot(SlotTable::MysteryBox, "1:1").unwrap();
        assert_eq!(slot.spawn_sequence, 1);
        assert_eq!(slot.active_entity_id, None);

        // Reactivated after the cooldown: next sequence.
        let back = run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 2_000);
        assert_eq!(back.spawned, vec!["1:1#1".to_string()]);
    }

    #[test]
    fn deactivation_follows_live_entities_not_slot_rows() {
        let mut store = MemoryStore::new();
        let settings = SimSettings::default();
        // Orphan box in an inactive chunk with no slot row at all.
        Marker::spawn(
            &mut store,
            &SpawnSite {
                entity_id: "7:7#3".into(),
                chunk: ChunkCoord::new(7, 7),
                chunk_key: "7:7".into(),
                sequence: 3,
                ground: sample_spawn_point(ChunkCoord::new(7, 7), 3, 17),
                now_ms: 0,
            },
            &settings,
        );

        let report = run_coordinator::<Marker, _>(&mut store, &settings, &one_chunk(), 0);
        assert_eq!(report.despawned, vec!["7:7#3".to_string()]);
        assert!(store.find_spawn_slot(SlotTable::MysteryBox, "7:7").is_none());
        assert_eq!(store.mystery_boxes.len(), 1);
        assert!(store.find_mystery_box("1:1#0").is_some());
    }

    #[test]
    fn chunks_past_the_world_edge_never_host_slots() {
        let rules = Marker::rules(&SimSettings::default());
        let last = (WORLD_HALF_EXTENT / CHUNK_SIZE) as i32 - 1;
        assert!(is_eligible(ChunkCoord::new(last, 0), &rules));
        assert!(is_eligible(ChunkCoord::new(-last - 1, -last - 1), &rules));
        assert!(!is_eligible(ChunkCoord::new(last + 1, 0), &rules));
        assert!(!is_eligible(ChunkCoord::new(0, -last - 2), &rules));

        let mut store = MemoryStore::new();
        let settings = SimSettings::default();
        let active = active_chunks([(WORLD_HALF_EXTENT - 0.5, 0.0)], 2);
        let report = run_coordinator::<Marker, _>(&mut store, &settings, &active, 0);
        assert!(!report.spawned.is_empty());
        for b in store.mystery_boxes.values() {
            assert!(b.x.abs() <= WORLD_HALF_EXTENT && b.z.abs() <= WORLD_HALF_EXTENT, "{b:?}");
        }
        assert!(
            store
                .mystery_box_slots
                .values()
                .all(|slot| slot.chunk_x <= last)
        );
    }
}
