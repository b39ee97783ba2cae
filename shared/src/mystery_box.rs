//! Mystery box lifecycle: `Ready -> Depleted -> (despawned)`.
//!
//! A hit depletes the box, bursts rings around it and starts both the despawn timer and the
//! chunk slot's respawn cooldown. Depleted boxes are removed by the box tick once their
//! despawn time passes; the coordinator fills the slot again after the cooldown.

use crate::error::{CommandError, CommandResult};
use crate::motion::planar_distance_sq;
use crate::rings::ring_burst;
use crate::rows::{MysteryBoxPhase, MysteryBoxState, PlayerId, RingSource};
use crate::settings::{SimSettings, SpawnRules};
use crate::spawn::{SlotEntity, SpawnSite};
use crate::store::{SlotTable, WorldStore};

pub struct MysteryBox;

impl SlotEntity for MysteryBox {
    const TABLE: SlotTable = SlotTable::MysteryBox;

    fn rules(settings: &SimSettings) -> SpawnRules {
        settings.mystery_box.spawn
    }

    fn exists<S: WorldStore + ?Sized>(store: &S, entity_id: &str) -> bool {
        store.find_mystery_box(entity_id).is_some()
    }

    fn live<S: WorldStore + ?Sized>(store: &S) -> Vec<(String, String)> {
        store
            .mystery_boxes()
            .into_iter()
            .map(|e| (e.mystery_box_id, e.chunk_key))
            .collect()
    }

    fn spawn<S: WorldStore + ?Sized>(store: &mut S, site: &SpawnSite, settings: &SimSettings) {
        store.put_mystery_box(MysteryBoxState {
            mystery_box_id: site.entity_id.clone(),
            chunk_key: site.chunk_key.clone(),
            x: site.ground.x,
            y: site.ground.y + settings.mystery_box.float_height,
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

/// Deletes depleted boxes whose despawn time has passed. Returns their ids.
pub fn tick_mystery_boxes<S: WorldStore + ?Sized>(store: &mut S, now_ms: i64) -> Vec<String> {
    let mut removed = Vec::new();
    for b in store.mystery_boxes() {
        let due = b.phase == MysteryBoxPhase::Depleted && b.despawn_at_ms.is_some_and(|t| now_ms >= t);
        if due {
            store.delete_mystery_box(&b.mystery_box_id);
            removed.push(b.mystery_box_id);
        }
    }
    removed.sort();
    removed
}

/// Player hit on a box. Range is measured on the XZ plane only; a depleted box is a no-op.
pub fn hit_mystery_box<S: WorldStore + ?Sized>(
    store: &mut S,
    caller: &PlayerId,
    mystery_box_id: &str,
    settings: &SimSettings,
    now_ms: i64,
) -> CommandResult {
    let player = store.find_player(caller).ok_or(CommandError::PlayerMissing)?;
    let mut mbox = store
        .find_mystery_box(mystery_box_id)
        .ok_or(CommandError::MysteryBoxMissing)?;

    let range = settings.mystery_box.hit_range;
    if planar_distance_sq(&mbox.position(), &player.position()) > range * range {
        return Err(CommandError::MysteryBoxOutOfRange);
    }

    if mbox.phase == MysteryBoxPhase::Depleted {
        return Ok(());
    }

    mbox.phase = MysteryBoxPhase::Depleted;
    mbox.depleted_at_ms = Some(now_ms);
    mbox.despawn_at_ms = Some(now_ms + settings.mystery_box.despawn_delay_ms);

    ring_burst(
        store,
        &mbox.position(),
        settings.mystery_box.ring_burst_count,
        settings.mystery_box.burst_radius,
        RingSource::MysteryBox,
        &settings.rings,
        now_ms,
    );

    if let Some(mut slot) = store.find_spawn_slot(SlotTable::MysteryBox, &mbox.chunk_key) {
        slot.next_spawn_at_ms = now_ms + settings.mystery_box.spawn.cooldown_ms;
        store.put_spawn_slot(SlotTable::MysteryBox, slot);
    }

    log::debug!("mystery box {mystery_box_id} depleted by {caller:?}");
    store.put_mystery_box(mbox);
    Ok(())
}
