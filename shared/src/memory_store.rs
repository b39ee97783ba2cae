//! In-memory `WorldStore` backed by ordered maps.
//!
//! Used by the test suites and by tooling that wants to run the simulation
//! without a database. Ordered maps keep iteration deterministic, which the
//! replay tests depend on.

use std::collections::BTreeMap;

use crate::rows::*;
use crate::store::{SlotTable, WorldStore};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub players: BTreeMap<PlayerId, PlayerState>,
    pub inventories: BTreeMap<PlayerId, PlayerInventory>,
    pub stats: BTreeMap<PlayerId, PlayerStats>,
    pub ring_drops: BTreeMap<u64, RingDrop>,
    pub goombas: BTreeMap<String, GoombaState>,
    pub mystery_boxes: BTreeMap<String, MysteryBoxState>,
    pub goomba_slots: BTreeMap<String, ChunkSpawnState>,
    pub mystery_box_slots: BTreeMap<String, ChunkSpawnState>,
    pub fireballs: BTreeMap<u64, FireballEvent>,
    pub chat_messages: BTreeMap<u64, ChatMessageEvent>,
    pub world_states: BTreeMap<String, WorldState>,
    pub sessions: BTreeMap<String, Session>,
    next_ring_id: u64,
    next_fireball_id: u64,
    next_message_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self, table: SlotTable) -> &BTreeMap<String, ChunkSpawnState> {
        match table {
            SlotTable::Goomba => &self.goomba_slots,
            SlotTable::MysteryBox => &self.mystery_box_slots,
        }
    }

    fn slots_mut(&mut self, table: SlotTable) -> &mut BTreeMap<String, ChunkSpawnState> {
        match table {
            SlotTable::Goomba => &mut self.goomba_slots,
            SlotTable::MysteryBox => &mut self.mystery_box_slots,
        }
    }
}

/// Mirrors `#[auto_inc]`: id `0` means "assign the next one".
fn assign_id(counter: &mut u64, requested: u64) -> u64 {
    if requested != 0 {
        *counter = (*counter).max(requested);
        return requested;
    }
    *counter += 1;
    *counter
}

impl WorldStore for MemoryStore {
    fn find_player(&self, identity: &PlayerId) -> Option<PlayerState> {
        self.players.get(identity).cloned()
    }

    fn players(&self) -> Vec<PlayerState> {
        self.players.values().cloned().collect()
    }

    fn put_player(&mut self, row: PlayerState) {
        self.players.insert(row.identity, row);
    }

    fn delete_player(&mut self, identity: &PlayerId) {
        self.players.remove(identity);
    }

    fn find_inventory(&self, identity: &PlayerId) -> Option<PlayerInventory> {
        self.inventories.get(identity).cloned()
    }

    fn put_inventory(&mut self, row: PlayerInventory) {
        self.inventories.insert(row.identity, row);
    }

    fn find_stats(&self, identity: &PlayerId) -> Option<PlayerStats> {
        self.stats.get(identity).cloned()
    }

    fn put_stats(&mut self, row: PlayerStats) {
        self.stats.insert(row.identity, row);
    }

    fn find_ring_drop(&self, ring_id: u64) -> Option<RingDrop> {
        self.ring_drops.get(&ring_id).cloned()
    }

    fn insert_ring_drop(&mut self, mut row: RingDrop) -> RingDrop {
        row.ring_id = assign_id(&mut self.next_ring_id, row.ring_id);
        self.ring_drops.insert(row.ring_id, row.clone());
        row
    }

    fn delete_ring_drop(&mut self, ring_id: u64) {
        self.ring_drops.remove(&ring_id);
    }

    fn expired_ring_drops(&self, now_ms: i64) -> Vec<u64> {
        self.ring_drops
            .values()
            .filter(|r| r.expires_at_ms <= now_ms)
            .map(|r| r.ring_id)
            .collect()
    }

    fn find_goomba(&self, goomba_id: &str) -> Option<GoombaState> {
        self.goombas.get(goomba_id).cloned()
    }

    fn goombas(&self) -> Vec<GoombaState> {
        self.goombas.values().cloned().collect()
    }

    fn put_goomba(&mut self, row: GoombaState) {
        self.goombas.insert(row.goomba_id.clone(), row);
    }

    fn delete_goomba(&mut self, goomba_id: &str) {
        self.goombas.remove(goomba_id);
    }

    fn find_mystery_box(&self, mystery_box_id: &str) -> Option<MysteryBoxState> {
        self.mystery_boxes.get(mystery_box_id).cloned()
    }

    fn mystery_boxes(&self) -> Vec<MysteryBoxState> {
        self.mystery_boxes.values().cloned().collect()
    }

    fn put_mystery_box(&mut self, row: MysteryBoxState) {
        self.mystery_boxes.insert(row.mystery_box_id.clone(), row);
    }

    fn delete_mystery_box(&mut self, mystery_box_id: &str) {
        self.mystery_boxes.remove(mystery_box_id);
    }

    fn find_spawn_slot(&self, table: SlotTable, chunk_key: &str) -> Option<ChunkSpawnState> {
        self.slots(table).get(chunk_key).cloned()
    }

    fn put_spawn_slot(&mut self, table: SlotTable, row: ChunkSpawnState) {
        self.slots_mut(table).insert(row.chunk_key.clone(), row);
    }

    fn fireballs_owned_by<'a>(
        &'a self,
        owner: &PlayerId,
    ) -> Box<dyn Iterator<Item = FireballEvent> + 'a> {
        let owner = *owner;
        Box::new(
            self.fireballs
                .values()
                .filter(move |f| f.owner_identity == owner)
                .cloned(),
        )
    }

    fn insert_fireball(&mut self, mut row: FireballEvent) -> FireballEvent {
        row.event_id = assign_id(&mut self.next_fireball_id, row.event_id);
        self.fireballs.insert(row.event_id, row.clone());
        row
    }

    fn delete_fireball(&mut self, event_id: u64) {
        self.fireballs.remove(&event_id);
    }

    fn expired_fireballs(&self, now_ms: i64) -> Vec<u64> {
        self.fireballs
            .values()
            .filter(|f| f.expires_at_ms <= now_ms)
            .map(|f| f.event_id)
            .collect()
    }

    fn insert_chat_message(&mut self, mut row: ChatMessageEvent) -> ChatMessageEvent {
        row.message_id = assign_id(&mut self.next_message_id, row.message_id);
        self.chat_messages.insert(row.message_id, row.clone());
        row
    }

    fn delete_chat_message(&mut self, message_id: u64) {
        self.chat_messages.remove(&message_id);
    }

    fn expired_chat_messages(&self, now_ms: i64) -> Vec<u64> {
        self.chat_messages
            .values()
            .filter(|m| m.expires_at_ms <= now_ms)
            .map(|m| m.message_id)
            .collect()
    }

    fn find_world_state(&self, id: &str) -> Option<WorldState> {
        self.world_states.get(id).cloned()
    }

    fn insert_world_state(&mut self, row: WorldState) {
        self.world_states.insert(row.id.clone(), row);
    }

    fn insert_session(&mut self, row: Session) {
        self.sessions.insert(row.connection_id.clone(), row);
    }

    fn delete_session(&mut self, connection_id: &str) -> Option<Session> {
        self.sessions.remove(connection_id)
    }

    fn has_session(&self, identity: &PlayerId) -> bool {
        self.sessions.values().any(|s| s.identity == *identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_at(expires_at_ms: i64) -> RingDrop {
        RingDrop {
            ring_id: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            source: RingSource::Spill,
            collected: false,
            spawned_at_ms: expires_at_ms - 10,
            expires_at_ms,
        }
    }

    #[test]
    fn auto_inc_assigns_increasing_ids() {
        let mut store = MemoryStore::new();
        let a = store.insert_ring_drop(drop_at(100));
        let b = store.insert_ring_drop(drop_at(200));
        assert_eq!(a.ring_id, 1);
        assert_eq!(b.ring_id, 2);
        assert_eq!(store.find_ring_drop(2), Some(b));
    }

    #[test]
    fn expired_query_is_inclusive_of_now() {
        let mut store = MemoryStore::new();
        store.insert_ring_drop(drop_at(100));
        store.insert_ring_drop(drop_at(101));
        assert_eq!(store.expired_ring_drops(99), Vec::<u64>::new());
        assert_eq!(store.expired_ring_drops(100), vec![1]);
    }

    #[test]
    fn slot_tables_are_independent() {
        let mut store = MemoryStore::new();
        let slot = ChunkSpawnState {
            chunk_key: "1:2".into(),
            chunk_x: 1,
            chunk_z: 2,
            next_spawn_at_ms: 0,
            spawn_sequence: 0,
            active_entity_id: None,
        };
        store.put_spawn_slot(SlotTable::Goomba, slot);
        assert!(store.find_spawn_slot(SlotTable::Goomba, "1:2").is_some());
        assert!(store.find_spawn_slot(SlotTable::MysteryBox, "1:2").is_none());
    }
}
