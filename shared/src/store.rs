//! Repository seam between the simulation and the host's table store.
//!
//! Every command handler runs against a `WorldStore` for the duration of one
//! host transaction. The host guarantees isolation between concurrent commands;
//! the simulation only relies on reads observing its own earlier writes.
//!
//! Scans are exposed as narrow queries (`expired_*`, `fireballs_owned_by`) so a
//! host can serve them from an index instead of a full table walk.

use crate::rows::*;

/// Which table a chunk slot row lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotTable {
    Goomba,
    MysteryBox,
}

pub trait WorldStore {
    // Players.
    fn find_player(&self, identity: &PlayerId) -> Option<PlayerState>;
    fn players(&self) -> Vec<PlayerState>;
    fn put_player(&mut self, row: PlayerState);
    fn delete_player(&mut self, identity: &PlayerId);

    fn find_inventory(&self, identity: &PlayerId) -> Option<PlayerInventory>;
    fn put_inventory(&mut self, row: PlayerInventory);

    fn find_stats(&self, identity: &PlayerId) -> Option<PlayerStats>;
    fn put_stats(&mut self, row: PlayerStats);

    // Ring drops.
    fn find_ring_drop(&self, ring_id: u64) -> Option<RingDrop>;
    /// Inserts with an auto-assigned id; returns the stored row.
    fn insert_ring_drop(&mut self, row: RingDrop) -> RingDrop;
    fn delete_ring_drop(&mut self, ring_id: u64);
    /// Ids of drops with `expires_at_ms <= now_ms`.
    fn expired_ring_drops(&self, now_ms: i64) -> Vec<u64>;

    // Goombas.
    fn find_goomba(&self, goomba_id: &str) -> Option<GoombaState>;
    fn goombas(&self) -> Vec<GoombaState>;
    fn put_goomba(&mut self, row: GoombaState);
    fn delete_goomba(&mut self, goomba_id: &str);

    // Mystery boxes.
    fn find_mystery_box(&self, mystery_box_id: &str) -> Option<MysteryBoxState>;
    fn mystery_boxes(&self) -> Vec<MysteryBoxState>;
    fn put_mystery_box(&mut self, row: MysteryBoxState);
    fn delete_mystery_box(&mut self, mystery_box_id: &str);

    // Chunk slots.
    fn find_spawn_slot(&self, table: SlotTable, chunk_key: &str) -> Option<ChunkSpawnState>;
    fn put_spawn_slot(&mut self, table: SlotTable, row: ChunkSpawnState);

    // Fireballs.
    /// Fireballs owned by `owner`, lazily, so callers can stop early.
    fn fireballs_owned_by<'a>(
        &'a self,
        owner: &PlayerId,
    ) -> Box<dyn Iterator<Item = FireballEvent> + 'a>;
    fn insert_fireball(&mut self, row: FireballEvent) -> FireballEvent;
    fn delete_fireball(&mut self, event_id: u64);
    fn expired_fireballs(&self, now_ms: i64) -> Vec<u64>;

    // Chat.
    fn insert_chat_message(&mut self, row: ChatMessageEvent) -> ChatMessageEvent;
    fn delete_chat_message(&mut self, message_id: u64);
    fn expired_chat_messages(&self, now_ms: i64) -> Vec<u64>;

    // World singleton.
    fn find_world_state(&self, id: &str) -> Option<WorldState>;
    fn insert_world_state(&mut self, row: WorldState);

    // Sessions.
    fn insert_session(&mut self, row: Session);
    fn delete_session(&mut self, connection_id: &str) -> Option<Session>;
    fn has_session(&self, identity: &PlayerId) -> bool;
}
