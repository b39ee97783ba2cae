//! `WorldStore` over the module's tables.
//!
//! The simulation in `shared` only talks to [`WorldStore`]. This adapter maps each call onto
//! the table handles of the current `ReducerContext`, converting between schema rows and the
//! storage-agnostic rows in `shared::rows`. Reads observe earlier writes of the same reducer.

use crate::schema::*;
use shared::rows as sim;
use shared::{SlotTable, WorldStore};
use spacetimedb::{Identity, ReducerContext, Table};

pub struct DbStore<'a> {
    ctx: &'a ReducerContext,
}

impl<'a> DbStore<'a> {
    pub fn new(ctx: &'a ReducerContext) -> Self {
        Self { ctx }
    }
}

pub fn identity_of(id: &sim::PlayerId) -> Identity {
    Identity::from_byte_array(id.to_bytes())
}

pub fn player_id(identity: Identity) -> sim::PlayerId {
    sim::PlayerId::from_bytes(identity.to_byte_array())
}

// Row conversions.

impl From<PlayerState> for sim::PlayerState {
    fn from(r: PlayerState) -> Self {
        Self {
            identity: player_id(r.identity),
            display_name: r.display_name,
            x: r.x,
            y: r.y,
            z: r.z,
            vx: r.vx,
            vy: r.vy,
            vz: r.vz,
            yaw: r.yaw,
            pitch: r.pitch,
            planar_speed: r.planar_speed,
            motion_state: r.motion_state.into(),
            last_input_seq: r.last_input_seq,
            updated_at_ms: r.updated_at_ms,
            last_cast_at_ms: r.last_cast_at_ms,
        }
    }
}

impl From<sim::PlayerState> for PlayerState {
    fn from(r: sim::PlayerState) -> Self {
        Self {
            identity: identity_of(&r.identity),
            display_name: r.display_name,
            x: r.x,
            y: r.y,
            z: r.z,
            vx: r.vx,
            vy: r.vy,
            vz: r.vz,
            yaw: r.yaw,
            pitch: r.pitch,
            planar_speed: r.planar_speed,
            motion_state: r.motion_state.into(),
            last_input_seq: r.last_input_seq,
            updated_at_ms: r.updated_at_ms,
            last_cast_at_ms: r.last_cast_at_ms,
        }
    }
}

impl From<PlayerInventory> for sim::PlayerInventory {
    fn from(r: PlayerInventory) -> Self {
        Self {
            identity: player_id(r.identity),
            ring_count: r.ring_count,
            updated_at_ms: r.updated_at_ms,
        }
    }
}

impl From<sim::PlayerInventory> for PlayerInventory {
    fn from(r: sim::PlayerInventory) -> Self {
        Self {
            identity: identity_of(&r.identity),
            ring_count: r.ring_count,
            updated_at_ms: r.updated_at_ms,
        }
    }
}

impl From<PlayerStats> for sim::PlayerStats {
    fn from(r: PlayerStats) -> Self {
        Self {
            identity: player_id(r.identity),
            display_name: r.display_name,
            highest_ring_count: r.highest_ring_count,
            updated_at_ms: r.updated_at_ms,
        }
    }
}

impl From<sim::PlayerStats> for PlayerStats {
    fn from(r: sim::PlayerStats) -> Self {
        Self {
            identity: identity_of(&r.identity),
            display_name: r.display_name,
            highest_ring_count: r.highest_ring_count,
            updated_at_ms: r.updated_at_ms,
        }
    }
}

impl From<RingDrop> for sim::RingDrop {
    fn from(r: RingDrop) -> Self {
        Self {
            ring_id: r.ring_id,
            x: r.x,
            y: r.y,
            z: r.z,
            source: r.source.into(),
            collected: r.collected,
            spawned_at_ms: r.spawned_at_ms,
            expires_at_ms: r.expires_at_ms,
        }
    }
}

impl From<sim::RingDrop> for RingDrop {
    fn from(r: sim::RingDrop) -> Self {
        Self {
            ring_id: r.ring_id,
            x: r.x,
            y: r.y,
            z: r.z,
            source: r.source.into(),
            collected: r.collected,
            spawned_at_ms: r.spawned_at_ms,
            expires_at_ms: r.expires_at_ms,
        }
    }
}

impl From<GoombaState> for sim::GoombaState {
    fn from(r: GoombaState) -> Self {
        Self {
            goomba_id: r.goomba_id,
            chunk_key: r.chunk_key,
            spawn_x: r.spawn_x,
            spawn_y: r.spawn_y,
            spawn_z: r.spawn_z,
            x: r.x,
            y: r.y,
            z: r.z,
            yaw: r.yaw,
            behavior: r.behavior.into(),
            target_identity: r.target_identity.map(player_id),
            state_ends_at_ms: r.state_ends_at_ms,
            rng_cursor: r.rng_cursor,
            wander_seed: r.wander_seed,
            respawn_at_ms: r.respawn_at_ms,
            updated_at_ms: r.updated_at_ms,
        }
    }
}

impl From<sim::GoombaState> for GoombaState {
    fn from(r: sim::GoombaState) -> Self {
        Self {
            goomba_id: r.goomba_id,
            chunk_key: r.chunk_key,
            spawn_x: r.spawn_x,
            spawn_y: r.spawn_y,
            spawn_z: r.spawn_z,
            x: r.x,
            y: r.y,
            z: r.z,
            yaw: r.yaw,
            behavior: r.behavior.into(),
            target_identity: r.target_identity.as_ref().map(identity_of),
            state_ends_at_ms: r.state_ends_at_ms,
            rng_cursor: r.rng_cursor,
            wander_seed: r.wander_seed,
            respawn_at_ms: r.respawn_at_ms,
            updated_at_ms: r.updated_at_ms,
        }
    }
}

impl From<MysteryBoxState> for sim::MysteryBoxState {
    fn from(r: MysteryBoxState) -> Self {
        Self {
            mystery_box_id: r.mystery_box_id,
            chunk_key: r.chunk_key,
            x: r.x,
            y: r.y,
            z: r.z,
            phase: r.phase.into(),
            depleted_at_ms: r.depleted_at_ms,
            despawn_at_ms: r.despawn_at_ms,
        }
    }
}

impl From<sim::MysteryBoxState> for MysteryBoxState {
    fn from(r: sim::MysteryBoxState) -> Self {
        Self {
            mystery_box_id: r.mystery_box_id,
            chunk_key: r.chunk_key,
            x: r.x,
            y: r.y,
            z: r.z,
            phase: r.phase.into(),
            depleted_at_ms: r.depleted_at_ms,
            despawn_at_ms: r.despawn_at_ms,
        }
    }
}

/// Both slot tables share one shape.
macro_rules! slot_row_conversions {
    ($row:ident) => {
        impl From<$row> for sim::ChunkSpawnState {
            fn from(r: $row) -> Self {
                Self {
                    chunk_key: r.chunk_key,
                    chunk_x: r.chunk_x,
                    chunk_z: r.chunk_z,
                    next_spawn_at_ms: r.next_spawn_at_ms,
                    spawn_sequence: r.spawn_sequence,
                    active_entity_id: r.active_entity_id,
                }
            }
        }

        impl From<sim::ChunkSpawnState> for $row {
            fn from(r: sim::ChunkSpawnState) -> Self {
                Self {
                    chunk_key: r.chunk_key,
                    chunk_x: r.chunk_x,
                    chunk_z: r.chunk_z,
                    next_spawn_at_ms: r.next_spawn_at_ms,
                    spawn_sequence: r.spawn_sequence,
                    active_entity_id: r.active_entity_id,
                }
            }
        }
    };
}

slot_row_conversions!(GoombaChunkSpawn);
slot_row_conversions!(MysteryBoxChunkSpawn);

impl From<FireballEvent> for sim::FireballEvent {
    fn from(r: FireballEvent) -> Self {
        Self {
            event_id: r.event_id,
            owner_identity: player_id(r.owner_identity),
            origin_x: r.origin_x,
            origin_y: r.origin_y,
            origin_z: r.origin_z,
            dir_x: r.dir_x,
            dir_y: r.dir_y,
            dir_z: r.dir_z,
            created_at_ms: r.created_at_ms,
            expires_at_ms: r.expires_at_ms,
        }
    }
}

impl From<sim::FireballEvent> for FireballEvent {
    fn from(r: sim::FireballEvent) -> Self {
        Self {
            event_id: r.event_id,
            owner_identity: identity_of(&r.owner_identity),
            origin_x: r.origin_x,
            origin_y: r.origin_y,
            origin_z: r.origin_z,
            dir_x: r.dir_x,
            dir_y: r.dir_y,
            dir_z: r.dir_z,
            created_at_ms: r.created_at_ms,
            expires_at_ms: r.expires_at_ms,
        }
    }
}

impl From<ChatMessageEvent> for sim::ChatMessageEvent {
    fn from(r: ChatMessageEvent) -> Self {
        Self {
            message_id: r.message_id,
            owner_identity: player_id(r.owner_identity),
            display_name: r.display_name,
            text: r.text,
            created_at_ms: r.created_at_ms,
            expires_at_ms: r.expires_at_ms,
        }
    }
}

impl From<sim::ChatMessageEvent> for ChatMessageEvent {
    fn from(r: sim::ChatMessageEvent) -> Self {
        Self {
            message_id: r.message_id,
            owner_identity: identity_of(&r.owner_identity),
            display_name: r.display_name,
            text: r.text,
            created_at_ms: r.created_at_ms,
            expires_at_ms: r.expires_at_ms,
        }
    }
}

impl From<WorldState> for sim::WorldState {
    fn from(r: WorldState) -> Self {
        Self {
            id: r.id,
            day_cycle_anchor_ms: r.day_cycle_anchor_ms,
            day_cycle_duration_seconds: r.day_cycle_duration_seconds,
        }
    }
}

impl From<sim::WorldState> for WorldState {
    fn from(r: sim::WorldState) -> Self {
        Self {
            id: r.id,
            day_cycle_anchor_ms: r.day_cycle_anchor_ms,
            day_cycle_duration_seconds: r.day_cycle_duration_seconds,
        }
    }
}

impl From<Session> for sim::Session {
    fn from(r: Session) -> Self {
        Self {
            connection_id: r.connection_id,
            identity: player_id(r.identity),
            connected_at_ms: r.connected_at_ms,
        }
    }
}

impl From<sim::Session> for Session {
    fn from(r: sim::Session) -> Self {
        Self {
            connection_id: r.connection_id,
            identity: identity_of(&r.identity),
            connected_at_ms: r.connected_at_ms,
        }
    }
}

impl WorldStore for DbStore<'_> {
    fn find_player(&self, identity: &sim::PlayerId) -> Option<sim::PlayerState> {
        self.ctx
            .db
            .player_state()
            .identity()
            .find(identity_of(identity))
            .map(Into::into)
    }

    fn players(&self) -> Vec<sim::PlayerState> {
        self.ctx.db.player_state().iter().map(Into::into).collect()
    }

    fn put_player(&mut self, row: sim::PlayerState) {
        let row = PlayerState::from(row);
        let table = self.ctx.db.player_state();
        if table.identity().find(row.identity).is_some() {
            table.identity().update(row);
        } else {
            table.insert(row);
        }
    }

    fn delete_player(&mut self, identity: &sim::PlayerId) {
        self.ctx
            .db
            .player_state()
            .identity()
            .delete(identity_of(identity));
    }

    fn find_inventory(&self, identity: &sim::PlayerId) -> Option<sim::PlayerInventory> {
        self.ctx
            .db
            .player_inventory()
            .identity()
            .find(identity_of(identity))
            .map(Into::into)
    }

    fn put_inventory(&mut self, row: sim::PlayerInventory) {
        let row = PlayerInventory::from(row);
        let table = self.ctx.db.player_inventory();
        if table.identity().find(row.identity).is_some() {
            table.identity().update(row);
        } else {
            table.insert(row);
        }
    }

    fn find_stats(&self, identity: &sim::PlayerId) -> Option<sim::PlayerStats> {
        self.ctx
            .db
            .player_stats()
            .identity()
            .find(identity_of(identity))
            .map(Into::into)
    }

    fn put_stats(&mut self, row: sim::PlayerStats) {
        let row = PlayerStats::from(row);
        let table = self.ctx.db.player_stats();
        if table.identity().find(row.identity).is_some() {
            table.identity().update(row);
        } else {
            table.insert(row);
        }
    }

    fn find_ring_drop(&self, ring_id: u64) -> Option<sim::RingDrop> {
        self.ctx
            .db
            .ring_drop()
            .ring_id()
            .find(ring_id)
            .map(Into::into)
    }

    fn insert_ring_drop(&mut self, row: sim::RingDrop) -> sim::RingDrop {
        self.ctx.db.ring_drop().insert(row.into()).into()
    }

    fn delete_ring_drop(&mut self, ring_id: u64) {
        self.ctx.db.ring_drop().ring_id().delete(ring_id);
    }

    fn expired_ring_drops(&self, now_ms: i64) -> Vec<u64> {
        self.ctx
            .db
            .ring_drop()
            .expires_at_ms()
            .filter(i64::MIN..=now_ms)
            .map(|r| r.ring_id)
            .collect()
    }

    fn find_goomba(&self, goomba_id: &str) -> Option<sim::GoombaState> {
        self.ctx
            .db
            .goomba_state()
            .goomba_id()
            .find(goomba_id.to_string())
            .map(Into::into)
    }

    fn goombas(&self) -> Vec<sim::GoombaState> {
        self.ctx.db.goomba_state().iter().map(Into::into).collect()
    }

    fn put_goomba(&mut self, row: sim::GoombaState) {
        let row = GoombaState::from(row);
        let table = self.ctx.db.goomba_state();
        if table.goomba_id().find(&row.goomba_id).is_some() {
            table.goomba_id().update(row);
        } else {
            table.insert(row);
        }
    }

    fn delete_goomba(&mut self, goomba_id: &str) {
        self.ctx
            .db
            .goomba_state()
            .goomba_id()
            .delete(goomba_id.to_string());
    }

    fn find_mystery_box(&self, mystery_box_id: &str) -> Option<sim::MysteryBoxState> {
        self.ctx
            .db
            .mystery_box_state()
            .mystery_box_id()
            .find(mystery_box_id.to_string())
            .map(Into::into)
    }

    fn mystery_boxes(&self) -> Vec<sim::MysteryBoxState> {
        self.ctx
            .db
            .mystery_box_state()
            .iter()
            .map(Into::into)
            .collect()
    }

    fn put_mystery_box(&mut self, row: sim::MysteryBoxState) {
        let row = MysteryBoxState::from(row);
        let table = self.ctx.db.mystery_box_state();
        if table.mystery_box_id().find(&row.mystery_box_id).is_some() {
            table.mystery_box_id().update(row);
        } else {
            table.insert(row);
        }
    }

    fn delete_mystery_box(&mut self, mystery_box_id: &str) {
        self.ctx
            .db
            .mystery_box_state()
            .mystery_box_id()
            .delete(mystery_box_id.to_string());
    }

    fn find_spawn_slot(&self, table: SlotTable, chunk_key: &str) -> Option<sim::ChunkSpawnState> {
        let key = chunk_key.to_string();
        match table {
            SlotTable::Goomba => self
                .ctx
                .db
                .goomba_chunk_spawn()
                .chunk_key()
                .find(&key)
                .map(Into::into),
            SlotTable::MysteryBox => self
                .ctx
                .db
                .mystery_box_chunk_spawn()
                .chunk_key()
                .find(&key)
                .map(Into::into),
        }
    }

    fn put_spawn_slot(&mut self, table: SlotTable, row: sim::ChunkSpawnState) {
        match table {
            SlotTable::Goomba => {
                let row = GoombaChunkSpawn::from(row);
                let t = self.ctx.db.goomba_chunk_spawn();
                if t.chunk_key().find(&row.chunk_key).is_some() {
                    t.chunk_key().update(row);
                } else {
                    t.insert(row);
                }
            }
            SlotTable::MysteryBox => {
                let row = MysteryBoxChunkSpawn::from(row);
                let t = self.ctx.db.mystery_box_chunk_spawn();
                if t.chunk_key().find(&row.chunk_key).is_some() {
                    t.chunk_key().update(row);
                } else {
                    t.insert(row);
                }
            }
        }
    }

    fn fireballs_owned_by<'b>(
        &'b self,
        owner: &sim::PlayerId,
    ) -> Box<dyn Iterator<Item = sim::FireballEvent> + 'b> {
        let owner = identity_of(owner);
        Box::new(
            self.ctx
                .db
                .fireball_event()
                .owner_identity()
                .filter(owner)
                .map(Into::into),
        )
    }

    fn insert_fireball(&mut self, row: sim::FireballEvent) -> sim::FireballEvent {
        self.ctx.db.fireball_event().insert(row.into()).into()
    }

    fn delete_fireball(&mut self, event_id: u64) {
        self.ctx.db.fireball_event().event_id().delete(event_id);
    }

    fn expired_fireballs(&self, now_ms: i64) -> Vec<u64> {
        self.ctx
            .db
            .fireball_event()
            .expires_at_ms()
            .filter(i64::MIN..=now_ms)
            .map(|r| r.event_id)
            .collect()
    }

    fn insert_chat_message(&mut self, row: sim::ChatMessageEvent) -> sim::ChatMessageEvent {
        self.ctx.db.chat_message_event().insert(row.into()).into()
    }

    fn delete_chat_message(&mut self, message_id: u64) {
        self.ctx
            .db
            .chat_message_event()
            .message_id()
            .delete(message_id);
    }

    fn expired_chat_messages(&self, now_ms: i64) -> Vec<u64> {
        self.ctx
            .db
            .chat_message_event()
            .expires_at_ms()
            .filter(i64::MIN..=now_ms)
            .map(|r| r.message_id)
            .collect()
    }

    fn find_world_state(&self, id: &str) -> Option<sim::WorldState> {
        self.ctx
            .db
            .world_state()
            .id()
            .find(id.to_string())
            .map(Into::into)
    }

    fn insert_world_state(&mut self, row: sim::WorldState) {
        self.ctx.db.world_state().insert(row.into());
    }

    fn insert_session(&mut self, row: sim::Session) {
        let row = Session::from(row);
        let table = self.ctx.db.session();
        // A reused connection id replaces the stale row.
        table.connection_id().delete(&row.connection_id);
        table.insert(row);
    }

    fn delete_session(&mut self, connection_id: &str) -> Option<sim::Session> {
        let key = connection_id.to_string();
        let table = self.ctx.db.session();
        let row = table.connection_id().find(&key)?;
        table.connection_id().delete(&key);
        Some(row.into())
    }

    fn has_session(&self, identity: &sim::PlayerId) -> bool {
        self.ctx
            .db
            .session()
            .identity()
            .filter(identity_of(identity))
            .next()
            .is_some()
    }
}
