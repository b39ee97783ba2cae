//! Player rows and connection lifecycle.
//!
//! - A `PlayerState` exists while the identity has at least one open session.
//! - Inventory and stats outlive sessions; they are created on first use.

use crate::constants::{
    DAY_CYCLE_DURATION_SECONDS, DEFAULT_DISPLAY_NAME, MAX_DISPLAY_NAME_CHARS, SPAWN_CLEARANCE,
    SPAWN_X, SPAWN_Z, WORLD_STATE_ID,
};
use crate::rows::{MotionState, PlayerId, PlayerState, Session, WorldState};
use crate::store::WorldStore;
use crate::terrain::terrain_height;

/// Trimmed, control characters removed, at most `MAX_DISPLAY_NAME_CHARS` characters.
/// Falls back to `DEFAULT_DISPLAY_NAME` when nothing usable is left.
pub fn sanitize_display_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .chars()
        .take(MAX_DISPLAY_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_end();
    if cleaned.is_empty() {
        DEFAULT_DISPLAY_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Fresh player standing at the world spawn point.
pub fn new_player(identity: PlayerId, now_ms: i64) -> PlayerState {
    PlayerState {
        identity,
        display_name: DEFAULT_DISPLAY_NAME.to_string(),
        x: SPAWN_X,
        y: terrain_height(SPAWN_X, SPAWN_Z) + SPAWN_CLEARANCE,
        z: SPAWN_Z,
        vx: 0.0,
        vy: 0.0,
        vz: 0.0,
        yaw: 0.0,
        pitch: 0.0,
        planar_speed: 0.0,
        motion_state: MotionState::Idle,
        last_input_seq: 0,
        updated_at_ms: now_ms,
        last_cast_at_ms: None,
    }
}

/// Creates the world singleton when missing. Returns whether it was created.
pub fn bootstrap_world<S: WorldStore + ?Sized>(store: &mut S, now_ms: i64) -> bool {
    if store.find_world_state(WORLD_STATE_ID).is_some() {
        return false;
    }
    store.insert_world_state(WorldState {
        id: WORLD_STATE_ID.to_string(),
        day_cycle_anchor_ms: now_ms,
        day_cycle_duration_seconds: DAY_CYCLE_DURATION_SECONDS,
    });
    log::info!("world state created");
    true
}

pub fn client_connected<S: WorldStore + ?Sized>(
    store: &mut S,
    identity: &PlayerId,
    connection_id: &str,
    now_ms: i64,
) {
    store.insert_session(Session {
        connection_id: connection_id.to_string(),
        identity: *identity,
        connected_at_ms: now_ms,
    });
    if store.find_player(identity).is_none() {
        store.put_player(new_player(*identity, now_ms));
    }
    bootstrap_world(store, now_ms);
}

/// Drops the session; the player row goes with the identity's last session.
pub fn client_disconnected<S: WorldStore + ?Sized>(
    store: &mut S,
    identity: &PlayerId,
    connection_id: &str,
) {
    store.delete_session(connection_id);
    if !store.has_session(identity) {
        store.delete_player(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::rings::{ring_count, set_ring_count};

    #[test]
    fn sanitize_display_name_rules() {
        assert_eq!(sanitize_display_name("  Luigi  "), "Luigi");
        assert_eq!(sanitize_display_name("Pe\u{7}ach\n"), "Peach");
        assert_eq!(sanitize_display_name(" \t "), DEFAULT_DISPLAY_NAME);
        let long = "x".repeat(40);
        assert_eq!(sanitize_display_name(&long).chars().count(), MAX_DISPLAY_NAME_CHARS);
    }

    #[test]
    fn player_lives_while_any_session_is_open() {
        let mut store = MemoryStore::new();
        let id = PlayerId([7; 32]);
        client_connected(&mut store, &id, "a", 0);
        client_connected(&mut store, &id, "b", 10);
        set_ring_count(&mut store, &id, None, 5, 10);

        client_disconnected(&mut store, &id, "a");
        assert!(store.find_player(&id).is_some());

        client_disconnected(&mut store, &id, "b");
        assert!(store.find_player(&id).is_none());
        // Inventory is kept across sessions.
        assert_eq!(ring_count(&store, &id), 5);
    }

    #[test]
    fn reconnect_keeps_existing_player_row() {
        let mut store = MemoryStore::new();
        let id = PlayerId([7; 32]);
        client_connected(&mut store, &id, "a", 0);
        store.players.get_mut(&id).unwrap().x = 12.0;
        client_connected(&mut store, &id, "b", 5);
        assert_eq!(store.players[&id].x, 12.0);
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let mut store = MemoryStore::new();
        assert!(bootstrap_world(&mut store, 42));
        assert!(!bootstrap_world(&mut store, 99));
        assert_eq!(store.world_states[WORLD_STATE_ID].day_cycle_anchor_ms, 42);
    }
}
