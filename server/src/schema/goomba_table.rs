use crate::types::*;
use spacetimedb::*;

/// Live goomba NPC. Id is `"<chunkKey>#<sequence>"`.
#[table(name = goomba_state, public)]
#[derive(Clone, Debug)]
pub struct GoombaState {
    #[primary_key]
    pub goomba_id: String,

    pub chunk_key: String,

    pub spawn_x: f32,
    pub spawn_y: f32,
    pub spawn_z: f32,

    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,

    pub behavior: GoombaBehavior,
    pub target_identity: Option<Identity>,
    pub state_ends_at_ms: i64,

    /// Deterministic PRNG cursor; advanced once per tick.
    pub rng_cursor: u32,
    /// Cursor at spawn; fixes the wander phase.
    pub wander_seed: u32,
    pub respawn_at_ms: Option<i64>,
    pub updated_at_ms: i64,
}
