use crate::types::*;
use spacetimedb::*;

/// Authoritative pose of a connected player.
///
/// Written by `upsert_player_state` after reconciliation. The row exists while the
/// identity has at least one open session.
#[table(name = player_state, public)]
#[derive(Clone, Debug)]
pub struct PlayerState {
    #[primary_key]
    pub identity: Identity,

    pub display_name: String,

    pub x: f32,
    pub y: f32,
    pub z: f32,

    pub vx: f32,
    pub vy: f32,
    pub vz: f32,

    pub yaw: f32,
    pub pitch: f32,
    pub planar_speed: f32,
    pub motion_state: MotionState,

    /// Last client input sequence applied; clients use it to drop acknowledged inputs.
    pub last_input_seq: u32,
    pub updated_at_ms: i64,

    /// Gate for the fireball cooldown.
    pub last_cast_at_ms: Option<i64>,
}
