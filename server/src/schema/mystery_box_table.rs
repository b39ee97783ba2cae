use crate::types::*;
use spacetimedb::*;

#[table(name = mystery_box_state, public)]
#[derive(Clone, Debug)]
pub struct MysteryBoxState {
    #[primary_key]
    pub mystery_box_id: String,
    pub chunk_key: String,

    pub x: f32,
    pub y: f32,
    pub z: f32,

    pub phase: MysteryBoxPhase,
    pub depleted_at_ms: Option<i64>,
    pub despawn_at_ms: Option<i64>,
}
