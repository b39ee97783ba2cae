use crate::types::*;
use spacetimedb::*;

/// A collectible ring lying in the world.
#[table(name = ring_drop, public)]
#[derive(Clone, Debug)]
pub struct RingDrop {
    #[primary_key]
    #[auto_inc]
    pub ring_id: u64,

    pub x: f32,
    pub y: f32,
    pub z: f32,

    pub source: RingSource,
    pub collected: bool,
    pub spawned_at_ms: i64,

    #[index(btree)]
    pub expires_at_ms: i64,
}
