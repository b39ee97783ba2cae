use spacetimedb::*;

/// Goomba slot for one chunk. Keyed by `"<cx>:<cz>"`.
#[table(name = goomba_chunk_spawn)]
#[derive(Clone, Debug)]
pub struct GoombaChunkSpawn {
    #[primary_key]
    pub chunk_key: String,
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub next_spawn_at_ms: i64,
    pub spawn_sequence: u32,
    pub active_entity_id: Option<String>,
}

/// Mystery box slot for one chunk. Same shape as [`GoombaChunkSpawn`].
#[table(name = mystery_box_chunk_spawn)]
#[derive(Clone, Debug)]
pub struct MysteryBoxChunkSpawn {
    #[primary_key]
    pub chunk_key: String,
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub next_spawn_at_ms: i64,
    pub spawn_sequence: u32,
    pub active_entity_id: Option<String>,
}
