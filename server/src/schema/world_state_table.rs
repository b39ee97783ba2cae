use spacetimedb::*;

/// Singleton (`id = "global"`) anchoring the shared day/night cycle.
#[table(name = world_state, public)]
#[derive(Clone, Debug)]
pub struct WorldState {
    #[primary_key]
    pub id: String,
    pub day_cycle_anchor_ms: i64,
    pub day_cycle_duration_seconds: u32,
}

/// One open client connection.
#[table(name = session)]
#[derive(Clone, Debug)]
pub struct Session {
    #[primary_key]
    pub connection_id: String,

    #[index(btree)]
    pub identity: Identity,

    pub connected_at_ms: i64,
}
