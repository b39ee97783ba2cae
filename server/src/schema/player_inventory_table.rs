use spacetimedb::*;

/// Rings currently held. Kept across sessions.
#[table(name = player_inventory, public)]
#[derive(Clone, Debug)]
pub struct PlayerInventory {
    #[primary_key]
    pub identity: Identity,
    pub ring_count: u32,
    pub updated_at_ms: i64,
}

/// Leaderboard row: best ring count ever held.
#[table(name = player_stats, public)]
#[derive(Clone, Debug)]
pub struct PlayerStats {
    #[primary_key]
    pub identity: Identity,
    pub display_name: String,
    pub highest_ring_count: u32,
    pub updated_at_ms: i64,
}
