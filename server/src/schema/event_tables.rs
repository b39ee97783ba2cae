use spacetimedb::*;

/// A fireball in flight. Clients simulate the trajectory from origin and direction.
#[table(name = fireball_event, public)]
#[derive(Clone, Debug)]
pub struct FireballEvent {
    #[primary_key]
    #[auto_inc]
    pub event_id: u64,

    #[index(btree)]
    pub owner_identity: Identity,

    pub origin_x: f32,
    pub origin_y: f32,
    pub origin_z: f32,

    /// Unit direction.
    pub dir_x: f32,
    pub dir_y: f32,
    pub dir_z: f32,

    pub created_at_ms: i64,
    #[index(btree)]
    pub expires_at_ms: i64,
}

#[table(name = chat_message_event, public)]
#[derive(Clone, Debug)]
pub struct ChatMessageEvent {
    #[primary_key]
    #[auto_inc]
    pub message_id: u64,

    pub owner_identity: Identity,
    pub display_name: String,
    pub text: String,

    pub created_at_ms: i64,
    #[index(btree)]
    pub expires_at_ms: i64,
}
