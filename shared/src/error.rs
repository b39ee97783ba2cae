use thiserror::Error;

/// Every way a command can be rejected.
///
/// The `Display` form is the wire reason string returned to clients, so the
/// set is closed and each string is part of the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CommandError {
    #[error("invalid_numeric_payload")]
    InvalidNumericPayload,
    #[error("player_missing")]
    PlayerMissing,
    #[error("cast_cooldown")]
    CastCooldown,
    #[error("fireball_limit_reached")]
    FireballLimitReached,
    #[error("invalid_direction")]
    InvalidDirection,
    #[error("invalid_spawn_distance")]
    InvalidSpawnDistance,
    #[error("ring_missing")]
    RingMissing,
    #[error("ring_expired")]
    RingExpired,
    #[error("ring_out_of_range")]
    RingOutOfRange,
    #[error("goomba_missing")]
    GoombaMissing,
    #[error("goomba_out_of_range")]
    GoombaOutOfRange,
    #[error("mystery_box_missing")]
    MysteryBoxMissing,
    #[error("mystery_box_out_of_range")]
    MysteryBoxOutOfRange,
    #[error("message_empty")]
    MessageEmpty,
    #[error("message_too_long")]
    MessageTooLong,
}

pub type CommandResult<T = ()> = Result<T, CommandError>;
