//! Row shapes of every table the simulation reads or writes.
//!
//! These are storage-agnostic mirrors of the host's tables. The server module
//! declares the actual tables with identical fields and converts at the
//! `WorldStore` boundary.
//!
//! Conventions
//! - Times are milliseconds since the Unix epoch.
//! - Auto-assigned ids (`ring_id`, `event_id`, `message_id`) are inserted as `0`
//!   and the store hands back the stored row with the real id.

use nalgebra as na;

/// Opaque 32-byte player identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlayerId(pub [u8; 32]);

impl PlayerId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Folds the identity into a `u64` seed (first 8 bytes, little-endian).
    pub fn seed(&self) -> u64 {
        let mut seed: u64 = 0;
        for (i, &b) in self.0.iter().take(8).enumerate() {
            seed |= (b as u64) << (i * 8);
        }
        seed
    }
}

/// Client-reported locomotion state, used by other clients for animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
}

impl MotionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
        }
    }

    /// Unknown labels fall back to `Idle`; the state is cosmetic.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "walk" => Self::Walk,
            "run" => Self::Run,
            "jump" => Self::Jump,
            "fall" => Self::Fall,
            _ => Self::Idle,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub identity: PlayerId,
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
    pub last_input_seq: u32,
    pub updated_at_ms: i64,
    pub last_cast_at_ms: Option<i64>,
}

impl PlayerState {
    pub fn position(&self) -> na::Vector3<f32> {
        na::Vector3::new(self.x, self.y, self.z)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInventory {
    pub identity: PlayerId,
    pub ring_count: u32,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerStats {
    pub identity: PlayerId,
    pub display_name: String,
    pub highest_ring_count: u32,
    pub updated_at_ms: i64,
}

/// What produced a ring drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingSource {
    MysteryBox,
    Goomba,
    Spill,
}

impl RingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MysteryBox => "mystery_box",
            Self::Goomba => "goomba",
            Self::Spill => "spill",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingDrop {
    pub ring_id: u64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub source: RingSource,
    pub collected: bool,
    pub spawned_at_ms: i64,
    pub expires_at_ms: i64,
}

impl RingDrop {
    pub fn position(&self) -> na::Vector3<f32> {
        na::Vector3::new(self.x, self.y, self.z)
    }
}

/// Goomba behavior phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GoombaBehavior {
    #[default]
    Idle,
    Charge,
    Enraged,
    Cooldown,
    Defeated,
}

impl GoombaBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Charge => "charge",
            Self::Enraged => "enraged",
            Self::Cooldown => "cooldown",
            Self::Defeated => "defeated",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GoombaState {
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
    pub target_identity: Option<PlayerId>,
    pub state_ends_at_ms: i64,
    /// Deterministic PRNG cursor, advanced one LCG step per tick.
    pub rng_cursor: u32,
    /// Cursor value at spawn; fixes the wander loop's phase for the goomba's life.
    pub wander_seed: u32,
    pub respawn_at_ms: Option<i64>,
    pub updated_at_ms: i64,
}

impl GoombaState {
    pub fn position(&self) -> na::Vector3<f32> {
        na::Vector3::new(self.x, self.y, self.z)
    }

    pub fn spawn_position(&self) -> na::Vector3<f32> {
        na::Vector3::new(self.spawn_x, self.spawn_y, self.spawn_z)
    }
}

/// One chunk's slot for a single entity kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkSpawnState {
    pub chunk_key: String,
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub next_spawn_at_ms: i64,
    pub spawn_sequence: u32,
    pub active_entity_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MysteryBoxPhase {
    #[default]
    Ready,
    Depleted,
}

impl MysteryBoxPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Depleted => "depleted",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MysteryBoxState {
    pub mystery_box_id: String,
    pub chunk_key: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub phase: MysteryBoxPhase,
    pub depleted_at_ms: Option<i64>,
    pub despawn_at_ms: Option<i64>,
}

impl MysteryBoxState {
    pub fn position(&self) -> na::Vector3<f32> {
        na::Vector3::new(self.x, self.y, self.z)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FireballEvent {
    pub event_id: u64,
    pub owner_identity: PlayerId,
    pub origin_x: f32,
    pub origin_y: f32,
    pub origin_z: f32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub dir_z: f32,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessageEvent {
    pub message_id: u64,
    pub owner_identity: PlayerId,
    pub display_name: String,
    pub text: String,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldState {
    pub id: String,
    pub day_cycle_anchor_ms: i64,
    pub day_cycle_duration_seconds: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub connection_id: String,
    pub identity: PlayerId,
    pub connected_at_ms: i64,
}
