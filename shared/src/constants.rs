//! World-level constants shared by the server module and any client that mirrors it.
//!
//! Tunables that a host may want to override at runtime live in [`crate::settings`];
//! the values here define the shape of the world itself and are never overridden.

/// Size of one square chunk in world units.
pub const CHUNK_SIZE: f32 = 32.0;

/// Inverse of [`CHUNK_SIZE`], precomputed for chunk lookups.
pub const INV_CHUNK_SIZE: f32 = 1.0 / CHUNK_SIZE;

/// Half the world span on the X and Z axes. Positions are clamped to
/// `[-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT]` on both planar axes.
pub const WORLD_HALF_EXTENT: f32 = 2048.0;

/// Lowest representable altitude.
pub const WORLD_MIN_Y: f32 = -64.0;

/// Highest representable altitude.
pub const WORLD_MAX_Y: f32 = 512.0;

/// Upper bound for any ring counter (inventory and high-water mark).
pub const MAX_RING_COUNT: u32 = 999;

/// Where players appear when they first connect.
pub const SPAWN_X: f32 = 0.0;
pub const SPAWN_Z: f32 = 0.0;

/// Height above the sampled terrain at which players spawn.
pub const SPAWN_CLEARANCE: f32 = 1.0;

/// Keeps spawned entities away from chunk borders so neighbours never overlap.
pub const SPAWN_EDGE_MARGIN: f32 = 3.0;

/// Bound on the terrain height field; `|terrain_height(x, z)| <= TERRAIN_MAX_AMPLITUDE`.
pub const TERRAIN_MAX_AMPLITUDE: f32 = 6.0;

/// Primary key of the singleton world row.
pub const WORLD_STATE_ID: &str = "global";

/// Length of a full day/night cycle.
pub const DAY_CYCLE_DURATION_SECONDS: u32 = 600;

/// Maximum display name length, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 24;

/// Name used when a client sends an empty or unusable display name.
pub const DEFAULT_DISPLAY_NAME: &str = "Player";

/// Maximum chat message length, in characters (after trimming).
pub const MAX_CHAT_MESSAGE_CHARS: usize = 160;

/// Minimum planar motion required to update a facing yaw (units squared).
pub const YAW_EPS: f32 = 1.0e-6;
