pub mod chat;
pub mod chunk;
pub mod clock;
pub mod commands;
pub mod constants;
pub mod error;
pub mod fireball;
pub mod goomba;
pub mod memory_store;
pub mod motion;
pub mod mystery_box;
pub mod player;
pub mod prune;
pub mod reconcile;
pub mod rings;
pub mod rng;
pub mod rows;
pub mod settings;
pub mod spawn;
pub mod store;
pub mod terrain;

pub use chunk::{ChunkCoord, active_chunks};
pub use clock::SimClock;
pub use commands::{PlayerStateInput, Sim, WorldAdvance};
pub use constants::{CHUNK_SIZE, MAX_RING_COUNT, WORLD_HALF_EXTENT, WORLD_STATE_ID};
pub use error::{CommandError, CommandResult};
pub use memory_store::MemoryStore;
pub use rows::*;
pub use settings::SimSettings;
pub use store::{SlotTable, WorldStore};
pub use terrain::terrain_height;
