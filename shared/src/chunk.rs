//! Chunk grid helpers.
//!
//! # Model
//! - The XZ plane is divided into square chunks of `CHUNK_SIZE` units.
//! - A chunk is addressed by signed integer coordinates `(chunk_x, chunk_z)`.
//! - `chunk_x = floor(x / CHUNK_SIZE)`, so chunk `(0, 0)` spans `[0, CHUNK_SIZE)` on both axes.
//!
//! # Keys
//! Slot tables are keyed by a string `"<chunk_x>:<chunk_z>"`. SpacetimeDB primary keys must be
//! a single scalar column, so the pair is packed into one string rather than a composite key.
//!
//! # Activation
//! `active_chunks` returns the union of Chebyshev neighbourhoods around every player, sorted so
//! callers visit chunks in the same order on every invocation.

use std::collections::BTreeSet;

use crate::constants::{CHUNK_SIZE, INV_CHUNK_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing world position `(x, z)`.
    #[inline]
    pub fn containing(x: f32, z: f32) -> Self {
        Self {
            x: (x * INV_CHUNK_SIZE).floor() as i32,
            z: (z * INV_CHUNK_SIZE).floor() as i32,
        }
    }

    /// World position of the chunk's minimum corner.
    #[inline]
    pub fn min_corner(self) -> (f32, f32) {
        (self.x as f32 * CHUNK_SIZE, self.z as f32 * CHUNK_SIZE)
    }

    pub fn key(self) -> String {
        format!("{}:{}", self.x, self.z)
    }

    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, z) = key.split_once(':')?;
        Some(Self::new(x.parse().ok()?, z.parse().ok()?))
    }
}

/// Every chunk within `radius` (Chebyshev) of any of `positions`, deduplicated and sorted.
pub fn active_chunks<I>(positions: I, radius: i32) -> Vec<ChunkCoord>
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let radius = radius.max(0);
    let mut set = BTreeSet::new();
    for (x, z) in positions {
        let center = ChunkCoord::containing(x, z);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                set.insert(ChunkCoord::new(center.x + dx, center.z + dz));
            }
        }
    }
    set.into_iter().collect()
}
