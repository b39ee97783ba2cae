use shared::rows as sim;

/// What produced a ring drop.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum RingSource {
    MysteryBox,
    Goomba,
    /// Scattered from a player who got hit.
    Spill,
}

impl From<sim::RingSource> for RingSource {
    fn from(v: sim::RingSource) -> Self {
        match v {
            sim::RingSource::MysteryBox => Self::MysteryBox,
            sim::RingSource::Goomba => Self::Goomba,
            sim::RingSource::Spill => Self::Spill,
        }
    }
}

impl From<RingSource> for sim::RingSource {
    fn from(v: RingSource) -> Self {
        match v {
            RingSource::MysteryBox => Self::MysteryBox,
            RingSource::Goomba => Self::Goomba,
            RingSource::Spill => Self::Spill,
        }
    }
}
