use shared::rows as sim;

#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum MysteryBoxPhase {
    Ready,
    Depleted,
}

impl From<sim::MysteryBoxPhase> for MysteryBoxPhase {
    fn from(v: sim::MysteryBoxPhase) -> Self {
        match v {
            sim::MysteryBoxPhase::Ready => Self::Ready,
            sim::MysteryBoxPhase::Depleted => Self::Depleted,
        }
    }
}

impl From<MysteryBoxPhase> for sim::MysteryBoxPhase {
    fn from(v: MysteryBoxPhase) -> Self {
        match v {
            MysteryBoxPhase::Ready => Self::Ready,
            MysteryBoxPhase::Depleted => Self::Depleted,
        }
    }
}
