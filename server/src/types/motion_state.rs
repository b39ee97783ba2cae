use shared::rows as sim;

/// Locomotion label broadcast to other clients for animation.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum MotionState {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
}

impl From<sim::MotionState> for MotionState {
    fn from(v: sim::MotionState) -> Self {
        match v {
            sim::MotionState::Idle => Self::Idle,
            sim::MotionState::Walk => Self::Walk,
            sim::MotionState::Run => Self::Run,
            sim::MotionState::Jump => Self::Jump,
            sim::MotionState::Fall => Self::Fall,
        }
    }
}

impl From<MotionState> for sim::MotionState {
    fn from(v: MotionState) -> Self {
        match v {
            MotionState::Idle => Self::Idle,
            MotionState::Walk => Self::Walk,
            MotionState::Run => Self::Run,
            MotionState::Jump => Self::Jump,
            MotionState::Fall => Self::Fall,
        }
    }
}
