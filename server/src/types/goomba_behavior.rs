use shared::rows as sim;

#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum GoombaBehavior {
    Idle,
    Charge,
    Enraged,
    Cooldown,
    Defeated,
}

impl From<sim::GoombaBehavior> for GoombaBehavior {
    fn from(v: sim::GoombaBehavior) -> Self {
        match v {
            sim::GoombaBehavior::Idle => Self::Idle,
            sim::GoombaBehavior::Charge => Self::Charge,
            sim::GoombaBehavior::Enraged => Self::Enraged,
            sim::GoombaBehavior::Cooldown => Self::Cooldown,
            sim::GoombaBehavior::Defeated => Self::Defeated,
        }
    }
}

impl From<GoombaBehavior> for sim::GoombaBehavior {
    fn from(v: GoombaBehavior) -> Self {
        match v {
            GoombaBehavior::Idle => Self::Idle,
            GoombaBehavior::Charge => Self::Charge,
            GoombaBehavior::Enraged => Self::Enraged,
            GoombaBehavior::Cooldown => Self::Cooldown,
            GoombaBehavior::Defeated => Self::Defeated,
        }
    }
}
