mod db_vec3;
mod goomba_behavior;
mod motion_state;
mod mystery_box_phase;
mod ring_source;

pub use db_vec3::DbVec3;
pub use goomba_behavior::GoombaBehavior;
pub use motion_state::MotionState;
pub use mystery_box_phase::MysteryBoxPhase;
pub use ring_source::RingSource;
