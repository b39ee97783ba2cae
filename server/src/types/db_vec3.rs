use nalgebra as na;
use spacetimedb::SpacetimeType;

/// A 3D vector in world space.
///
/// Used for positions, velocities and directions in reducer arguments. Rows store
/// their scalars flat so clients can filter on individual axes.
#[derive(SpacetimeType, Clone, Copy, Debug, PartialEq, Default)]
pub struct DbVec3 {
    /// X axis (east-west)
    pub x: f32,
    /// Y axis (up-down)
    pub y: f32,
    /// Z axis (north-south)
    pub z: f32,
}

impl DbVec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<DbVec3> for na::Vector3<f32> {
    fn from(v: DbVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<na::Vector3<f32>> for DbVec3 {
    fn from(v: na::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
