use nalgebra as na;

use crate::constants::{WORLD_HALF_EXTENT, WORLD_MAX_Y, WORLD_MIN_Y, YAW_EPS};
use crate::terrain::terrain_height;

/// Distances below this are treated as zero.
pub const DIST_EPS: f32 = 1.0e-4;

/// Facing yaw for a planar (XZ) direction. `None` when the direction is too short to define one.
///
/// Convention: yaw `0` faces `-Z`, positive yaw turns toward `-X`.
pub fn yaw_from_xz(xz: na::Vector2<f32>) -> Option<f32> {
    if xz.norm_squared() > YAW_EPS {
        return Some((-xz.x).atan2(-xz.y));
    }

    None
}

/// Unit planar forward vector for `yaw`; inverse of [`yaw_from_xz`].
#[inline]
pub fn forward_from_yaw(yaw: f32) -> na::Vector2<f32> {
    na::Vector2::new(-yaw.sin(), -yaw.cos())
}

#[inline]
pub fn planar(v: &na::Vector3<f32>) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.z)
}

/// Planar (XZ) distance squared between two world positions.
#[inline]
pub fn planar_distance_sq(a: &na::Vector3<f32>, b: &na::Vector3<f32>) -> f32 {
    (planar(b) - planar(a)).norm_squared()
}

/// Clamps a position to the world box.
pub fn clamp_to_world(p: na::Vector3<f32>) -> na::Vector3<f32> {
    na::Vector3::new(
        p.x.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
        p.y.clamp(WORLD_MIN_Y, WORLD_MAX_Y),
        p.z.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
    )
}

/// Input for a planar step toward a target.
///
/// - The step stops on the acceptance circle around the target (never overshoots).
/// - Inside acceptance, the step is zero.
#[derive(Clone, Copy, Debug)]
pub struct PlanarStepParams {
    pub current: na::Vector2<f32>,
    pub target: na::Vector2<f32>,
    /// Units per second.
    pub speed: f32,
    pub dt_seconds: f32,
    pub acceptance_radius: f32,
}

/// Planar translation toward `target` at `speed` over `dt_seconds`, clamped to the acceptance
/// boundary.
#[inline]
pub fn planar_step(params: PlanarStepParams) -> na::Vector2<f32> {
    let PlanarStepParams {
        current,
        target,
        speed,
        dt_seconds,
        acceptance_radius,
    } = params;

    let delta = target - current;
    let dist = delta.norm();

    let acc = acceptance_radius.max(0.0);
    let max_step = speed.max(0.0) * dt_seconds.max(0.0);
    if dist <= acc + DIST_EPS || max_step <= DIST_EPS {
        return na::Vector2::zeros();
    }

    let step = (dist - acc).min(max_step);
    delta / dist * step
}

/// Result of moving a ground-bound NPC for one tick.
#[derive(Clone, Copy, Debug)]
pub struct GroundStep {
    pub position: na::Vector3<f32>,
    /// New facing, when the NPC moved far enough to define one.
    pub yaw: Option<f32>,
}

/// Moves a ground-bound mover along the XZ plane toward `target`, clamps it to the world and
/// re-samples the terrain so it stays `ground_offset` above the surface.
pub fn step_on_ground(
    current: na::Vector3<f32>,
    target: na::Vector2<f32>,
    speed: f32,
    dt_seconds: f32,
    acceptance_radius: f32,
    ground_offset: f32,
) -> GroundStep {
    let translation = planar_step(PlanarStepParams {
        current: planar(&current),
        target,
        speed,
        dt_seconds,
        acceptance_radius,
    });

    let moved = planar(&current) + translation;
    let mut position = clamp_to_world(na::Vector3::new(moved.x, current.y, moved.y));
    position.y = (terrain_height(position.x, position.z) + ground_offset).clamp(WORLD_MIN_Y, WORLD_MAX_Y);

    GroundStep {
        position,
        yaw: yaw_from_xz(target - planar(&current)),
    }
}

/// Moves a ground-bound mover `speed * dt` along its facing `yaw`; the forward-run variant of
/// [`step_on_ground`] used by charging NPCs.
pub fn advance_along_yaw(
    current: na::Vector3<f32>,
    yaw: f32,
    speed: f32,
    dt_seconds: f32,
    ground_offset: f32,
) -> na::Vector3<f32> {
    let d = forward_from_yaw(yaw) * (speed.max(0.0) * dt_seconds.max(0.0));
    let mut position = clamp_to_world(na::Vector3::new(current.x + d.x, current.y, current.z + d.y));
    position.y = (terrain_height(position.x, position.z) + ground_offset).clamp(WORLD_MIN_Y, WORLD_MAX_Y);
    position
}
