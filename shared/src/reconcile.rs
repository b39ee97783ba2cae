//! Movement reconciler.
//!
//! Clients own their locomotion and report positions; the server accepts the claim
//! only as far as a legal move allows. Reconciliation never fails: an implausible
//! claim is projected back onto the reachable region instead of being rejected.

use nalgebra as na;

use crate::motion::clamp_to_world;
use crate::settings::MovementSettings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reconciled {
    pub position: na::Vector3<f32>,
    /// Whether the claim had to be pulled back (speed or step limit).
    pub corrected: bool,
}

/// Previous authoritative sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub position: na::Vector3<f32>,
    pub updated_at_ms: i64,
}

/// Bounds `claimed` by what could be reached from `previous` since its timestamp.
///
/// - `dt = max(1, now - previous.updated_at_ms)` milliseconds.
/// - Planar displacement is limited to `max_speed * dt / 1000 + leeway`.
/// - Vertical change is limited to `max_vertical_step`.
/// - The result is clamped to the world box.
///
/// Without a previous sample the claim is only clamped to the world.
pub fn reconcile(
    previous: Option<Anchor>,
    claimed: na::Vector3<f32>,
    settings: &MovementSettings,
    now_ms: i64,
) -> Reconciled {
    let Some(prev) = previous else {
        let position = clamp_to_world(claimed);
        return Reconciled {
            position,
            corrected: position != claimed,
        };
    };

    let dt_ms = (now_ms - prev.updated_at_ms).max(1);
    let max_planar = settings.max_speed * dt_ms as f32 / 1000.0 + settings.leeway;

    let mut planar = na::Vector2::new(claimed.x - prev.position.x, claimed.z - prev.position.z);
    let planar_len = planar.norm();
    let mut corrected = false;
    if planar_len > max_planar {
        planar *= max_planar / planar_len;
        corrected = true;
    }

    let dy_claimed = claimed.y - prev.position.y;
    let dy = dy_claimed.clamp(-settings.max_vertical_step, settings.max_vertical_step);
    corrected |= dy != dy_claimed;

    let unclamped = na::Vector3::new(
        prev.position.x + planar.x,
        prev.position.y + dy,
        prev.position.z + planar.y,
    );
    let position = clamp_to_world(unclamped);
    corrected |= position != unclamped;

    Reconciled { position, corrected }
}
