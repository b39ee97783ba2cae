use crate::store::player_id;
use crate::types::DbVec3;
use crate::utils::{with_sim, LogStopwatch};
use shared::PlayerStateInput;
use spacetimedb::ReducerContext;

/// Fraction of heartbeats that log timing spans.
const HEARTBEAT_LOG_SAMPLE_RATE: f32 = 0.001;

/// Client heartbeat: reports the caller's pose and drives the world forward.
///
/// The claimed position is reconciled against the last accepted one; implausible movement
/// is clamped, never rejected. Goomba and mystery box ticks, chunk spawning and the expiry
/// sweep piggyback on this reducer behind their rate-limit gates.
#[spacetimedb::reducer]
#[allow(clippy::too_many_arguments)]
pub fn upsert_player_state(
    ctx: &ReducerContext,
    display_name: String,
    position: DbVec3,
    yaw: f32,
    pitch: f32,
    velocity: DbVec3,
    planar_speed: f32,
    motion_state: String,
    last_input_seq: u32,
) -> Result<(), String> {
    let mut sw = LogStopwatch::new(ctx, "upsert_player_state", false, HEARTBEAT_LOG_SAMPLE_RATE);
    let caller = player_id(ctx.sender);
    let input = PlayerStateInput {
        display_name,
        position: position.into(),
        yaw,
        pitch,
        velocity: velocity.into(),
        planar_speed,
        motion_state,
        last_input_seq,
    };

    sw.span("simulate");
    let advance = with_sim(ctx, |sim| sim.upsert_player_state(&caller, input))
        .map_err(|e| e.to_string())?;

    if sw.should_sample() {
        log::info!(
            "goomba_tick={} mystery_box_tick={} spawned={} pruned={:?}",
            advance.goomba_tick,
            advance.mystery_box_tick,
            advance.spawned.len(),
            advance.pruned.map(|p| p.total())
        );
    }
    Ok(())
}
