//! Player attacks: fireballs, goomba stomps and mystery box hits.

use crate::store::player_id;
use crate::types::DbVec3;
use crate::utils::with_sim;
use spacetimedb::ReducerContext;

/// Launches a fireball. Costs nothing, but live fireballs are capped by the rings held.
#[spacetimedb::reducer]
pub fn cast_fireball(
    ctx: &ReducerContext,
    origin: DbVec3,
    direction: DbVec3,
) -> Result<(), String> {
    let caller = player_id(ctx.sender);
    let event = with_sim(ctx, |sim| {
        sim.cast_fireball(&caller, origin.into(), direction.into())
    })
    .map_err(|e| e.to_string())?;

    log::debug!("fireball {} cast by {:?}", event.event_id, ctx.sender);
    Ok(())
}

#[spacetimedb::reducer]
pub fn hit_goomba(ctx: &ReducerContext, goomba_id: String) -> Result<(), String> {
    let caller = player_id(ctx.sender);
    with_sim(ctx, |sim| sim.hit_goomba(&caller, &goomba_id)).map_err(|e| e.to_string())
}

#[spacetimedb::reducer]
pub fn hit_mystery_box(ctx: &ReducerContext, mystery_box_id: String) -> Result<(), String> {
    let caller = player_id(ctx.sender);
    with_sim(ctx, |sim| sim.hit_mystery_box(&caller, &mystery_box_id))
        .map_err(|e| e.to_string())
}
