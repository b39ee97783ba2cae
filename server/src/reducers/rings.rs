use crate::store::player_id;
use crate::utils::with_sim;
use shared::CommandError;
use spacetimedb::ReducerContext;

/// Picks up a ring drop near the caller.
///
/// An expired ring is deleted and only logged; returning an error would roll the deletion back.
#[spacetimedb::reducer]
pub fn collect_ring(ctx: &ReducerContext, ring_id: u64) -> Result<(), String> {
    let caller = player_id(ctx.sender);
    match with_sim(ctx, |sim| sim.collect_ring(&caller, ring_id)) {
        Ok(count) => {
            log::debug!("{:?} collected ring {ring_id}, now holds {count}", ctx.sender);
            Ok(())
        }
        Err(CommandError::RingExpired) => {
            log::warn!("{:?} tried to collect expired ring {ring_id}", ctx.sender);
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}
