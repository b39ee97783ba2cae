use crate::store::player_id;
use crate::utils::with_sim;
use spacetimedb::ReducerContext;

#[spacetimedb::reducer]
pub fn send_chat_message(ctx: &ReducerContext, text: String) -> Result<(), String> {
    let caller = player_id(ctx.sender);
    with_sim(ctx, |sim| sim.send_chat_message(&caller, &text))
        .map(|_| ())
        .map_err(|e| e.to_string())
}
