//! Connection lifecycle reducers.
//!
//! Behavior
//! - On connect:
//!   - Record a `session` row for the connection.
//!   - Ensure a `player_state` row exists, spawning new players on the terrain near the origin.
//!   - Make sure the `world_state` singleton exists.
//! - On disconnect:
//!   - Drop the `session` row.
//!   - Remove the `player_state` row once the identity has no session left. Inventory and
//!     stats are kept so rings survive a reconnect.

use crate::store::player_id;
use crate::utils::{connection_key, with_sim};
use spacetimedb::ReducerContext;

#[spacetimedb::reducer(client_connected)]
pub fn identity_connected(ctx: &ReducerContext) {
    let connection = connection_key(ctx);
    log::info!("Client connected: {:?} ({connection})", ctx.sender);

    let caller = player_id(ctx.sender);
    with_sim(ctx, |sim| sim.client_connected(&caller, &connection));
}

#[spacetimedb::reducer(client_disconnected)]
pub fn identity_disconnected(ctx: &ReducerContext) {
    let connection = connection_key(ctx);
    log::info!("Client disconnected: {:?} ({connection})", ctx.sender);

    let caller = player_id(ctx.sender);
    with_sim(ctx, |sim| sim.client_disconnected(&caller, &connection));
}
