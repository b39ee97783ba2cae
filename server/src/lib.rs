mod reducers {
    mod chat;
    mod combat;
    mod connection;
    mod player_state;
    mod rings;
}
pub mod schema;
mod store;
pub mod types;
mod utils;

use crate::schema::*;
use spacetimedb::*;
use utils::{with_sim, SIM_SETTINGS_ID};

#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    ctx.db.sim_settings().id().delete(SIM_SETTINGS_ID);
    ctx.db.sim_settings().insert(SimSettingsRow::from_settings(
        SIM_SETTINGS_ID,
        &shared::SimSettings::default(),
    ));

    with_sim(ctx, |sim| {
        sim.bootstrap_world();
    });
}
