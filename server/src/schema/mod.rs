mod chunk_spawn_table;
mod event_tables;
mod goomba_table;
mod mystery_box_table;
mod player_inventory_table;
mod player_state_table;
mod ring_drop_table;
mod sim_settings_table;
mod world_state_table;

pub use chunk_spawn_table::*;
pub use event_tables::*;
pub use goomba_table::*;
pub use mystery_box_table::*;
pub use player_inventory_table::*;
pub use player_state_table::*;
pub use ring_drop_table::*;
pub use sim_settings_table::*;
pub use world_state_table::*;
