//#[macro_use]
extern crate color_eyre;

//#[macro_use]
extern crate derive_new;

pub mod clearpath;
pub mod collision;
pub mod constants;
pub mod errors;
pub mod event_bus;
pub mod footprint;
pub mod map;
pub mod math;
pub mod minimap;
pub mod nav;
pub mod pfmap;
pub mod pfscene;
pub mod raycast;
pub mod render_cmd;
pub mod render_sync;
pub mod selection;
pub mod supercover;
pub mod tile;
