pub mod errors;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod startup;
pub mod state;

pub use startup::{run, run_with_config};
