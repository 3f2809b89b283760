pub mod routes;
pub mod startup;
pub mod errors;
pub mod openapi;

pub use startup::{build_app, run, run_with_shutdown};
