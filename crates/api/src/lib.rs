//! CleanOps API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! side-effect dispatch) so integration tests and the binary entrypoint
//! can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod routes;
pub mod side_effects;
pub mod state;
