//! roombrief API server library.
//!
//! Exposes the building blocks (config, state, controller, error handling,
//! routes, WebSocket infrastructure) so integration tests and the binary
//! entrypoint share them.

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod view;
pub mod ws;
