//! pokegraph - a terminal Pokédex over a GraphQL API
//!
//! The binary wires these modules into a tui-dispatch app; the library
//! exposes them for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod route;
pub mod state;
pub mod telemetry;
