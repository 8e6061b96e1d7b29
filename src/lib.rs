//! Grid power-flow simulation service.
//!
//! The crate is organized into modules:
//! - `config` - Layered configuration (TOML file + environment)
//! - `network` - Electrical network model and builder primitives
//! - `solver` - Newton-Raphson load-flow engine and result tables
//! - `simulator` - Stateful simulation session returning status envelopes
//! - `api` - HTTP endpoints exposing the session
//! - `telemetry` - Tracing setup and shutdown signal handling

pub mod api;
pub mod config;
pub mod network;
pub mod simulator;
pub mod solver;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use simulator::GridSimulator;
pub use state::AppState;
