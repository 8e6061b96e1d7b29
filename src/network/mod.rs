//! Electrical network model.
//!
//! A [`Network`] owns flat element tables (buses, lines, loads, generators,
//! external grids) with sequential integer identifiers, mirroring the tabular
//! data model of established load-flow packages. The builder primitives are
//! the only way elements enter a network, so cross-references are validated
//! at insertion time.

pub mod elements;
pub mod model;
pub mod std_types;

pub use elements::{Bus, BusId, ExtGrid, Generator, Line, Load};
pub use model::{Network, NetworkError};
pub use std_types::{standard_type, LineParams};
