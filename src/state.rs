use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::simulator::{GridSimulator, NetworkBases};
use crate::solver::SolverOptions;

/// Shared application state handed to every request handler.
///
/// The session itself carries no locking; the single mutex here serializes
/// all access, so concurrent requests cannot race on the shared network.
#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<Mutex<GridSimulator>>,
}

impl AppState {
    pub fn new(cfg: &Config) -> Self {
        let simulator = GridSimulator::new(
            SolverOptions::from(&cfg.solver),
            NetworkBases {
                sn_mva: cfg.network.sn_mva,
                f_hz: cfg.network.f_hz,
            },
        );
        Self {
            simulator: Arc::new(Mutex::new(simulator)),
        }
    }
}
