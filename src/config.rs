use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::solver::SolverOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub solver: SolverConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl From<&SolverConfig> for SolverOptions {
    fn from(cfg: &SolverConfig) -> Self {
        SolverOptions {
            tolerance: cfg.tolerance,
            max_iterations: cfg.max_iterations,
        }
    }
}

/// Network-wide bases applied to every network the session builds.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Apparent power base in MVA for the per-unit system.
    pub sn_mva: f64,
    /// Grid frequency in Hz, used for line charging susceptance.
    pub f_hz: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("GRIDSIM__").split("__"));
        Ok(figment.extract()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: true,
                request_timeout_secs: 30,
            },
            solver: SolverConfig {
                tolerance: 1e-8,
                max_iterations: 30,
            },
            network: NetworkConfig {
                sn_mva: 100.0,
                f_hz: 50.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_parses() {
        let cfg = Config::default();
        let addr = cfg.server.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_solver_options_from_config() {
        let cfg = Config::default();
        let opts = SolverOptions::from(&cfg.solver);
        assert_eq!(opts.max_iterations, 30);
        assert!(opts.tolerance > 0.0);
    }
}
