//! Stateful simulation session.
//!
//! A [`GridSimulator`] owns at most one network and the results of its most
//! recent solve. Every operation traps failures from the model and the
//! solver and converts them into a status envelope; nothing panics or
//! propagates across this boundary.

pub mod envelope;

pub use envelope::{
    BusRecord, BusResultsResponse, CreateNetworkResponse, ElementCounts, LineRecord,
    LineResultsResponse, NetworkSummaryResponse, PowerFlowResponse, SolveSummary,
};

use chrono::Utc;
use tracing::{info, warn};

use crate::network::{Network, NetworkError};
use crate::solver::{run_load_flow, LoadFlowReport, SolveError, SolverOptions};
use envelope::error_trace;

const ERR_NOT_INITIALIZED: &str = "Network not initialized. Call create_simple_network first.";
const ERR_NO_RESULTS: &str = "No simulation results available";
const ERR_DID_NOT_CONVERGE: &str = "Power flow did not converge";

/// Network-wide bases the session applies to every network it builds.
#[derive(Debug, Clone, Copy)]
pub struct NetworkBases {
    pub sn_mva: f64,
    pub f_hz: f64,
}

impl Default for NetworkBases {
    fn default() -> Self {
        Self {
            sn_mva: 100.0,
            f_hz: 50.0,
        }
    }
}

/// The simulation session.
///
/// Holds no internal locking: a server exposing it concurrently wraps the
/// whole session in one mutex, so operations never interleave.
pub struct GridSimulator {
    options: SolverOptions,
    bases: NetworkBases,
    net: Option<Network>,
    report: Option<LoadFlowReport>,
    /// Kept across network replacement on purpose: a summary query between
    /// `create_simple_network` and the next solve reports the previous
    /// network's figures, matching the session's documented staleness.
    last_summary: Option<SolveSummary>,
}

impl GridSimulator {
    pub fn new(options: SolverOptions, bases: NetworkBases) -> Self {
        Self {
            options,
            bases,
            net: None,
            report: None,
            last_summary: None,
        }
    }

    /// Build the fixed demonstration topology: two 110 kV buses joined by a
    /// 10 km overhead line, an external grid at the first bus and a
    /// 10 MW / 5 MVAr load at the second.
    ///
    /// Replaces any previously held network; result tables of the old
    /// network are dropped with it.
    pub fn create_simple_network(&mut self) -> CreateNetworkResponse {
        match self.build_simple_network() {
            Ok(net) => {
                let response = CreateNetworkResponse::Success {
                    message: "Network created successfully".to_string(),
                    buses: net.buses().len(),
                    lines: net.lines().len(),
                    loads: net.loads().len(),
                    generators: net.generators().len(),
                };
                info!(
                    buses = net.buses().len(),
                    lines = net.lines().len(),
                    "network created"
                );
                self.net = Some(net);
                self.report = None;
                response
            }
            Err(e) => CreateNetworkResponse::Error {
                message: format!("Failed to create network: {e}"),
                traceback: Some(error_trace(&e)),
            },
        }
    }

    fn build_simple_network(&self) -> Result<Network, NetworkError> {
        let mut net = Network::new(self.bases.sn_mva, self.bases.f_hz);

        let bus1 = net.add_bus(110.0, "Bus_1");
        let bus2 = net.add_bus(110.0, "Bus_2");

        net.add_ext_grid(bus1, 1.0, "Grid")?;
        net.add_line(bus1, bus2, 10.0, "15-AL1/2.4-ST1A 10.0", "Line_1-2")?;
        net.add_load(bus2, 10.0, 5.0, "Load_1")?;

        Ok(net)
    }

    /// Run a load-flow calculation on the held network and store its
    /// summary. Repeated calls overwrite the previous summary.
    pub fn run_power_flow(&mut self) -> PowerFlowResponse {
        let Some(net) = &self.net else {
            return PowerFlowResponse::Error {
                message: ERR_NOT_INITIALIZED.to_string(),
                traceback: None,
            };
        };

        match run_load_flow(net, self.options) {
            Ok(report) => {
                let summary = SolveSummary {
                    converged: true,
                    total_losses_mw: report.line.iter().map(|l| l.pl_mw).sum(),
                    total_losses_mvar: report.line.iter().map(|l| l.ql_mvar).sum(),
                    computation_time_ms: report.duration.as_secs_f64() * 1000.0,
                    iterations: report.iterations,
                    solved_at: Utc::now(),
                };
                info!(
                    iterations = report.iterations,
                    total_losses_mw = summary.total_losses_mw,
                    "power flow converged"
                );
                self.report = Some(report);
                self.last_summary = Some(summary.clone());
                PowerFlowResponse::Converged { summary }
            }
            Err(e @ SolveError::DidNotConverge(_)) => {
                warn!(error = %e, "power flow did not converge");
                PowerFlowResponse::Error {
                    message: ERR_DID_NOT_CONVERGE.to_string(),
                    traceback: None,
                }
            }
            Err(e) => PowerFlowResponse::Error {
                message: format!("Simulation failed: {e}"),
                traceback: Some(error_trace(&e)),
            },
        }
    }

    /// Project the per-bus result table of the last solve.
    pub fn get_bus_results(&self) -> BusResultsResponse {
        let (net, report) = match (&self.net, &self.report) {
            (Some(net), Some(report)) if !report.bus.is_empty() => (net, report),
            _ => {
                return BusResultsResponse::Error {
                    message: ERR_NO_RESULTS.to_string(),
                }
            }
        };

        match project_bus_records(net, report) {
            Ok(buses) => BusResultsResponse::Success { buses },
            Err(e) => BusResultsResponse::Error {
                message: e.to_string(),
            },
        }
    }

    /// Project the per-line result table of the last solve.
    pub fn get_line_results(&self) -> LineResultsResponse {
        let (net, report) = match (&self.net, &self.report) {
            (Some(net), Some(report)) if !report.line.is_empty() => (net, report),
            _ => {
                return LineResultsResponse::Error {
                    message: ERR_NO_RESULTS.to_string(),
                }
            }
        };

        match project_line_records(net, report) {
            Ok(lines) => LineResultsResponse::Success { lines },
            Err(e) => LineResultsResponse::Error {
                message: e.to_string(),
            },
        }
    }

    /// Element counts plus the last stored solve summary (or null if no
    /// solve has run yet).
    pub fn get_network_summary(&self) -> NetworkSummaryResponse {
        let Some(net) = &self.net else {
            return NetworkSummaryResponse::Error {
                message: "Network not initialized".to_string(),
            };
        };

        NetworkSummaryResponse::Success {
            network: ElementCounts {
                buses: net.buses().len(),
                lines: net.lines().len(),
                loads: net.loads().len(),
                generators: net.generators().len(),
                external_grids: net.ext_grids().len(),
            },
            simulation: self.last_summary.clone(),
        }
    }
}

impl Default for GridSimulator {
    fn default() -> Self {
        Self::new(SolverOptions::default(), NetworkBases::default())
    }
}

fn project_bus_records(
    net: &Network,
    report: &LoadFlowReport,
) -> Result<Vec<BusRecord>, NetworkError> {
    report
        .bus
        .iter()
        .enumerate()
        .map(|(bus_id, row)| {
            let bus = net.bus(bus_id).ok_or(NetworkError::UnknownBus(bus_id))?;
            Ok(BusRecord {
                bus_id,
                bus_name: bus.name.clone(),
                vm_pu: row.vm_pu,
                va_degree: row.va_degree,
                p_mw: row.p_mw,
                q_mvar: row.q_mvar,
            })
        })
        .collect()
}

fn project_line_records(
    net: &Network,
    report: &LoadFlowReport,
) -> Result<Vec<LineRecord>, NetworkError> {
    report
        .line
        .iter()
        .enumerate()
        .map(|(line_id, row)| {
            let line = net
                .lines()
                .get(line_id)
                .ok_or(NetworkError::UnknownLine(line_id))?;
            Ok(LineRecord {
                line_id,
                line_name: line.name.clone(),
                from_bus: line.from_bus,
                to_bus: line.to_bus,
                p_from_mw: row.p_from_mw,
                p_to_mw: row.p_to_mw,
                pl_mw: row.pl_mw,
                loading_percent: row.loading_percent,
            })
        })
        .collect()
}
