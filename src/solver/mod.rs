//! Load-flow engine.
//!
//! Assembles the per-unit nodal admittance matrix for a [`Network`], solves
//! the power-flow equations with a dense polar Newton-Raphson and projects
//! the converged voltage vector into per-bus and per-line result tables.
//! Dense linear algebra is deliberate: the service targets networks of a few
//! dozen buses at most, where factorizing the full Jacobian is cheaper than
//! any sparse bookkeeping.

pub mod newton;
pub mod results;
pub mod ybus;

pub use results::{BusRow, LineRow, LoadFlowReport};

use nalgebra::DVector;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::network::Network;

/// Tuning knobs for the Newton-Raphson iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Convergence threshold on the infinity norm of the power mismatch, in
    /// per-unit.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 30,
        }
    }
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("load flow did not converge within {0} iterations")]
    DidNotConverge(usize),

    #[error("network has no buses")]
    EmptyNetwork,

    #[error("network has no external grid to provide a slack reference")]
    NoSlackBus,

    #[error("multiple external grids are not supported")]
    MultipleSlackBuses,

    #[error("jacobian is singular; the network may be disconnected")]
    SingularJacobian,
}

/// Role of a bus in the load-flow equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    /// Voltage magnitude and angle fixed; balances the network.
    Slack,
    /// Active power and voltage magnitude fixed (generator bus).
    Pv,
    /// Active and reactive power fixed (load bus).
    Pq,
}

/// Run a full load-flow calculation on the network.
///
/// The report's `duration` covers classification, matrix assembly, the
/// Newton iteration and result extraction.
pub fn run_load_flow(net: &Network, options: SolverOptions) -> Result<LoadFlowReport, SolveError> {
    let started = Instant::now();

    let spec = classify(net)?;
    let ybus = ybus::build_ybus(net);
    let (v, iterations) = newton::newton_pf(
        &ybus,
        &spec.p_spec,
        &spec.q_spec,
        &spec.kinds,
        &spec.vm0,
        options,
    )?;

    debug!(iterations, "load flow converged");
    Ok(results::extract_report(
        net,
        &v,
        iterations,
        started.elapsed(),
    ))
}

/// Scheduled injections and bus roles derived from the element tables.
struct BusSpec {
    kinds: Vec<BusKind>,
    /// Scheduled active injection per bus, per-unit, generation positive.
    p_spec: DVector<f64>,
    /// Scheduled reactive injection per bus, per-unit (meaningful for PQ buses).
    q_spec: DVector<f64>,
    /// Initial voltage magnitudes: setpoints at slack/PV buses, flat start
    /// elsewhere.
    vm0: DVector<f64>,
}

fn classify(net: &Network) -> Result<BusSpec, SolveError> {
    let n = net.buses().len();
    if n == 0 {
        return Err(SolveError::EmptyNetwork);
    }
    let slack = match net.ext_grids() {
        [] => return Err(SolveError::NoSlackBus),
        [only] => only,
        _ => return Err(SolveError::MultipleSlackBuses),
    };

    let mut kinds = vec![BusKind::Pq; n];
    let mut p_spec = DVector::zeros(n);
    let mut q_spec = DVector::zeros(n);
    let mut vm0 = DVector::from_element(n, 1.0);

    for gen in net.generators() {
        if gen.bus != slack.bus {
            kinds[gen.bus] = BusKind::Pv;
            vm0[gen.bus] = gen.vm_pu;
        }
        p_spec[gen.bus] += gen.p_mw / net.sn_mva;
    }
    for load in net.loads() {
        p_spec[load.bus] -= load.p_mw / net.sn_mva;
        q_spec[load.bus] -= load.q_mvar / net.sn_mva;
    }

    kinds[slack.bus] = BusKind::Slack;
    vm0[slack.bus] = slack.vm_pu;

    Ok(BusSpec {
        kinds,
        p_spec,
        q_spec,
        vm0,
    })
}
