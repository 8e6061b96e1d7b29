//! Projection of the converged voltage vector into result tables.
//!
//! Rows are ordered by element id. Bus powers follow the consumer sign
//! convention (consumption positive), line powers are positive flowing into
//! the line at each end, so `p_from + p_to` is the active loss.

use nalgebra::DVector;
use num_complex::Complex64;
use std::time::Duration;

use super::ybus::line_admittances;
use crate::network::Network;

/// Per-bus load-flow result.
#[derive(Debug, Clone, Copy)]
pub struct BusRow {
    pub vm_pu: f64,
    pub va_degree: f64,
    pub p_mw: f64,
    pub q_mvar: f64,
}

/// Per-line load-flow result.
#[derive(Debug, Clone, Copy)]
pub struct LineRow {
    pub p_from_mw: f64,
    pub q_from_mvar: f64,
    pub p_to_mw: f64,
    pub q_to_mvar: f64,
    pub pl_mw: f64,
    pub ql_mvar: f64,
    pub i_from_ka: f64,
    pub i_to_ka: f64,
    pub loading_percent: f64,
}

/// Everything a solve produces: result tables plus execution metadata.
#[derive(Debug, Clone)]
pub struct LoadFlowReport {
    pub bus: Vec<BusRow>,
    pub line: Vec<LineRow>,
    pub iterations: usize,
    pub duration: Duration,
}

pub(crate) fn extract_report(
    net: &Network,
    v: &DVector<Complex64>,
    iterations: usize,
    duration: Duration,
) -> LoadFlowReport {
    LoadFlowReport {
        bus: extract_bus_rows(net, v),
        line: extract_line_rows(net, v),
        iterations,
        duration,
    }
}

fn extract_bus_rows(net: &Network, v: &DVector<Complex64>) -> Vec<BusRow> {
    let ybus = super::ybus::build_ybus(net);
    let currents = &ybus * v;

    (0..net.buses().len())
        .map(|i| {
            let s_injected = v[i] * currents[i].conj() * net.sn_mva;
            BusRow {
                vm_pu: v[i].norm(),
                va_degree: v[i].arg().to_degrees(),
                // Injection positive is generation; flip to consumer convention.
                p_mw: -s_injected.re,
                q_mvar: -s_injected.im,
            }
        })
        .collect()
}

fn extract_line_rows(net: &Network, v: &DVector<Complex64>) -> Vec<LineRow> {
    net.lines()
        .iter()
        .map(|line| {
            let (series, shunt_half) = line_admittances(net, line);
            let (vf, vt) = (v[line.from_bus], v[line.to_bus]);

            let i_from = (vf - vt) * series + vf * shunt_half;
            let i_to = (vt - vf) * series + vt * shunt_half;
            let s_from = vf * i_from.conj() * net.sn_mva;
            let s_to = vt * i_to.conj() * net.sn_mva;

            let vn_kv = net.bus(line.from_bus).map(|b| b.vn_kv).unwrap_or(1.0);
            let i_base_ka = net.sn_mva / (3f64.sqrt() * vn_kv);
            let i_from_ka = i_from.norm() * i_base_ka;
            let i_to_ka = i_to.norm() * i_base_ka;

            LineRow {
                p_from_mw: s_from.re,
                q_from_mvar: s_from.im,
                p_to_mw: s_to.re,
                q_to_mvar: s_to.im,
                pl_mw: s_from.re + s_to.re,
                ql_mvar: s_from.im + s_to.im,
                i_from_ka,
                i_to_ka,
                loading_percent: i_from_ka.max(i_to_ka) / line.params.max_i_ka * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use crate::solver::{run_load_flow, SolverOptions};

    #[test]
    fn test_row_order_follows_element_ids() {
        let mut net = Network::default();
        let b1 = net.add_bus(110.0, "first");
        let b2 = net.add_bus(110.0, "second");
        let b3 = net.add_bus(110.0, "third");
        net.add_ext_grid(b1, 1.0, "grid").unwrap();
        net.add_line(b1, b2, 10.0, "149-AL1/24-ST1A 110.0", "l-a").unwrap();
        net.add_line(b2, b3, 5.0, "149-AL1/24-ST1A 110.0", "l-b").unwrap();
        net.add_load(b3, 5.0, 1.0, "load").unwrap();

        let report = run_load_flow(&net, SolverOptions::default()).unwrap();
        assert_eq!(report.bus.len(), 3);
        assert_eq!(report.line.len(), 2);
        // The downstream line carries less charging current but the same
        // load; both see a voltage below the slack.
        assert!(report.bus[2].vm_pu < report.bus[0].vm_pu);
    }

    #[test]
    fn test_losses_balance_bus_injections() {
        let mut net = Network::default();
        let b1 = net.add_bus(110.0, "a");
        let b2 = net.add_bus(110.0, "b");
        net.add_ext_grid(b1, 1.0, "grid").unwrap();
        net.add_line(b1, b2, 10.0, "15-AL1/2.4-ST1A 10.0", "l").unwrap();
        net.add_load(b2, 10.0, 5.0, "load").unwrap();

        let report = run_load_flow(&net, SolverOptions::default()).unwrap();
        let total_injection: f64 = report.bus.iter().map(|b| b.p_mw).sum();
        let total_loss: f64 = report.line.iter().map(|l| l.pl_mw).sum();
        // Sum of consumer-convention bus powers equals minus the losses.
        assert!((total_injection + total_loss).abs() < 1e-9);
    }
}
