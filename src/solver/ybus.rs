//! Nodal admittance matrix assembly.

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::network::{Line, Network};

/// Per-unit series admittance and half charging susceptance of a line.
///
/// Impedances are normalized on the from-bus voltage level; both ends of a
/// line sit at the same nominal voltage.
pub(crate) fn line_admittances(net: &Network, line: &Line) -> (Complex64, Complex64) {
    let vn_kv = net
        .bus(line.from_bus)
        .map(|b| b.vn_kv)
        .unwrap_or(1.0);
    let z_base = vn_kv * vn_kv / net.sn_mva;

    let r_pu = line.params.r_ohm_per_km * line.length_km / z_base;
    let x_pu = line.params.x_ohm_per_km * line.length_km / z_base;
    let series = Complex64::new(1.0, 0.0) / Complex64::new(r_pu, x_pu);

    // c_nf_per_km -> farads, then B = 2*pi*f*C in siemens, normalized to pu.
    let c_f = line.params.c_nf_per_km * 1e-9 * line.length_km;
    let b_pu = 2.0 * std::f64::consts::PI * net.f_hz * c_f * z_base;
    let shunt_half = Complex64::new(0.0, b_pu / 2.0);

    (series, shunt_half)
}

/// Assemble the dense per-unit nodal admittance matrix.
pub fn build_ybus(net: &Network) -> DMatrix<Complex64> {
    let n = net.buses().len();
    let mut ybus = DMatrix::from_element(n, n, Complex64::new(0.0, 0.0));

    for line in net.lines() {
        let (series, shunt_half) = line_admittances(net, line);
        let (f, t) = (line.from_bus, line.to_bus);
        ybus[(f, f)] += series + shunt_half;
        ybus[(t, t)] += series + shunt_half;
        ybus[(f, t)] -= series;
        ybus[(t, f)] -= series;
    }

    ybus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    fn sample_net() -> Network {
        let mut net = Network::default();
        let a = net.add_bus(110.0, "a");
        let b = net.add_bus(110.0, "b");
        net.add_line(a, b, 10.0, "15-AL1/2.4-ST1A 10.0", "l").unwrap();
        net
    }

    #[test]
    fn test_ybus_is_symmetric() {
        let ybus = build_ybus(&sample_net());
        assert_eq!(ybus.nrows(), 2);
        assert_eq!(ybus[(0, 1)], ybus[(1, 0)]);
    }

    #[test]
    fn test_off_diagonal_is_negated_series() {
        let net = sample_net();
        let (series, _) = line_admittances(&net, &net.lines()[0]);
        let ybus = build_ybus(&net);
        assert!((ybus[(0, 1)] + series).norm() < 1e-12);
    }

    #[test]
    fn test_diagonal_carries_charging() {
        let net = sample_net();
        let (series, shunt_half) = line_admittances(&net, &net.lines()[0]);
        let ybus = build_ybus(&net);
        assert!((ybus[(0, 0)] - (series + shunt_half)).norm() < 1e-12);
        assert!(shunt_half.im > 0.0);
    }

    #[test]
    fn test_series_impedance_normalization() {
        let net = sample_net();
        let (series, _) = line_admittances(&net, &net.lines()[0]);
        // 10 km of 1.8769 + j0.35 ohm/km on a 121 ohm base.
        let z_base = 110.0 * 110.0 / net.sn_mva;
        let expected = Complex64::new(1.0, 0.0)
            / Complex64::new(18.769 / z_base, 3.5 / z_base);
        assert!((series - expected).norm() < 1e-12);
    }
}
