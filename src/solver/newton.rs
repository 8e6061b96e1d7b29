//! Dense polar Newton-Raphson iteration.
//!
//! State vector: voltage angles at every non-slack bus followed by voltage
//! magnitudes at PQ buses. Each step solves the full Jacobian with an LU
//! factorization, which is the right trade-off at the network sizes this
//! service handles.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use super::{BusKind, SolveError, SolverOptions};

pub(crate) fn newton_pf(
    ybus: &DMatrix<Complex64>,
    p_spec: &DVector<f64>,
    q_spec: &DVector<f64>,
    kinds: &[BusKind],
    vm0: &DVector<f64>,
    options: SolverOptions,
) -> Result<(DVector<Complex64>, usize), SolveError> {
    let n = kinds.len();
    let ang: Vec<usize> = (0..n).filter(|&i| kinds[i] != BusKind::Slack).collect();
    let mag: Vec<usize> = (0..n).filter(|&i| kinds[i] == BusKind::Pq).collect();
    let m = ang.len() + mag.len();

    let mut vm = vm0.clone();
    let mut va = DVector::zeros(n);

    // Slack-only network: the voltage profile is fully determined.
    if m == 0 {
        return Ok((to_complex(&vm, &va), 0));
    }

    let g = ybus.map(|y| y.re);
    let b = ybus.map(|y| y.im);

    for iteration in 0..=options.max_iterations {
        let (p_calc, q_calc) = calc_injections(&g, &b, &vm, &va);

        let mut f = DVector::zeros(m);
        for (r, &i) in ang.iter().enumerate() {
            f[r] = p_spec[i] - p_calc[i];
        }
        for (r, &i) in mag.iter().enumerate() {
            f[ang.len() + r] = q_spec[i] - q_calc[i];
        }

        let norm = f.amax();
        if !norm.is_finite() {
            // The iteration blew up; no point continuing.
            return Err(SolveError::DidNotConverge(iteration));
        }
        if norm < options.tolerance {
            return Ok((to_complex(&vm, &va), iteration));
        }
        if iteration == options.max_iterations {
            break;
        }

        let jac = build_jacobian(&g, &b, &vm, &va, &p_calc, &q_calc, &ang, &mag);
        let dx = jac.lu().solve(&f).ok_or(SolveError::SingularJacobian)?;

        for (r, &i) in ang.iter().enumerate() {
            va[i] += dx[r];
        }
        for (r, &i) in mag.iter().enumerate() {
            vm[i] += dx[ang.len() + r];
        }
    }

    Err(SolveError::DidNotConverge(options.max_iterations))
}

/// Active and reactive injections at every bus for the current voltage state.
fn calc_injections(
    g: &DMatrix<f64>,
    b: &DMatrix<f64>,
    vm: &DVector<f64>,
    va: &DVector<f64>,
) -> (DVector<f64>, DVector<f64>) {
    let n = vm.len();
    let mut p = DVector::zeros(n);
    let mut q = DVector::zeros(n);
    for i in 0..n {
        for k in 0..n {
            let (gik, bik) = (g[(i, k)], b[(i, k)]);
            if gik == 0.0 && bik == 0.0 {
                continue;
            }
            let (sin, cos) = (va[i] - va[k]).sin_cos();
            p[i] += vm[i] * vm[k] * (gik * cos + bik * sin);
            q[i] += vm[i] * vm[k] * (gik * sin - bik * cos);
        }
    }
    (p, q)
}

#[allow(clippy::too_many_arguments)]
fn build_jacobian(
    g: &DMatrix<f64>,
    b: &DMatrix<f64>,
    vm: &DVector<f64>,
    va: &DVector<f64>,
    p: &DVector<f64>,
    q: &DVector<f64>,
    ang: &[usize],
    mag: &[usize],
) -> DMatrix<f64> {
    let na = ang.len();
    let m = na + mag.len();
    let mut jac = DMatrix::zeros(m, m);

    // dP/d(theta) and dP/d(V)
    for (r, &i) in ang.iter().enumerate() {
        for (c, &j) in ang.iter().enumerate() {
            jac[(r, c)] = if i == j {
                -q[i] - b[(i, i)] * vm[i] * vm[i]
            } else {
                let (sin, cos) = (va[i] - va[j]).sin_cos();
                vm[i] * vm[j] * (g[(i, j)] * sin - b[(i, j)] * cos)
            };
        }
        for (c, &j) in mag.iter().enumerate() {
            jac[(r, na + c)] = if i == j {
                p[i] / vm[i] + g[(i, i)] * vm[i]
            } else {
                let (sin, cos) = (va[i] - va[j]).sin_cos();
                vm[i] * (g[(i, j)] * cos + b[(i, j)] * sin)
            };
        }
    }

    // dQ/d(theta) and dQ/d(V)
    for (r, &i) in mag.iter().enumerate() {
        for (c, &j) in ang.iter().enumerate() {
            jac[(na + r, c)] = if i == j {
                p[i] - g[(i, i)] * vm[i] * vm[i]
            } else {
                let (sin, cos) = (va[i] - va[j]).sin_cos();
                -vm[i] * vm[j] * (g[(i, j)] * cos + b[(i, j)] * sin)
            };
        }
        for (c, &j) in mag.iter().enumerate() {
            jac[(na + r, na + c)] = if i == j {
                q[i] / vm[i] - b[(i, i)] * vm[i]
            } else {
                let (sin, cos) = (va[i] - va[j]).sin_cos();
                vm[i] * (g[(i, j)] * sin - b[(i, j)] * cos)
            };
        }
    }

    jac
}

fn to_complex(vm: &DVector<f64>, va: &DVector<f64>) -> DVector<Complex64> {
    DVector::from_iterator(
        vm.len(),
        vm.iter()
            .zip(va.iter())
            .map(|(&m, &a)| Complex64::from_polar(m, a)),
    )
}
