//! Grid simulation endpoints.
//!
//! Each handler delegates to the shared session and returns its envelope
//! verbatim as JSON. Failures are reported inside the envelope's `status`
//! field, so the HTTP status is 200 for every answered request.

use axum::{extract::State, response::IntoResponse, Json};

use crate::state::AppState;

/// Create the fixed demonstration network.
pub async fn create_network(State(st): State<AppState>) -> impl IntoResponse {
    let mut sim = st.simulator.lock().await;
    Json(sim.create_simple_network())
}

/// Run a load-flow calculation on the current network.
pub async fn run_simulation(State(st): State<AppState>) -> impl IntoResponse {
    let mut sim = st.simulator.lock().await;
    Json(sim.run_power_flow())
}

/// Voltage and power results per bus.
pub async fn get_bus_results(State(st): State<AppState>) -> impl IntoResponse {
    let sim = st.simulator.lock().await;
    Json(sim.get_bus_results())
}

/// Power-flow results per line.
pub async fn get_line_results(State(st): State<AppState>) -> impl IntoResponse {
    let sim = st.simulator.lock().await;
    Json(sim.get_line_results())
}

/// Element counts plus the last solve summary.
pub async fn get_network_summary(State(st): State<AppState>) -> impl IntoResponse {
    let sim = st.simulator.lock().await;
    Json(sim.get_network_summary())
}
