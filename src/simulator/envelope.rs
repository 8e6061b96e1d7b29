//! JSON envelopes returned by every session operation.
//!
//! Each envelope is internally tagged with a `status` field so API consumers
//! can discriminate on it before looking at anything else. The possible tags
//! are exactly `success`, `error` and `converged`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary of the most recent successful solve.
#[derive(Debug, Clone, Serialize)]
pub struct SolveSummary {
    pub converged: bool,
    /// Sum of active losses over all lines, MW.
    pub total_losses_mw: f64,
    /// Sum of reactive losses over all lines, MVAr. Negative when line
    /// charging dominates.
    pub total_losses_mvar: f64,
    pub computation_time_ms: f64,
    pub iterations: usize,
    pub solved_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CreateNetworkResponse {
    Success {
        message: String,
        buses: usize,
        lines: usize,
        loads: usize,
        generators: usize,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        traceback: Option<String>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PowerFlowResponse {
    Converged {
        #[serde(flatten)]
        summary: SolveSummary,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        traceback: Option<String>,
    },
}

/// Per-bus record of a result query.
#[derive(Debug, Clone, Serialize)]
pub struct BusRecord {
    pub bus_id: usize,
    pub bus_name: String,
    pub vm_pu: f64,
    pub va_degree: f64,
    pub p_mw: f64,
    pub q_mvar: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BusResultsResponse {
    Success { buses: Vec<BusRecord> },
    Error { message: String },
}

/// Per-line record of a result query.
#[derive(Debug, Clone, Serialize)]
pub struct LineRecord {
    pub line_id: usize,
    pub line_name: String,
    pub from_bus: usize,
    pub to_bus: usize,
    pub p_from_mw: f64,
    pub p_to_mw: f64,
    pub pl_mw: f64,
    pub loading_percent: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LineResultsResponse {
    Success { lines: Vec<LineRecord> },
    Error { message: String },
}

/// Element counts reported by the network summary.
#[derive(Debug, Clone, Serialize)]
pub struct ElementCounts {
    pub buses: usize,
    pub lines: usize,
    pub loads: usize,
    pub generators: usize,
    pub external_grids: usize,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NetworkSummaryResponse {
    Success {
        network: ElementCounts,
        /// Last stored solve summary, or null before the first solve. May be
        /// stale relative to a freshly replaced network.
        simulation: Option<SolveSummary>,
    },
    Error { message: String },
}

/// Render an error and its source chain for the `traceback` field.
pub(crate) fn error_trace(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
