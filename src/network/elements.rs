use serde::Serialize;

use super::std_types::LineParams;

/// Index into the bus table. Assigned sequentially from 0 and stable for the
/// lifetime of the network.
pub type BusId = usize;

/// A node of the network at a given nominal voltage level.
#[derive(Debug, Clone, Serialize)]
pub struct Bus {
    pub name: String,
    /// Nominal voltage in kV.
    pub vn_kv: f64,
}

/// External grid connection. Provides the slack (voltage and angle reference)
/// for the load flow.
#[derive(Debug, Clone, Serialize)]
pub struct ExtGrid {
    pub bus: BusId,
    /// Voltage magnitude setpoint in per-unit.
    pub vm_pu: f64,
    pub name: String,
}

/// A line connecting two buses, with electrical parameters resolved from a
/// standard type at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub from_bus: BusId,
    pub to_bus: BusId,
    pub length_km: f64,
    pub params: LineParams,
    pub name: String,
}

/// Constant-power demand at a bus.
#[derive(Debug, Clone, Serialize)]
pub struct Load {
    pub bus: BusId,
    pub p_mw: f64,
    pub q_mvar: f64,
    pub name: String,
}

/// Voltage-controlled (PV) generator injection at a bus.
#[derive(Debug, Clone, Serialize)]
pub struct Generator {
    pub bus: BusId,
    pub p_mw: f64,
    /// Voltage magnitude setpoint in per-unit.
    pub vm_pu: f64,
    pub name: String,
}
