use thiserror::Error;

use super::elements::{Bus, BusId, ExtGrid, Generator, Line, Load};
use super::std_types::{standard_type, LineParams};

/// Errors from the network builder primitives.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("bus {0} does not exist in this network")]
    UnknownBus(BusId),

    #[error("line {0} does not exist in this network")]
    UnknownLine(usize),

    #[error("unknown line standard type '{0}'")]
    UnknownStandardType(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// An electrical network: element tables plus the per-unit bases shared by
/// every calculation on it.
#[derive(Debug, Clone)]
pub struct Network {
    /// Apparent power base in MVA.
    pub sn_mva: f64,
    /// Grid frequency in Hz.
    pub f_hz: f64,
    buses: Vec<Bus>,
    lines: Vec<Line>,
    loads: Vec<Load>,
    generators: Vec<Generator>,
    ext_grids: Vec<ExtGrid>,
}

impl Network {
    pub fn new(sn_mva: f64, f_hz: f64) -> Self {
        Self {
            sn_mva,
            f_hz,
            buses: Vec::new(),
            lines: Vec::new(),
            loads: Vec::new(),
            generators: Vec::new(),
            ext_grids: Vec::new(),
        }
    }

    /// Add a bus at the given nominal voltage. Bus ids are assigned
    /// sequentially and never reused.
    pub fn add_bus(&mut self, vn_kv: f64, name: impl Into<String>) -> BusId {
        self.buses.push(Bus {
            name: name.into(),
            vn_kv,
        });
        self.buses.len() - 1
    }

    /// Attach an external grid (slack reference) to an existing bus.
    pub fn add_ext_grid(
        &mut self,
        bus: BusId,
        vm_pu: f64,
        name: impl Into<String>,
    ) -> Result<usize, NetworkError> {
        self.check_bus(bus)?;
        self.ext_grids.push(ExtGrid {
            bus,
            vm_pu,
            name: name.into(),
        });
        Ok(self.ext_grids.len() - 1)
    }

    /// Add a line between two existing buses, resolving its electrical
    /// parameters from the standard-type table.
    pub fn add_line(
        &mut self,
        from_bus: BusId,
        to_bus: BusId,
        length_km: f64,
        std_type: &str,
        name: impl Into<String>,
    ) -> Result<usize, NetworkError> {
        let params = standard_type(std_type)
            .ok_or_else(|| NetworkError::UnknownStandardType(std_type.to_string()))?;
        self.add_line_from_parameters(from_bus, to_bus, length_km, params, name)
    }

    /// Add a line with explicit per-kilometre parameters.
    pub fn add_line_from_parameters(
        &mut self,
        from_bus: BusId,
        to_bus: BusId,
        length_km: f64,
        params: LineParams,
        name: impl Into<String>,
    ) -> Result<usize, NetworkError> {
        self.check_bus(from_bus)?;
        self.check_bus(to_bus)?;
        if length_km <= 0.0 {
            return Err(NetworkError::InvalidParameter(format!(
                "line length must be positive, got {length_km} km"
            )));
        }
        self.lines.push(Line {
            from_bus,
            to_bus,
            length_km,
            params,
            name: name.into(),
        });
        Ok(self.lines.len() - 1)
    }

    /// Add a constant-power load at an existing bus.
    pub fn add_load(
        &mut self,
        bus: BusId,
        p_mw: f64,
        q_mvar: f64,
        name: impl Into<String>,
    ) -> Result<usize, NetworkError> {
        self.check_bus(bus)?;
        self.loads.push(Load {
            bus,
            p_mw,
            q_mvar,
            name: name.into(),
        });
        Ok(self.loads.len() - 1)
    }

    /// Add a voltage-controlled generator at an existing bus.
    pub fn add_generator(
        &mut self,
        bus: BusId,
        p_mw: f64,
        vm_pu: f64,
        name: impl Into<String>,
    ) -> Result<usize, NetworkError> {
        self.check_bus(bus)?;
        self.generators.push(Generator {
            bus,
            p_mw,
            vm_pu,
            name: name.into(),
        });
        Ok(self.generators.len() - 1)
    }

    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.buses.get(id)
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn ext_grids(&self) -> &[ExtGrid] {
        &self.ext_grids
    }

    fn check_bus(&self, bus: BusId) -> Result<(), NetworkError> {
        if bus < self.buses.len() {
            Ok(())
        } else {
            Err(NetworkError::UnknownBus(bus))
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(100.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_ids_are_sequential() {
        let mut net = Network::default();
        assert_eq!(net.add_bus(110.0, "a"), 0);
        assert_eq!(net.add_bus(110.0, "b"), 1);
        assert_eq!(net.add_bus(20.0, "c"), 2);
        assert_eq!(net.buses().len(), 3);
    }

    #[test]
    fn test_line_rejects_unknown_bus() {
        let mut net = Network::default();
        let a = net.add_bus(110.0, "a");
        let err = net
            .add_line(a, 7, 10.0, "15-AL1/2.4-ST1A 10.0", "dangling")
            .unwrap_err();
        assert!(matches!(err, NetworkError::UnknownBus(7)));
    }

    #[test]
    fn test_line_rejects_unknown_std_type() {
        let mut net = Network::default();
        let a = net.add_bus(110.0, "a");
        let b = net.add_bus(110.0, "b");
        let err = net.add_line(a, b, 10.0, "no-such-type", "l").unwrap_err();
        assert!(matches!(err, NetworkError::UnknownStandardType(_)));
    }

    #[test]
    fn test_line_rejects_nonpositive_length() {
        let mut net = Network::default();
        let a = net.add_bus(110.0, "a");
        let b = net.add_bus(110.0, "b");
        let err = net
            .add_line(a, b, 0.0, "15-AL1/2.4-ST1A 10.0", "l")
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidParameter(_)));
    }

    #[test]
    fn test_ext_grid_requires_existing_bus() {
        let mut net = Network::default();
        assert!(net.add_ext_grid(0, 1.0, "grid").is_err());
        net.add_bus(110.0, "a");
        assert!(net.add_ext_grid(0, 1.0, "grid").is_ok());
        assert_eq!(net.ext_grids().len(), 1);
    }
}
