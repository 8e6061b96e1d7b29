use serde::Serialize;

/// Per-kilometre electrical parameters of a line conductor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LineParams {
    pub r_ohm_per_km: f64,
    pub x_ohm_per_km: f64,
    /// Shunt capacitance in nF/km.
    pub c_nf_per_km: f64,
    /// Thermal current limit in kA.
    pub max_i_ka: f64,
}

/// Look up a conductor standard type by its catalogue name.
///
/// The table carries the overhead-line and cable types the service builds
/// networks from; values follow the usual manufacturer catalogue data.
pub fn standard_type(name: &str) -> Option<LineParams> {
    let params = match name {
        "15-AL1/2.4-ST1A 10.0" => LineParams {
            r_ohm_per_km: 1.8769,
            x_ohm_per_km: 0.35,
            c_nf_per_km: 11.0,
            max_i_ka: 0.105,
        },
        "48-AL1/8-ST1A 10.0" => LineParams {
            r_ohm_per_km: 0.5939,
            x_ohm_per_km: 0.372,
            c_nf_per_km: 9.5,
            max_i_ka: 0.21,
        },
        "149-AL1/24-ST1A 110.0" => LineParams {
            r_ohm_per_km: 0.194,
            x_ohm_per_km: 0.41,
            c_nf_per_km: 8.75,
            max_i_ka: 0.47,
        },
        "NAYY 4x50 SE" => LineParams {
            r_ohm_per_km: 0.642,
            x_ohm_per_km: 0.083,
            c_nf_per_km: 210.0,
            max_i_ka: 0.142,
        },
        _ => return None,
    };
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("15-AL1/2.4-ST1A 10.0", 1.8769, 0.105)]
    #[case("149-AL1/24-ST1A 110.0", 0.194, 0.47)]
    #[case("NAYY 4x50 SE", 0.642, 0.142)]
    fn test_known_types_resolve(
        #[case] name: &str,
        #[case] r_ohm_per_km: f64,
        #[case] max_i_ka: f64,
    ) {
        let params = standard_type(name).unwrap();
        assert_eq!(params.r_ohm_per_km, r_ohm_per_km);
        assert_eq!(params.max_i_ka, max_i_ka);
    }

    #[test]
    fn test_unknown_type_is_none() {
        assert!(standard_type("definitely-not-a-conductor").is_none());
    }
}
