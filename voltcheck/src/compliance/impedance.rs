//! Line and Loop Impedance Limits
//!
//! Line mode verifies the phase-neutral fault loop is low enough for the
//! breaker's magnetic element to clear a short: `Z ≤ U0 / (In · k)` with
//! the curve factor `k` fixed per curve class. Manufacturer-specific
//! factor tables were deliberately collapsed to these regulatory
//! constants; protection levels are uniform across brands.
//!
//! Loop mode bounds the phase-earth loop so the touch voltage during a
//! fault stays under the safety limit for the environment:
//! `Z ≤ UL / IΔn`, with the derived contact voltage `Uc = Z · IΔn`.

use serde::{Deserialize, Serialize};

/// Nominal phase voltage used by the line-mode limit (V).
pub const NOMINAL_VOLTAGE: f64 = 230.0;
/// Touch voltage limit in dry locations (V).
pub const CONTACT_VOLTAGE_LIMIT_DRY: f64 = 50.0;
/// Touch voltage limit in humid/wet locations (V).
pub const CONTACT_VOLTAGE_LIMIT_HUMID: f64 = 24.0;

/// Magnetic trip curve class of the breaker under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveClass {
    B,
    C,
    D,
}

impl CurveClass {
    /// Instantaneous trip multiple `Ia = k · In`.
    pub fn factor(self) -> f64 {
        match self {
            CurveClass::B => 5.0,
            CurveClass::C => 10.0,
            CurveClass::D => 20.0,
        }
    }
}

impl std::fmt::Display for CurveClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveClass::B => write!(f, "B"),
            CurveClass::C => write!(f, "C"),
            CurveClass::D => write!(f, "D"),
        }
    }
}

/// Result of a line-mode check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineCheck {
    pub limit_ohms: f64,
    pub measured_ohms: f64,
    pub pass: bool,
}

/// Maximum line impedance for a breaker rating and curve.
pub fn line_limit(rated_amps: f64, curve: CurveClass) -> f64 {
    NOMINAL_VOLTAGE / (rated_amps * curve.factor())
}

/// Check a measured line impedance against the curve limit.
pub fn check_line(measured_ohms: f64, rated_amps: f64, curve: CurveClass) -> LineCheck {
    let limit = line_limit(rated_amps, curve);
    LineCheck {
        limit_ohms: limit,
        measured_ohms,
        pass: measured_ohms <= limit,
    }
}

/// Touch voltage limit for the environment.
pub fn contact_voltage_limit(humid: bool) -> f64 {
    if humid {
        CONTACT_VOLTAGE_LIMIT_HUMID
    } else {
        CONTACT_VOLTAGE_LIMIT_DRY
    }
}

/// Maximum earth loop impedance for an RCD sensitivity and environment.
pub fn loop_limit(sensitivity_ma: f64, humid: bool) -> f64 {
    contact_voltage_limit(humid) / (sensitivity_ma / 1000.0)
}

/// Result of a loop-mode check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopCheck {
    pub limit_ohms: f64,
    pub measured_ohms: f64,
    /// `Uc = Z · IΔn`, the voltage an exposed part would reach on a fault.
    pub contact_voltage: f64,
    pub voltage_limit: f64,
    pub impedance_ok: bool,
    pub contact_voltage_ok: bool,
    /// Overall verdict: both bounds must hold.
    pub pass: bool,
}

/// Check a measured earth loop impedance against the RCD's sensitivity.
pub fn check_loop(measured_ohms: f64, sensitivity_ma: f64, humid: bool) -> LoopCheck {
    let sensitivity_amps = sensitivity_ma / 1000.0;
    let voltage_limit = contact_voltage_limit(humid);
    let limit = voltage_limit / sensitivity_amps;
    let contact_voltage = measured_ohms * sensitivity_amps;
    let impedance_ok = measured_ohms <= limit;
    let contact_voltage_ok = contact_voltage <= voltage_limit;
    LoopCheck {
        limit_ohms: limit,
        measured_ohms,
        contact_voltage,
        voltage_limit,
        impedance_ok,
        contact_voltage_ok,
        pass: impedance_ok && contact_voltage_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_factors_are_regulatory_constants() {
        assert_eq!(CurveClass::B.factor(), 5.0);
        assert_eq!(CurveClass::C.factor(), 10.0);
        assert_eq!(CurveClass::D.factor(), 20.0);
    }

    #[test]
    fn line_limit_16a_curve_c() {
        let limit = line_limit(16.0, CurveClass::C);
        assert!((limit - 1.4375).abs() < 1e-9);
        assert!(check_line(1.4, 16.0, CurveClass::C).pass);
        assert!(!check_line(1.5, 16.0, CurveClass::C).pass);
    }

    #[test]
    fn line_limit_is_inclusive_at_the_bound() {
        assert!(check_line(1.4375, 16.0, CurveClass::C).pass);
    }

    #[test]
    fn loop_dry_30ma() {
        let check = check_loop(1000.0, 30.0, false);
        assert!((check.limit_ohms - 50.0 / 0.03).abs() < 1e-9);
        assert!((check.contact_voltage - 30.0).abs() < 1e-9);
        assert!(check.pass);
        assert!(check.contact_voltage_ok);
    }

    #[test]
    fn loop_humid_tightens_the_limit() {
        let dry = check_loop(1000.0, 30.0, false);
        let humid = check_loop(1000.0, 30.0, true);
        assert!(humid.limit_ohms < dry.limit_ohms);
        assert!((humid.limit_ohms - 24.0 / 0.03).abs() < 1e-9);
        // 1000 Ω at 30 mA derives 30 V, above the 24 V humid limit.
        assert!(!humid.pass);
        assert!(!humid.contact_voltage_ok);
    }

    #[test]
    fn loop_overall_verdict_requires_both_bounds() {
        let failing = check_loop(2000.0, 30.0, false);
        assert!(!failing.impedance_ok);
        assert!(!failing.contact_voltage_ok);
        assert!(!failing.pass);
    }
}
