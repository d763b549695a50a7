//! Insulation Resistance Thresholds
//!
//! REBT minimums for megger readings: 0.5 MΩ below 500 V test voltage,
//! 1.0 MΩ at 500 V and above. The comparison is made against the raw
//! numeric reading in its recorded unit; a GΩ-range instrument is already
//! orders of magnitude above either floor.

use serde::{Deserialize, Serialize};

/// The megger test voltages the instruments offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestVoltage {
    V250,
    V500,
    V1000,
}

impl TestVoltage {
    pub fn volts(self) -> u32 {
        match self {
            TestVoltage::V250 => 250,
            TestVoltage::V500 => 500,
            TestVoltage::V1000 => 1000,
        }
    }

    pub fn from_volts(volts: u32) -> Option<Self> {
        match volts {
            250 => Some(TestVoltage::V250),
            500 => Some(TestVoltage::V500),
            1000 => Some(TestVoltage::V1000),
            _ => None,
        }
    }
}

/// Reading unit of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResistanceUnit {
    #[serde(rename = "MOhm")]
    MegaOhm,
    #[serde(rename = "GOhm")]
    GigaOhm,
}

impl std::fmt::Display for ResistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResistanceUnit::MegaOhm => write!(f, "MΩ"),
            ResistanceUnit::GigaOhm => write!(f, "GΩ"),
        }
    }
}

/// Minimum acceptable reading for a test voltage.
pub fn threshold(voltage: TestVoltage) -> f64 {
    if voltage.volts() >= 500 {
        1.0
    } else {
        0.5
    }
}

/// Pass check, computed once when the reading is recorded.
pub fn is_acceptable(voltage: TestVoltage, measured: f64) -> bool {
    measured >= threshold(voltage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_by_voltage() {
        assert_eq!(threshold(TestVoltage::V250), 0.5);
        assert_eq!(threshold(TestVoltage::V500), 1.0);
        assert_eq!(threshold(TestVoltage::V1000), 1.0);
    }

    #[test]
    fn boundary_readings() {
        assert!(is_acceptable(TestVoltage::V500, 1.0));
        assert!(!is_acceptable(TestVoltage::V500, 0.99));
        assert!(is_acceptable(TestVoltage::V250, 0.5));
        assert!(!is_acceptable(TestVoltage::V250, 0.49));
        assert!(is_acceptable(TestVoltage::V1000, 1.0));
    }

    #[test]
    fn voltage_round_trips_through_raw_volts() {
        for v in [TestVoltage::V250, TestVoltage::V500, TestVoltage::V1000] {
            assert_eq!(TestVoltage::from_volts(v.volts()), Some(v));
        }
        assert_eq!(TestVoltage::from_volts(400), None);
    }
}
