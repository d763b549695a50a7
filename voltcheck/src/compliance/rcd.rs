//! RCD Trip Validation
//!
//! Decision table for differential breaker tests at the four standard
//! injection levels. Limits follow the REBT acceptance windows: a general
//! purpose device must clear fast, a selective (time-delayed) device must
//! clear inside its delay band so it stays coordinated with downstream
//! protection.

use serde::{Deserialize, Serialize};

/// Max trip time for a standard device at rated current (ms), exclusive.
pub const STANDARD_X1_MAX_MS: f64 = 300.0;
/// Delay band for a selective device at rated current (ms), inclusive.
pub const SELECTIVE_X1_BAND_MS: (f64, f64) = (130.0, 500.0);
/// Max trip time for a standard device at five times rated (ms), exclusive.
pub const STANDARD_X5_MAX_MS: f64 = 40.0;
/// Delay band for a selective device at five times rated (ms), inclusive.
pub const SELECTIVE_X5_BAND_MS: (f64, f64) = (50.0, 150.0);
/// Ramp test acceptance window as fractions of rated sensitivity.
pub const AUTO_WINDOW: (f64, f64) = (0.5, 1.0);

/// The four fixed injection levels of a differential test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcdTestKind {
    /// Half rated sensitivity: the device must hold.
    HalfRated,
    /// Rated sensitivity: the device must trip.
    Rated,
    /// Five times rated: the device must trip fast.
    FiveTimes,
    /// Automatic current ramp: reports the actual trip current.
    Auto,
}

impl RcdTestKind {
    pub const ALL: [RcdTestKind; 4] = [
        RcdTestKind::HalfRated,
        RcdTestKind::Rated,
        RcdTestKind::FiveTimes,
        RcdTestKind::Auto,
    ];

    /// Whether the device is expected to trip at this level.
    pub fn must_trip(self) -> bool {
        !matches!(self, RcdTestKind::HalfRated)
    }

    pub fn label(self) -> &'static str {
        match self {
            RcdTestKind::HalfRated => "x0.5",
            RcdTestKind::Rated => "x1",
            RcdTestKind::FiveTimes => "x5",
            RcdTestKind::Auto => "AUTO",
        }
    }
}

/// Standard (instantaneous) vs selective (time-delayed, "S") device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcdClass {
    Standard,
    Selective,
}

/// One recorded measurement for one injection level.
#[derive(Debug, Clone, Copy, Default)]
pub struct RcdMeasurement {
    pub tripped: bool,
    /// Trip time in ms, for the timed tests.
    pub trip_time_ms: Option<f64>,
    /// Trip current in mA, for the ramp test.
    pub leakage_ma: Option<f64>,
}

/// Why a test failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcdFailure {
    /// Tripped on the half-rated hold test.
    UnexpectedTrip,
    /// Did not trip on a must-trip test.
    NoTrip,
    TimeOutOfRange { measured_ms: f64 },
    LeakageOutOfRange { measured_ma: f64 },
    /// Trip recorded but the measurement field was empty or unparseable.
    MissingMeasurement,
}

impl std::fmt::Display for RcdFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RcdFailure::UnexpectedTrip => write!(f, "tripped below sensitivity threshold"),
            RcdFailure::NoTrip => write!(f, "failed to trip"),
            RcdFailure::TimeOutOfRange { measured_ms } => {
                write!(f, "trip time {measured_ms} ms outside acceptance window")
            }
            RcdFailure::LeakageOutOfRange { measured_ma } => {
                write!(f, "trip current {measured_ma} mA outside acceptance window")
            }
            RcdFailure::MissingMeasurement => write!(f, "no measurement recorded"),
        }
    }
}

/// Verdict for one injection level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcdVerdict {
    Pass,
    Fail(RcdFailure),
    NotTested,
}

impl RcdVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, RcdVerdict::Pass)
    }
}

/// Validate one measurement against the decision table.
///
/// `rated_ma` is the device's rated sensitivity; it only matters for the
/// ramp test window. A trip-expectation mismatch fails immediately,
/// whatever the timing value says.
pub fn validate(
    kind: RcdTestKind,
    class: RcdClass,
    rated_ma: f64,
    measurement: &RcdMeasurement,
) -> RcdVerdict {
    if kind.must_trip() && !measurement.tripped {
        return RcdVerdict::Fail(RcdFailure::NoTrip);
    }

    match kind {
        RcdTestKind::HalfRated => {
            if measurement.tripped {
                RcdVerdict::Fail(RcdFailure::UnexpectedTrip)
            } else {
                RcdVerdict::Pass
            }
        }
        RcdTestKind::Rated => {
            let Some(t) = measurement.trip_time_ms else {
                return RcdVerdict::Fail(RcdFailure::MissingMeasurement);
            };
            let ok = match class {
                RcdClass::Standard => t < STANDARD_X1_MAX_MS,
                RcdClass::Selective => t >= SELECTIVE_X1_BAND_MS.0 && t <= SELECTIVE_X1_BAND_MS.1,
            };
            if ok {
                RcdVerdict::Pass
            } else {
                RcdVerdict::Fail(RcdFailure::TimeOutOfRange { measured_ms: t })
            }
        }
        RcdTestKind::FiveTimes => {
            let Some(t) = measurement.trip_time_ms else {
                return RcdVerdict::Fail(RcdFailure::MissingMeasurement);
            };
            let ok = match class {
                RcdClass::Standard => t < STANDARD_X5_MAX_MS,
                RcdClass::Selective => t >= SELECTIVE_X5_BAND_MS.0 && t <= SELECTIVE_X5_BAND_MS.1,
            };
            if ok {
                RcdVerdict::Pass
            } else {
                RcdVerdict::Fail(RcdFailure::TimeOutOfRange { measured_ms: t })
            }
        }
        RcdTestKind::Auto => {
            let Some(ma) = measurement.leakage_ma else {
                return RcdVerdict::Fail(RcdFailure::MissingMeasurement);
            };
            // Window is the same for both device classes.
            if ma >= rated_ma * AUTO_WINDOW.0 && ma <= rated_ma * AUTO_WINDOW.1 {
                RcdVerdict::Pass
            } else {
                RcdVerdict::Fail(RcdFailure::LeakageOutOfRange { measured_ma: ma })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tripped_at(ms: f64) -> RcdMeasurement {
        RcdMeasurement {
            tripped: true,
            trip_time_ms: Some(ms),
            leakage_ma: None,
        }
    }

    #[test]
    fn half_rated_must_hold() {
        let held = RcdMeasurement::default();
        assert!(validate(RcdTestKind::HalfRated, RcdClass::Standard, 30.0, &held).is_pass());

        // Tripping fails regardless of any timing value.
        let tripped = tripped_at(1.0);
        assert_eq!(
            validate(RcdTestKind::HalfRated, RcdClass::Standard, 30.0, &tripped),
            RcdVerdict::Fail(RcdFailure::UnexpectedTrip)
        );
        assert_eq!(
            validate(RcdTestKind::HalfRated, RcdClass::Selective, 30.0, &tripped),
            RcdVerdict::Fail(RcdFailure::UnexpectedTrip)
        );
    }

    #[test]
    fn rated_standard_boundary_is_exclusive() {
        assert!(validate(RcdTestKind::Rated, RcdClass::Standard, 30.0, &tripped_at(299.0)).is_pass());
        assert_eq!(
            validate(RcdTestKind::Rated, RcdClass::Standard, 30.0, &tripped_at(300.0)),
            RcdVerdict::Fail(RcdFailure::TimeOutOfRange { measured_ms: 300.0 })
        );
    }

    #[test]
    fn rated_selective_band_is_inclusive() {
        for ms in [130.0, 300.0, 500.0] {
            assert!(validate(RcdTestKind::Rated, RcdClass::Selective, 30.0, &tripped_at(ms)).is_pass());
        }
        for ms in [129.9, 500.1] {
            assert!(!validate(RcdTestKind::Rated, RcdClass::Selective, 30.0, &tripped_at(ms)).is_pass());
        }
    }

    #[test]
    fn five_times_windows() {
        assert!(validate(RcdTestKind::FiveTimes, RcdClass::Standard, 30.0, &tripped_at(39.9)).is_pass());
        assert!(!validate(RcdTestKind::FiveTimes, RcdClass::Standard, 30.0, &tripped_at(40.0)).is_pass());
        assert!(validate(RcdTestKind::FiveTimes, RcdClass::Selective, 30.0, &tripped_at(50.0)).is_pass());
        assert!(validate(RcdTestKind::FiveTimes, RcdClass::Selective, 30.0, &tripped_at(150.0)).is_pass());
        assert!(!validate(RcdTestKind::FiveTimes, RcdClass::Selective, 30.0, &tripped_at(49.0)).is_pass());
    }

    #[test]
    fn must_trip_but_did_not_fails_immediately() {
        let held = RcdMeasurement {
            tripped: false,
            trip_time_ms: Some(10.0),
            leakage_ma: Some(20.0),
        };
        for kind in [RcdTestKind::Rated, RcdTestKind::FiveTimes, RcdTestKind::Auto] {
            assert_eq!(
                validate(kind, RcdClass::Standard, 30.0, &held),
                RcdVerdict::Fail(RcdFailure::NoTrip)
            );
        }
    }

    #[test]
    fn auto_window_scales_with_rated_sensitivity() {
        let m = |ma: f64| RcdMeasurement {
            tripped: true,
            trip_time_ms: None,
            leakage_ma: Some(ma),
        };
        assert!(validate(RcdTestKind::Auto, RcdClass::Standard, 30.0, &m(15.0)).is_pass());
        assert!(validate(RcdTestKind::Auto, RcdClass::Standard, 30.0, &m(30.0)).is_pass());
        assert!(!validate(RcdTestKind::Auto, RcdClass::Standard, 30.0, &m(14.9)).is_pass());
        assert!(!validate(RcdTestKind::Auto, RcdClass::Standard, 30.0, &m(31.0)).is_pass());
        // Same window for selective devices.
        assert!(validate(RcdTestKind::Auto, RcdClass::Selective, 300.0, &m(150.0)).is_pass());
    }

    #[test]
    fn missing_measurement_fails_timed_tests() {
        let tripped_no_time = RcdMeasurement {
            tripped: true,
            trip_time_ms: None,
            leakage_ma: None,
        };
        assert_eq!(
            validate(RcdTestKind::Rated, RcdClass::Standard, 30.0, &tripped_no_time),
            RcdVerdict::Fail(RcdFailure::MissingMeasurement)
        );
        assert_eq!(
            validate(RcdTestKind::Auto, RcdClass::Standard, 30.0, &tripped_no_time),
            RcdVerdict::Fail(RcdFailure::MissingMeasurement)
        );
    }
}
