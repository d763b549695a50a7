//! Conduit fill calculation per ITC-BT-21.
//!
//! The required internal diameter is derived from the summed conductor
//! cross-sections scaled by an installation-dependent fill factor, then
//! matched against the cataloged tube diameters:
//!
//! `d_required = sqrt(4 · Σ(area_i) · k / π)`
//!
//! where `k` is 2.5 for surface runs, 3.0 for embedded and 4.0 for aerial.

use serde::{Deserialize, Serialize};

use crate::conduit::tables::{self, TubeFamily};

/// Multi-core bundle packing inflation: the bundle's equivalent external
/// diameter grows with the square root of the core count, plus a 15%
/// sheath allowance.
const BUNDLE_PACKING_COEFF: f64 = 0.414;
const BUNDLE_SHEATH_ALLOWANCE: f64 = 1.15;

/// Installation environment, selects the fill multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationType {
    Surface,
    Embedded,
    Aerial,
}

impl InstallationType {
    /// Fill multiplier applied to the occupied area.
    pub fn fill_multiplier(self) -> f64 {
        match self {
            InstallationType::Surface => 2.5,
            InstallationType::Embedded => 3.0,
            InstallationType::Aerial => 4.0,
        }
    }
}

/// Conductor format: loose single cores or a sheathed multi-core bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableFormat {
    SingleCore,
    Bundle,
}

/// One line of the cable schedule entering the tube.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableEntry {
    /// Conductor cross-section in mm².
    pub gauge_mm2: f64,
    pub format: CableFormat,
    /// Conductor count inside a bundle; ignored for single cores.
    pub cores: u32,
    /// How many runs of this cable.
    pub quantity: u32,
    /// Measured external diameter override, when the installer has calipers
    /// on the actual cable.
    pub manual_diameter_mm: Option<f64>,
}

impl CableEntry {
    pub fn single(gauge_mm2: f64, quantity: u32) -> Self {
        CableEntry {
            gauge_mm2,
            format: CableFormat::SingleCore,
            cores: 1,
            quantity,
            manual_diameter_mm: None,
        }
    }

    pub fn bundle(gauge_mm2: f64, cores: u32, quantity: u32) -> Self {
        CableEntry {
            gauge_mm2,
            format: CableFormat::Bundle,
            cores,
            quantity,
            manual_diameter_mm: None,
        }
    }

    /// Effective external diameter of one run of this entry.
    pub fn external_diameter_mm(&self) -> f64 {
        if let Some(d) = self.manual_diameter_mm {
            return d;
        }
        let core = tables::single_core_diameter(self.gauge_mm2);
        match self.format {
            CableFormat::SingleCore => core,
            CableFormat::Bundle => {
                core * (1.0 + BUNDLE_PACKING_COEFF * f64::from(self.cores).sqrt())
                    * BUNDLE_SHEATH_ALLOWANCE
            }
        }
    }

    /// Occupied cross-sectional area of all runs of this entry, in mm².
    pub fn occupied_area_mm2(&self) -> f64 {
        let d = self.external_diameter_mm();
        (std::f64::consts::PI * d * d / 4.0) * f64::from(self.quantity)
    }
}

/// Outcome of a sizing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingResult {
    /// Recommended metric size (mm).
    pub metric: u32,
    /// Minimum internal diameter the schedule needs (mm).
    pub required_diameter_mm: f64,
    /// Cataloged internal diameter of the recommended metric (mm).
    pub actual_diameter_mm: f64,
    /// Fill multiplier that was applied.
    pub multiplier: f64,
    /// False when even the largest cataloged tube is too small.
    pub compliant: bool,
}

/// Conduit sizing calculator.
///
/// Pure and infallible: out-of-catalog gauges use the fallback diameter
/// and an oversubscribed schedule returns the largest tube flagged
/// non-compliant.
#[derive(Debug, Clone, Copy)]
pub struct ConduitSizer {
    pub installation: InstallationType,
    pub family: TubeFamily,
}

impl ConduitSizer {
    pub fn new(installation: InstallationType, family: TubeFamily) -> Self {
        ConduitSizer {
            installation,
            family,
        }
    }

    /// Size the tube for a cable schedule. Empty schedules have nothing to
    /// size and return `None`; that is a UI call-to-action, not an error.
    pub fn size(&self, cables: &[CableEntry]) -> Option<SizingResult> {
        if cables.is_empty() {
            return None;
        }

        let occupied: f64 = cables.iter().map(CableEntry::occupied_area_mm2).sum();
        let multiplier = self.installation.fill_multiplier();
        let required = (4.0 * occupied * multiplier / std::f64::consts::PI).sqrt();

        let metric = tables::METRIC_SIZES
            .iter()
            .copied()
            .find(|m| {
                tables::internal_diameter(self.family, *m)
                    .map(|d| d >= required)
                    .unwrap_or(false)
            })
            .unwrap_or_else(tables::max_metric);

        // Catalog covers every listed metric, so the lookup cannot miss.
        let actual = tables::internal_diameter(self.family, metric).unwrap_or(required);

        tracing::debug!(
            metric,
            required_mm = required,
            actual_mm = actual,
            "conduit sizing computed"
        );

        Some(SizingResult {
            metric,
            required_diameter_mm: required,
            actual_diameter_mm: actual,
            multiplier,
            compliant: actual >= required,
        })
    }
}
