//! REBT conduit and cable lookup tables (ITC-BT-21).
//!
//! Diameters come from UNE catalog data and are treated as opaque
//! regulatory constants.

use serde::{Deserialize, Serialize};

/// Standard cable cross-sections in mm².
pub const CABLE_GAUGES: [f64; 10] = [1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0];

/// Standard metric conduit sizes in mm, ascending.
pub const METRIC_SIZES: [u32; 7] = [16, 20, 25, 32, 40, 50, 63];

/// External diameter fallback for unknown gauges (mm).
///
/// Matches the 2.5 mm² single-core diameter; sizing never fails on an
/// out-of-catalog gauge, it just uses this and lets the compliance flag
/// speak.
pub const FALLBACK_EXT_DIAMETER_MM: f64 = 3.6;

/// Single-core (H07V-K class) external diameters, keyed by gauge.
const SINGLE_CORE_EXT_DIAMETERS: [(f64, f64); 10] = [
    (1.5, 3.0),
    (2.5, 3.6),
    (4.0, 4.2),
    (6.0, 4.8),
    (10.0, 6.2),
    (16.0, 7.4),
    (25.0, 9.1),
    (35.0, 10.4),
    (50.0, 12.3),
    (70.0, 14.1),
];

/// Tube family: the two REBT conduit branches with distinct wall profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TubeFamily {
    Corrugated,
    Rigid,
}

/// Internal diameters per metric size for corrugated tube (mm).
const CORRUGATED_INTERNAL: [(u32, f64); 7] = [
    (16, 10.7),
    (20, 14.1),
    (25, 18.3),
    (32, 25.3),
    (40, 32.2),
    (50, 41.0),
    (63, 52.0),
];

/// Internal diameters per metric size for rigid tube (mm).
const RIGID_INTERNAL: [(u32, f64); 7] = [
    (16, 13.0),
    (20, 16.9),
    (25, 21.4),
    (32, 27.8),
    (40, 35.4),
    (50, 44.3),
    (63, 56.0),
];

/// External diameter of a single-core conductor for a gauge, or the
/// fallback constant when the gauge is not cataloged.
pub fn single_core_diameter(gauge_mm2: f64) -> f64 {
    SINGLE_CORE_EXT_DIAMETERS
        .iter()
        .find(|(g, _)| (*g - gauge_mm2).abs() < f64::EPSILON)
        .map(|(_, d)| *d)
        .unwrap_or(FALLBACK_EXT_DIAMETER_MM)
}

/// Cataloged internal diameter for a metric size in a tube family.
pub fn internal_diameter(family: TubeFamily, metric: u32) -> Option<f64> {
    let table = match family {
        TubeFamily::Corrugated => &CORRUGATED_INTERNAL,
        TubeFamily::Rigid => &RIGID_INTERNAL,
    };
    table.iter().find(|(m, _)| *m == metric).map(|(_, d)| *d)
}

/// Largest cataloged metric size.
pub fn max_metric() -> u32 {
    METRIC_SIZES[METRIC_SIZES.len() - 1]
}

/// Commercial tube model line with its family and known manufacturers.
#[derive(Debug, Clone, Serialize)]
pub struct TubeModel {
    pub name: &'static str,
    pub family: TubeFamily,
    pub manufacturers: &'static [&'static str],
}

/// Catalog of commercial tube model lines, used for listings only; the
/// sizing math depends exclusively on the family tables above.
pub fn tube_models() -> &'static [TubeModel] {
    const MODELS: &[TubeModel] = &[
        TubeModel {
            name: "Corrugated PVC (320N)",
            family: TubeFamily::Corrugated,
            manufacturers: &["Aiscan", "Solera", "Revi", "Gaestopas", "Gewiss", "Evia", "Famatel"],
        },
        TubeModel {
            name: "Corrugated reinforced (750N)",
            family: TubeFamily::Corrugated,
            manufacturers: &["Aiscan", "Revi", "Pemsa", "Courant", "Canalplast", "Famatel"],
        },
        TubeModel {
            name: "Corrugated LSZH",
            family: TubeFamily::Corrugated,
            manufacturers: &["Aiscan", "Revi", "Gaestopas", "Simon", "Courant", "Dietzel Univolt"],
        },
        TubeModel {
            name: "Rigid PVC plug-in",
            family: TubeFamily::Rigid,
            manufacturers: &["Aiscan", "Solera", "Revi", "Gewiss", "Evia", "Famatel"],
        },
        TubeModel {
            name: "Rigid PVC threadable",
            family: TubeFamily::Rigid,
            manufacturers: &["Aiscan", "Pemsa", "HellermannTyton", "Canalplast", "Adee"],
        },
        TubeModel {
            name: "Rigid LSZH (1250N)",
            family: TubeFamily::Rigid,
            manufacturers: &["Aiscan", "Pemsa", "Interflex", "Simon", "Unex", "Dietzel Univolt"],
        },
        TubeModel {
            name: "Rigid metallic",
            family: TubeFamily::Rigid,
            manufacturers: &["Pemsa", "Basor", "Interflex", "Gaestopas", "Legrand", "OBO Bettermann"],
        },
    ];
    MODELS
}

/// Model lines belonging to one family.
pub fn models_for_family(family: TubeFamily) -> Vec<&'static TubeModel> {
    tube_models().iter().filter(|m| m.family == family).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_gauge_resolves_from_table() {
        assert_eq!(single_core_diameter(1.5), 3.0);
        assert_eq!(single_core_diameter(70.0), 14.1);
    }

    #[test]
    fn unknown_gauge_falls_back() {
        assert_eq!(single_core_diameter(3.0), FALLBACK_EXT_DIAMETER_MM);
        assert_eq!(single_core_diameter(95.0), FALLBACK_EXT_DIAMETER_MM);
    }

    #[test]
    fn internal_diameters_cover_all_metrics() {
        for metric in METRIC_SIZES {
            assert!(internal_diameter(TubeFamily::Corrugated, metric).is_some());
            assert!(internal_diameter(TubeFamily::Rigid, metric).is_some());
        }
        assert_eq!(internal_diameter(TubeFamily::Rigid, 12), None);
    }

    #[test]
    fn rigid_is_wider_than_corrugated_at_every_metric() {
        for metric in METRIC_SIZES {
            let c = internal_diameter(TubeFamily::Corrugated, metric).unwrap();
            let r = internal_diameter(TubeFamily::Rigid, metric).unwrap();
            assert!(r > c, "metric {metric}: rigid {r} <= corrugated {c}");
        }
    }

    #[test]
    fn model_catalog_split_by_family() {
        assert_eq!(models_for_family(TubeFamily::Corrugated).len(), 3);
        assert_eq!(models_for_family(TubeFamily::Rigid).len(), 4);
    }
}
