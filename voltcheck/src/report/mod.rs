//! Report Composer
//!
//! Formats accumulated verification results into a printable document and
//! pre-filled share links. Output is for humans; nothing downstream
//! parses it.

pub mod render;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::compliance::rcd::{RcdTestKind, RcdVerdict};
use crate::core::Outcome;
use crate::project::model::WorkingSet;

/// One RCD line of the report: nameplate data plus the rated-test result.
#[derive(Debug, Clone, Serialize)]
pub struct RcdRow {
    pub label: String,
    pub sensitivity_ma: String,
    pub trip_time_ms: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsulationRow {
    pub point: String,
    pub voltage: u32,
    pub value: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpedanceRow {
    pub label: String,
    pub detail: String,
    pub line_ohms: String,
    pub loop_ohms: String,
    pub outcome: Outcome,
}

/// The composed document, ready for a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    /// Short reference code printed on the header.
    pub reference: String,
    pub client_name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub rcd_rows: Vec<RcdRow>,
    pub insulation_rows: Vec<InsulationRow>,
    pub impedance_rows: Vec<ImpedanceRow>,
}

fn verdict_outcome(verdict: RcdVerdict) -> Outcome {
    match verdict {
        RcdVerdict::Pass => Outcome::Pass,
        RcdVerdict::Fail(_) => Outcome::Fail,
        RcdVerdict::NotTested => Outcome::Pending,
    }
}

/// Compose the document from a working set.
pub fn compose(
    client_name: Option<&str>,
    data: &WorkingSet,
    generated_at: DateTime<Utc>,
) -> ReportDocument {
    let reference = Uuid::new_v4().simple().to_string()[..6].to_uppercase();

    let rcd_rows = data
        .rcd_devices
        .iter()
        .map(|device| RcdRow {
            label: device.label.clone(),
            sensitivity_ma: device.rated_ma.clone(),
            trip_time_ms: device.results.rated.time_ms.clone(),
            outcome: verdict_outcome(device.verdict_for(RcdTestKind::Rated)),
        })
        .collect();

    let insulation_rows = data
        .insulation_history
        .iter()
        .map(|reading| InsulationRow {
            point: reading.point.clone(),
            voltage: reading.voltage.volts(),
            value: format!("{} {}", reading.value, reading.unit),
            outcome: if reading.passed {
                Outcome::Pass
            } else {
                Outcome::Fail
            },
        })
        .collect();

    let impedance_rows = data
        .impedance
        .devices
        .iter()
        .map(|device| {
            let outcome = match device.line_check() {
                Some(check) if check.pass => Outcome::Pass,
                Some(_) => Outcome::Fail,
                None => Outcome::Pending,
            };
            ImpedanceRow {
                label: device.label.clone(),
                detail: format!("{} A, curve {}", device.rated_amps, device.curve),
                line_ohms: if device.line_ohms.is_empty() {
                    "--".to_string()
                } else {
                    device.line_ohms.clone()
                },
                loop_ohms: device
                    .loop_ohms
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "--".to_string()),
                outcome,
            }
        })
        .collect();

    ReportDocument {
        reference,
        client_name: client_name.map(str::to_string),
        generated_at,
        rcd_rows,
        insulation_rows,
        impedance_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::impedance::CurveClass;
    use crate::compliance::insulation::{ResistanceUnit, TestVoltage};
    use crate::project::model::{ImpedanceDevice, InsulationReading};

    fn sample_data() -> WorkingSet {
        let mut data = WorkingSet::default();
        data.rcd_devices[0].results.rated.tested = true;
        data.rcd_devices[0].results.rated.tripped = true;
        data.rcd_devices[0].results.rated.time_ms = "45".to_string();
        data.push_insulation(InsulationReading::record(
            "L1-PE",
            TestVoltage::V500,
            "0.8",
            ResistanceUnit::MegaOhm,
            Utc::now(),
        ));
        let mut circuit = ImpedanceDevice::new("MCB KITCHEN", CurveClass::C, "16");
        circuit.line_ohms = "1.2".to_string();
        data.impedance.devices.push(circuit);
        data
    }

    #[test]
    fn rows_reflect_verdicts() {
        let doc = compose(Some("ACME"), &sample_data(), Utc::now());
        assert_eq!(doc.rcd_rows.len(), 1);
        assert_eq!(doc.rcd_rows[0].outcome, Outcome::Pass);
        assert_eq!(doc.insulation_rows[0].outcome, Outcome::Fail);
        // Seeded circuit has no reading, the added one passes.
        assert_eq!(doc.impedance_rows[0].outcome, Outcome::Pending);
        assert_eq!(doc.impedance_rows[1].outcome, Outcome::Pass);
        assert_eq!(doc.impedance_rows[0].line_ohms, "--");
    }

    #[test]
    fn reference_is_short_and_uppercase() {
        let doc = compose(None, &WorkingSet::default(), Utc::now());
        assert_eq!(doc.reference.len(), 6);
        assert_eq!(doc.reference, doc.reference.to_uppercase());
    }
}
