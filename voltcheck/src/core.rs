//! Core verification logic shared by callers and the CLI.
//! No UI or storage-layout dependencies beyond the model types.

use std::path::Path;

use serde::Serialize;

use crate::compliance::rcd::RcdVerdict;
use crate::project::model::{Project, WorkingSet};

#[derive(Debug, thiserror::Error)]
pub enum VoltCheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Store error: {0}")]
    Store(#[from] crate::project::store::StoreError),
    #[error("{0}")]
    Other(String),
}

/// Verdict of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    /// Nothing measured yet, or the inputs don't parse to a number.
    Pending,
}

/// One checked fact about the installation.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// What was checked (device label, test point).
    pub subject: String,
    /// Which check produced this ("rcd x1", "insulation", "line impedance").
    pub check: String,
    pub outcome: Outcome,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationStats {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
}

/// Full verification run over one working set.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub client_name: Option<String>,
    pub findings: Vec<Finding>,
    pub stats: VerificationStats,
}

impl VerificationReport {
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }

    pub fn is_complete(&self) -> bool {
        self.stats.pending == 0
    }

    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }
}

fn stats_of(findings: &[Finding]) -> VerificationStats {
    let mut stats = VerificationStats::default();
    for finding in findings {
        match finding.outcome {
            Outcome::Pass => stats.passed += 1,
            Outcome::Fail => stats.failed += 1,
            Outcome::Pending => stats.pending += 1,
        }
    }
    stats
}

/// Read a project snapshot from a JSON file.
pub fn load_project_snapshot(path: &Path) -> Result<Project, VoltCheckError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Core verification API.
pub struct VoltCheckCore;

impl VoltCheckCore {
    /// Run every validator over a working set.
    pub fn verify(data: &WorkingSet) -> VerificationReport {
        let mut findings = Vec::new();
        collect_rcd_findings(data, &mut findings);
        collect_insulation_findings(data, &mut findings);
        collect_impedance_findings(data, &mut findings);
        let stats = stats_of(&findings);
        tracing::info!(
            passed = stats.passed,
            failed = stats.failed,
            pending = stats.pending,
            "verification run complete"
        );
        VerificationReport {
            client_name: None,
            findings,
            stats,
        }
    }

    /// Run every validator over a project's embedded collections.
    pub fn verify_project(project: &Project) -> VerificationReport {
        let mut report = Self::verify(&project.data);
        report.client_name = Some(project.client_name.clone());
        report
    }
}

fn collect_rcd_findings(data: &WorkingSet, findings: &mut Vec<Finding>) {
    for device in &data.rcd_devices {
        for (kind, _) in device.results.iter() {
            let check = format!("rcd {}", kind.label());
            let (outcome, message) = match device.verdict_for(kind) {
                RcdVerdict::Pass => (Outcome::Pass, "within acceptance window".to_string()),
                RcdVerdict::Fail(reason) => (Outcome::Fail, reason.to_string()),
                RcdVerdict::NotTested => (Outcome::Pending, "not tested".to_string()),
            };
            findings.push(Finding {
                subject: device.label.clone(),
                check,
                outcome,
                message,
            });
        }
    }
}

fn collect_insulation_findings(data: &WorkingSet, findings: &mut Vec<Finding>) {
    for reading in &data.insulation_history {
        let outcome = if reading.passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        findings.push(Finding {
            subject: reading.point.clone(),
            check: "insulation".to_string(),
            outcome,
            message: format!(
                "{} {} at {} V",
                reading.value,
                reading.unit,
                reading.voltage.volts()
            ),
        });
    }
}

fn collect_impedance_findings(data: &WorkingSet, findings: &mut Vec<Finding>) {
    let sensitivity = data.impedance.sensitivity();
    for device in &data.impedance.devices {
        match device.line_check() {
            Some(check) => findings.push(Finding {
                subject: device.label.clone(),
                check: "line impedance".to_string(),
                outcome: if check.pass { Outcome::Pass } else { Outcome::Fail },
                message: format!(
                    "measured {:.2} Ω, limit {:.2} Ω (curve {}, {} A)",
                    check.measured_ohms, check.limit_ohms, device.curve, device.rated_amps
                ),
            }),
            None => findings.push(Finding {
                subject: device.label.clone(),
                check: "line impedance".to_string(),
                outcome: Outcome::Pending,
                message: "no line reading".to_string(),
            }),
        }

        // Loop findings only exist once a loop reading was taken.
        if let Some(raw) = device.loop_ohms.as_deref() {
            if raw.trim().is_empty() {
                continue;
            }
            let finding = match sensitivity.and_then(|s| device.loop_check(s, data.impedance.humid)) {
                Some(check) => Finding {
                    subject: device.label.clone(),
                    check: "loop impedance".to_string(),
                    outcome: if check.pass { Outcome::Pass } else { Outcome::Fail },
                    message: format!(
                        "measured {:.2} Ω, limit {:.2} Ω, contact voltage {:.1} V (limit {} V)",
                        check.measured_ohms,
                        check.limit_ohms,
                        check.contact_voltage,
                        check.voltage_limit
                    ),
                },
                None => Finding {
                    subject: device.label.clone(),
                    check: "loop impedance".to_string(),
                    outcome: Outcome::Pending,
                    message: "loop reading or sensitivity not parseable".to_string(),
                },
            };
            findings.push(finding);
        }
    }
}
