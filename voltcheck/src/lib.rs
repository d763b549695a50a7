//! VoltCheck - REBT low-voltage installation verification library
//!
//! This library backs a field tool for electrical installers: conduit
//! sizing per ITC-BT-21, RCD trip validation, insulation resistance and
//! line/loop impedance checks, plus project persistence, report
//! generation and an assistant gateway.
//!
//! # Quick Start
//!
//! ```
//! use voltcheck::{CableEntry, ConduitSizer, InstallationType, TubeFamily};
//!
//! let sizer = ConduitSizer::new(InstallationType::Embedded, TubeFamily::Corrugated);
//! let result = sizer.size(&[CableEntry::single(2.5, 3)]).unwrap();
//! assert_eq!(result.metric, 20);
//! assert!(result.compliant);
//! ```
//!
//! # Features
//!
//! - **Conduit sizing**: tube fill calculation over the UNE catalog tables
//! - **Compliance checks**: RCD trip windows, insulation floors, impedance limits
//! - **Projects**: snapshot persistence and a reducer-style app state
//! - **Optional AI**: hosted assistant for Q&A, panel audits and OCR

pub mod ai;
pub mod compliance;
pub mod conduit;
pub mod core;
pub mod licensing;
pub mod project;
pub mod report;

// Re-export main types
pub use crate::core::{
    load_project_snapshot, Finding, Outcome, VerificationReport, VerificationStats, VoltCheckCore,
    VoltCheckError,
};
pub use compliance::{CurveClass, RcdClass, RcdTestKind, RcdVerdict, ResistanceUnit, TestVoltage};
pub use conduit::{CableEntry, CableFormat, ConduitSizer, InstallationType, SizingResult, TubeFamily};
pub use project::{AppState, Project, ProjectStore, WorkingSet, WorkspacePatch};
pub use report::{compose as compose_report, ReportDocument};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AppState, CableEntry, ConduitSizer, InstallationType, Outcome, Project, ProjectStore,
        TubeFamily, VerificationReport, VoltCheckCore, VoltCheckError,
    };
}
