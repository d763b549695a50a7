//! Electrical Compliance Module
//!
//! Implements the REBT pass/fail checks: RCD trip windows, insulation
//! resistance floors, and line/loop impedance limits.

pub mod impedance;
pub mod insulation;
pub mod rcd;

pub use impedance::{check_line, check_loop, CurveClass, LineCheck, LoopCheck};
pub use insulation::{ResistanceUnit, TestVoltage};
pub use rcd::{RcdClass, RcdFailure, RcdMeasurement, RcdTestKind, RcdVerdict};
