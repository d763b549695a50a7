//! Conduit Sizing Module
//!
//! Implements the ITC-BT-21 tube fill calculation and the cable/tube
//! catalog tables it draws from.

pub mod sizing;
pub mod tables;

pub use sizing::{CableEntry, CableFormat, ConduitSizer, InstallationType, SizingResult};
pub use tables::{TubeFamily, TubeModel};
