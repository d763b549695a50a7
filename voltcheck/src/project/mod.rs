//! Project Module
//!
//! Data model, snapshot persistence and the application-state reducer.

pub mod model;
pub mod store;
pub mod workspace;

pub use model::{
    ChatMessage, ChatRole, Citation, ImpedanceDevice, ImpedanceState, InsulationReading, Project,
    RcdDevice, RcdResults, RcdSlot, TroubleshootingState, WorkingSet,
};
pub use store::{ProjectStore, StoreError};
pub use workspace::{AppState, WorkspacePatch};
