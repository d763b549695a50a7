//! Application State
//!
//! One explicit struct owns the project list, the standalone fallback and
//! the active-project pointer; the current working set is picked by a
//! resolver, and every mutation goes through a plain reducer
//! (`AppState::apply`) instead of ad-hoc setters.

use chrono::{DateTime, Utc};

use crate::project::model::{
    ChatMessage, ImpedanceState, InsulationReading, Project, RcdDevice, WorkingSet,
};
use crate::project::store::{ProjectStore, StoreError};

/// A single state transition. Collections are replaced wholesale (the
/// storage layer has no partial patches); append-only sequences append.
#[derive(Debug, Clone)]
pub enum WorkspacePatch {
    SetRcdDevices(Vec<RcdDevice>),
    AppendInsulation(InsulationReading),
    ClearInsulationHistory,
    SetImpedance(ImpedanceState),
    AppendChat(ChatMessage),
    SetTroubleshooting {
        description: String,
        active: bool,
    },
    ResetTroubleshooting,
}

/// Whole-application state. Exactly one of the named projects (or the
/// standalone set) is current at any time.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub projects: Vec<Project>,
    pub standalone: WorkingSet,
    pub active_project: Option<String>,
}

impl AppState {
    /// Load both snapshots from the store. The active pointer is runtime
    /// state and starts unset.
    pub fn load(store: &ProjectStore) -> Result<Self, StoreError> {
        Ok(AppState {
            projects: store.load_projects()?,
            standalone: store.load_standalone()?,
            active_project: None,
        })
    }

    /// Persist both snapshots, overwriting whatever was there.
    pub fn save(&self, store: &ProjectStore) -> Result<(), StoreError> {
        store.save_projects(&self.projects)?;
        store.save_standalone(&self.standalone)
    }

    fn active(&self) -> Option<&Project> {
        let id = self.active_project.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    fn active_mut(&mut self) -> Option<&mut Project> {
        let id = self.active_project.clone()?;
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// The working set all sections read from: the active project's, or
    /// the standalone default when no project is open.
    pub fn current(&self) -> &WorkingSet {
        match self.active() {
            Some(project) => &project.data,
            None => &self.standalone,
        }
    }

    /// Apply one patch to the current working set. Touching an active
    /// project refreshes its update timestamp.
    pub fn apply(&mut self, patch: WorkspacePatch, now: DateTime<Utc>) {
        if let Some(project) = self.active_mut() {
            apply_patch(&mut project.data, patch);
            project.updated_at = now;
        } else {
            apply_patch(&mut self.standalone, patch);
        }
    }

    /// Create a project with a seeded working set and make it active.
    pub fn create_project(&mut self, client_name: impl Into<String>, now: DateTime<Utc>) -> &Project {
        let project = Project::new(client_name, now);
        let id = project.id.clone();
        self.projects.insert(0, project);
        self.active_project = Some(id);
        &self.projects[0]
    }

    /// Delete a project; dropping the active one falls back to standalone.
    pub fn delete_project(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.active_project.as_deref() == Some(id) {
            self.active_project = None;
        }
        self.projects.len() != before
    }

    /// Make a project current; unknown ids leave the pointer untouched.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.projects.iter().any(|p| p.id == id) {
            self.active_project = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn deactivate(&mut self) {
        self.active_project = None;
    }
}

fn apply_patch(data: &mut WorkingSet, patch: WorkspacePatch) {
    match patch {
        WorkspacePatch::SetRcdDevices(devices) => data.rcd_devices = devices,
        WorkspacePatch::AppendInsulation(reading) => data.push_insulation(reading),
        WorkspacePatch::ClearInsulationHistory => data.insulation_history.clear(),
        WorkspacePatch::SetImpedance(state) => data.impedance = state,
        WorkspacePatch::AppendChat(message) => data.troubleshooting.messages.push(message),
        WorkspacePatch::SetTroubleshooting {
            description,
            active,
        } => {
            data.troubleshooting.description = description;
            data.troubleshooting.active = active;
        }
        WorkspacePatch::ResetTroubleshooting => data.troubleshooting.reset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::insulation::{ResistanceUnit, TestVoltage};

    #[test]
    fn standalone_is_current_without_active_project() {
        let state = AppState::default();
        assert_eq!(state.current(), &state.standalone);
    }

    #[test]
    fn patches_route_to_the_active_project() {
        let mut state = AppState::default();
        let t0 = Utc::now();
        let id = state.create_project("ACME", t0).id.clone();

        let t1 = t0 + chrono::Duration::seconds(5);
        state.apply(
            WorkspacePatch::AppendInsulation(InsulationReading::record(
                "L1-PE",
                TestVoltage::V500,
                "2.0",
                ResistanceUnit::MegaOhm,
                t1,
            )),
            t1,
        );

        let project = state.projects.iter().find(|p| p.id == id).unwrap();
        assert_eq!(project.data.insulation_history.len(), 1);
        assert!(state.standalone.insulation_history.is_empty());
        assert_eq!(project.updated_at, t1);
    }

    #[test]
    fn patches_route_to_standalone_when_deactivated() {
        let mut state = AppState::default();
        state.create_project("ACME", Utc::now());
        state.deactivate();
        state.apply(WorkspacePatch::ClearInsulationHistory, Utc::now());
        state.apply(
            WorkspacePatch::AppendChat(ChatMessage::user("hello")),
            Utc::now(),
        );
        assert_eq!(state.standalone.troubleshooting.messages.len(), 1);
        assert!(state.projects[0].data.troubleshooting.messages.is_empty());
    }

    #[test]
    fn deleting_active_project_falls_back() {
        let mut state = AppState::default();
        let id = state.create_project("ACME", Utc::now()).id.clone();
        assert!(state.delete_project(&id));
        assert!(state.active_project.is_none());
        assert_eq!(state.current(), &state.standalone);
        assert!(!state.delete_project(&id));
    }

    #[test]
    fn activate_rejects_unknown_ids() {
        let mut state = AppState::default();
        assert!(!state.activate("nope"));
        assert!(state.active_project.is_none());
    }

    #[test]
    fn troubleshooting_reset_clears_session() {
        let mut state = AppState::default();
        state.apply(
            WorkspacePatch::SetTroubleshooting {
                description: "breaker hums".to_string(),
                active: true,
            },
            Utc::now(),
        );
        state.apply(
            WorkspacePatch::AppendChat(ChatMessage::assistant("measure L1-N")),
            Utc::now(),
        );
        state.apply(WorkspacePatch::ResetTroubleshooting, Utc::now());
        assert_eq!(state.standalone.troubleshooting, Default::default());
    }
}
