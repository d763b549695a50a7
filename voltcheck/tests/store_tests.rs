//! Persistence round-trip tests against a temporary data directory.

use chrono::Utc;
use tempfile::TempDir;

use voltcheck::compliance::{ResistanceUnit, TestVoltage};
use voltcheck::licensing::{ActivationState, InstallId};
use voltcheck::project::model::{InsulationReading, Project, WorkingSet};
use voltcheck::project::{AppState, ProjectStore, WorkspacePatch};

fn store() -> (TempDir, ProjectStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = ProjectStore::open(dir.path()).expect("open store");
    (dir, store)
}

#[test]
fn missing_files_load_as_defaults() {
    let (_dir, store) = store();
    assert!(store.load_projects().unwrap().is_empty());
    let standalone = store.load_standalone().unwrap();
    assert_eq!(standalone.rcd_devices.len(), 1);
    assert!(store.load_activation().unwrap().is_none());
}

#[test]
fn project_snapshot_round_trips_exactly() {
    let (_dir, store) = store();

    let mut project = Project::new("ACME S.L.", Utc::now());
    project.data.rcd_devices[0].results.rated.time_ms = "123.450".to_string();
    project.data.rcd_devices[0].results.rated.tested = true;
    project.data.push_insulation(InsulationReading::record(
        "L1-PE",
        TestVoltage::V1000,
        "0.50",
        ResistanceUnit::GigaOhm,
        Utc::now(),
    ));
    project.data.impedance.devices[0].loop_ohms = Some("1000,5".to_string());

    store.save_projects(&[project.clone()]).unwrap();
    let loaded = store.load_projects().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], project);
    // Typed strings survive digit-for-digit.
    assert_eq!(loaded[0].data.rcd_devices[0].results.rated.time_ms, "123.450");
    assert_eq!(
        loaded[0].data.impedance.devices[0].loop_ohms.as_deref(),
        Some("1000,5")
    );
}

#[test]
fn save_overwrites_whole_snapshot() {
    let (_dir, store) = store();
    let first = Project::new("FIRST", Utc::now());
    let second = Project::new("SECOND", Utc::now());
    store.save_projects(&[first]).unwrap();
    store.save_projects(&[second.clone()]).unwrap();
    let loaded = store.load_projects().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].client_name, "SECOND");
}

#[test]
fn standalone_set_round_trips() {
    let (_dir, store) = store();
    let mut data = WorkingSet::default();
    data.troubleshooting.description = "kitchen circuit trips".to_string();
    store.save_standalone(&data).unwrap();
    assert_eq!(store.load_standalone().unwrap(), data);
}

#[test]
fn app_state_persists_through_store() {
    let (_dir, store) = store();
    let mut state = AppState::load(&store).unwrap();
    state.create_project("ACME", Utc::now());
    state.apply(WorkspacePatch::ClearInsulationHistory, Utc::now());
    state.save(&store).unwrap();

    let reloaded = AppState::load(&store).unwrap();
    assert_eq!(reloaded.projects.len(), 1);
    assert_eq!(reloaded.projects[0].client_name, "ACME");
    // The active pointer is runtime-only.
    assert!(reloaded.active_project.is_none());
}

#[test]
fn activation_state_round_trips() {
    let (_dir, store) = store();
    let state = ActivationState {
        install_id: InstallId::generate(),
        license_key: "KEY-123".to_string(),
        activated_at: Utc::now(),
    };
    store.save_activation(&state).unwrap();
    assert_eq!(store.load_activation().unwrap(), Some(state));
}
