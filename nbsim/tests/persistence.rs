use std::path::PathBuf;

use approx::assert_relative_eq;

use nbsim::{
    load_state, read_state, save_state, NoOpObserver, Scenario, ScenarioConfig, SimError,
    StopReason,
};

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("nbsim-{}-{name}", std::process::id()))
}

// ==================================================================================
// State file tests
// ==================================================================================

#[test]
fn saved_run_resumes_from_disk() {
    let cfg = ScenarioConfig::from_path(&scenario_path("default.yaml")).unwrap();
    let Scenario { mut simulation, .. } = Scenario::build_scenario(cfg).unwrap();
    simulation.run(1.0, &mut NoOpObserver).unwrap();

    let path = temp_path("resume.txt");
    save_state(&path, simulation.particles()).unwrap();
    let loaded = load_state(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.len(), simulation.len());
    for (p, q) in simulation.particles().zip(&loaded) {
        assert_eq!(p.label(), q.label());
        assert_relative_eq!(p.position(), q.position(), epsilon = 1e-11);
        assert_relative_eq!(p.velocity(), q.velocity(), epsilon = 1e-11);
        assert_relative_eq!(p.mass(), q.mass(), epsilon = 1e-15);
    }
}

#[test]
fn missing_state_file_is_an_io_error() {
    let err = load_state(&temp_path("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn bad_row_reports_its_line() {
    let text = "label, rx, ry, rz, vx, vy, vz, mass\n\
                ------------------------------------\n\
                p_1, 0, 0, 0, 0, 0, 0, 1.0\n\
                p_2, 0, 0, 0, 0, 0, 0\n";
    match read_state(text.as_bytes()) {
        Err(SimError::Parse { line, reason }) => {
            assert_eq!(line, 4);
            assert!(reason.contains("fields"), "{reason}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// ==================================================================================
// Scenario file tests
// ==================================================================================

#[test]
fn bundled_scenarios_build() {
    for name in ["default.yaml", "fixed_pair.yaml", "large_cluster.yaml"] {
        let cfg = ScenarioConfig::from_path(&scenario_path(name)).unwrap();
        let scenario = Scenario::build_scenario(cfg).unwrap();
        assert!(scenario.simulation.len() >= 2, "{name}");
        assert!(scenario.duration > 0.0, "{name}");
    }
}

#[test]
fn scenario_state_file_is_relative_to_the_scenario() {
    let dir = temp_path("scenario-dir");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("pair.txt"),
        "label, rx, ry, rz, vx, vy, vz, mass\n\
         -----\n\
         left, -50, 0, 0, 0, 0, 0, 1.0\n\
         right, 50, 0, 0, 0, 0, 0, 1.0\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("scenario.yaml"),
        "parameters: { G: 1.0, dt: 0.5, eps: 1.0, t_end: 2.0 }\nstate_file: pair.txt\n",
    )
    .unwrap();

    let cfg = ScenarioConfig::from_path(&dir.join("scenario.yaml")).unwrap();
    let Scenario {
        mut simulation,
        duration,
    } = Scenario::build_scenario(cfg).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(duration, 2.0);
    assert!(simulation.particle("left").is_some());
    let summary = simulation.run(duration, &mut NoOpObserver).unwrap();
    assert_eq!(summary.stop, StopReason::DurationReached);
    assert_eq!(summary.steps, 4);
}
