use scenedeck::project::ProjectManifest;
use scenedeck::{EditorShell, MemoryBuildRegistry, SceneInBuild, SceneResolver};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use uuid::Uuid;

fn write_scene(root: &Path, relative: &str) {
    let path = root.join("assets/scenes").join(relative);
    fs::create_dir_all(path.parent().expect("scene parent")).expect("create scene dir");
    fs::write(path, "{}").expect("write scene file");
}

fn open_shell(root: &Path) -> EditorShell<MemoryBuildRegistry> {
    EditorShell::with_registry(root, ProjectManifest::default(), MemoryBuildRegistry::default())
        .expect("open shell")
}

fn guid_of(shell: &EditorShell<MemoryBuildRegistry>, path: &str) -> Uuid {
    shell.database().handle_for_path(path).expect("scene handle").guid()
}

#[test]
fn preset_round_trip_restores_the_build_list() {
    let dir = tempdir().expect("tempdir");
    write_scene(dir.path(), "alpha.json");
    write_scene(dir.path(), "beta.json");
    write_scene(dir.path(), "gamma.json");
    let mut shell = open_shell(dir.path());
    let alpha = guid_of(&shell, "alpha.json");
    let beta = guid_of(&shell, "beta.json");
    let gamma = guid_of(&shell, "gamma.json");

    let original = vec![
        SceneInBuild::new(alpha, "alpha.json", true),
        SceneInBuild::new(beta, "beta.json", false),
    ];
    shell.replace_build_scenes(original.clone()).expect("seed registry");

    let preset_path = shell.preset_path_for("baseline");
    shell.save_preset(&preset_path).expect("save preset");
    assert!(preset_path.exists());

    // The registry drifts while the preset sits on disk.
    shell
        .replace_build_scenes(vec![SceneInBuild::new(gamma, "gamma.json", true)])
        .expect("external rewrite");

    shell.apply_preset(&preset_path).expect("apply preset");
    assert_eq!(shell.build_scenes(), original);
}

#[test]
fn applying_a_preset_supersedes_staged_edits() {
    let dir = tempdir().expect("tempdir");
    write_scene(dir.path(), "alpha.json");
    let mut shell = open_shell(dir.path());
    let alpha = guid_of(&shell, "alpha.json");
    shell
        .replace_build_scenes(vec![SceneInBuild::new(alpha, "alpha.json", false)])
        .expect("seed registry");

    let preset_path = shell.preset_path_for("baseline");
    shell.save_preset(&preset_path).expect("save preset");

    shell.stage_scene_enabled(alpha, true);
    shell.apply_preset(&preset_path).expect("apply preset");
    assert_eq!(shell.pending_edit_count(), 0);

    shell.apply_pending_edits();
    assert!(!shell.build_scenes()[0].enabled, "the stale staged edit never lands");
}

#[test]
fn save_preset_fails_loudly_on_an_unresolvable_row() {
    let dir = tempdir().expect("tempdir");
    write_scene(dir.path(), "alpha.json");
    let mut shell = open_shell(dir.path());
    let alpha = guid_of(&shell, "alpha.json");
    shell
        .replace_build_scenes(vec![
            SceneInBuild::new(alpha, "alpha.json", true),
            SceneInBuild::new(Uuid::new_v4(), "ghost.json", true),
        ])
        .expect("seed registry");

    let preset_path = shell.preset_path_for("broken");
    let err = shell.save_preset(&preset_path).unwrap_err();
    assert!(err.to_string().contains("Loading build list preset"));
    assert!(!preset_path.exists(), "no partial preset is written");
}

#[test]
fn apply_preset_fails_when_a_scene_vanished_from_disk() {
    let dir = tempdir().expect("tempdir");
    write_scene(dir.path(), "alpha.json");
    write_scene(dir.path(), "beta.json");
    let mut shell = open_shell(dir.path());
    let alpha = guid_of(&shell, "alpha.json");
    let beta = guid_of(&shell, "beta.json");
    let rows = vec![
        SceneInBuild::new(alpha, "alpha.json", true),
        SceneInBuild::new(beta, "beta.json", true),
    ];
    shell.replace_build_scenes(rows.clone()).expect("seed registry");

    let preset_path = shell.preset_path_for("baseline");
    shell.save_preset(&preset_path).expect("save preset");

    fs::remove_file(dir.path().join("assets/scenes/beta.json")).expect("remove scene");
    shell.refresh_database().expect("refresh database");

    let err = shell.apply_preset(&preset_path).unwrap_err();
    assert!(format!("{err:#}").contains("not in the scene database"));
    assert_eq!(shell.build_scenes(), rows, "a failed apply leaves the registry untouched");
}

#[test]
fn preset_names_are_sanitized_into_the_preset_directory() {
    let dir = tempdir().expect("tempdir");
    let shell = open_shell(dir.path());
    let path = shell.preset_path_for("release candidate!");
    assert!(path.starts_with(dir.path().join("assets/presets")));
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("release_candidate_.json"));
}
