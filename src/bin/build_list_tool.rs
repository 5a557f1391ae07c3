use anyhow::{anyhow, Result};
use scenedeck::{display_name, BuildSettingsFile, EditorShell, SceneInBuild, SceneResolver};
use std::env;
use std::path::Path;
use std::process;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:?}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "list" => {
            let project = args
                .next()
                .ok_or_else(|| anyhow!("list requires a project root: build_list_tool list <project> [term]"))?;
            cmd_list(&project, args.next().as_deref())
        }
        "enable" => {
            let (project, scene) = two_args(&mut args, "enable", "scene")?;
            cmd_set_enabled(&project, &scene, true)
        }
        "disable" => {
            let (project, scene) = two_args(&mut args, "disable", "scene")?;
            cmd_set_enabled(&project, &scene, false)
        }
        "add" => {
            let project = args
                .next()
                .ok_or_else(|| anyhow!("add requires arguments: build_list_tool add <project> <path> [--disabled]"))?;
            let path = args.next().ok_or_else(|| anyhow!("add missing scene path argument"))?;
            let enabled = args.next().as_deref() != Some("--disabled");
            cmd_add(&project, &path, enabled)
        }
        "remove" => {
            let (project, scene) = two_args(&mut args, "remove", "scene")?;
            cmd_remove(&project, &scene)
        }
        "preset-save" => {
            let (project, name) = two_args(&mut args, "preset-save", "preset name")?;
            cmd_preset_save(&project, &name)
        }
        "preset-apply" => {
            let (project, name) = two_args(&mut args, "preset-apply", "preset name")?;
            cmd_preset_apply(&project, &name)
        }
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow!("unknown command '{other}'; run build_list_tool help")),
    }
}

fn two_args(
    args: &mut impl Iterator<Item = String>,
    command: &str,
    noun: &str,
) -> Result<(String, String)> {
    let project = args
        .next()
        .ok_or_else(|| anyhow!("{command} requires a project root and a {noun}"))?;
    let second = args.next().ok_or_else(|| anyhow!("{command} missing {noun} argument"))?;
    Ok((project, second))
}

fn print_usage() {
    eprintln!(
        "Usage: build_list_tool <command> <project> [args]\n\n\
         Commands:\n  \
         list <project> [term]          List build scenes, optionally filtered\n  \
         enable <project> <scene>       Enable a scene by name or path\n  \
         disable <project> <scene>      Disable a scene by name or path\n  \
         add <project> <path> [--disabled]\n                                 Append a database scene to the build list\n  \
         remove <project> <scene>       Remove a scene from the build list\n  \
         preset-save <project> <name>   Snapshot the build list into a preset\n  \
         preset-apply <project> <name>  Replace the build list from a preset"
    );
}

fn open_shell(project: &str) -> Result<EditorShell<BuildSettingsFile>> {
    EditorShell::open_project(project)
}

fn report_status(shell: &EditorShell<BuildSettingsFile>) {
    if let Some(status) = shell.status() {
        println!("[{}] {}", status.kind.label(), status.message);
    }
}

fn find_scene(rows: &[SceneInBuild], needle: &str) -> Result<SceneInBuild> {
    let lowered = needle.to_lowercase();
    rows.iter()
        .find(|row| {
            row.path == needle || display_name(&row.path).to_lowercase() == lowered
        })
        .cloned()
        .ok_or_else(|| anyhow!("no build scene matches '{needle}'"))
}

fn cmd_list(project: &str, term: Option<&str>) -> Result<()> {
    let mut shell = open_shell(project)?;
    if let Some(term) = term {
        shell.set_search_term(term);
    }
    let visible = shell.visible_scenes();
    if visible.is_empty() {
        println!("No scenes in build.");
        return Ok(());
    }
    let mut play_index = 0usize;
    for scene in &visible {
        let prefix = if scene.enabled {
            let current = play_index.to_string();
            play_index += 1;
            current
        } else {
            "-".to_string()
        };
        let marker = if scene.enabled { "x" } else { " " };
        println!("{prefix:>3} [{marker}] {:<24} {}", display_name(&scene.path), scene.path);
    }
    Ok(())
}

fn cmd_set_enabled(project: &str, needle: &str, enabled: bool) -> Result<()> {
    let mut shell = open_shell(project)?;
    let scene = find_scene(&shell.build_scenes(), needle)?;
    shell.stage_scene_enabled(scene.guid, enabled);
    shell.apply_pending_edits();
    report_status(&shell);
    println!(
        "{} '{}'",
        if enabled { "Enabled" } else { "Disabled" },
        display_name(&scene.path)
    );
    Ok(())
}

fn cmd_add(project: &str, path: &str, enabled: bool) -> Result<()> {
    let mut shell = open_shell(project)?;
    let handle = shell
        .database()
        .handle_for_path(path)
        .ok_or_else(|| anyhow!("'{path}' is not a scene in this project's database"))?;
    let mut rows = shell.build_scenes();
    if rows.iter().any(|row| row.guid == handle.guid()) {
        return Err(anyhow!("'{path}' is already in the build list"));
    }
    rows.push(SceneInBuild::new(handle.guid(), path, enabled));
    shell.replace_build_scenes(rows)?;
    println!("Added '{}' to the build list", display_name(path));
    Ok(())
}

fn cmd_remove(project: &str, needle: &str) -> Result<()> {
    let mut shell = open_shell(project)?;
    let scene = find_scene(&shell.build_scenes(), needle)?;
    let rows = shell
        .build_scenes()
        .into_iter()
        .filter(|row| row.guid != scene.guid)
        .collect();
    shell.replace_build_scenes(rows)?;
    println!("Removed '{}' from the build list", display_name(&scene.path));
    Ok(())
}

fn cmd_preset_save(project: &str, name: &str) -> Result<()> {
    let mut shell = open_shell(project)?;
    let path = preset_path(&shell, name);
    shell.save_preset(&path)?;
    report_status(&shell);
    Ok(())
}

fn cmd_preset_apply(project: &str, name: &str) -> Result<()> {
    let mut shell = open_shell(project)?;
    let path = preset_path(&shell, name);
    shell.apply_preset(&path)?;
    report_status(&shell);
    Ok(())
}

fn preset_path(shell: &EditorShell<BuildSettingsFile>, name: &str) -> std::path::PathBuf {
    if name.contains('/') || name.contains('\\') || Path::new(name).extension().is_some() {
        return Path::new(name).to_path_buf();
    }
    shell.preset_path_for(name)
}
