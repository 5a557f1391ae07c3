use crate::scene_ref::SceneRef;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_NAME: &str = "project.scenedeck";

/// Project manifest: where the editor finds its scenes, registry, and
/// preference files, all relative to the project root. The startup scene
/// is a dual-representation reference; only its portable path lands in
/// the file, and the owner is responsible for running its save/load
/// synchronization points around (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectManifest {
    pub name: Option<String>,
    pub scenes: PathBuf,
    pub scene_index: PathBuf,
    pub build_settings: PathBuf,
    pub presets: PathBuf,
    pub prefs: PathBuf,
    pub startup_scene: SceneRef,
}

impl Default for ProjectManifest {
    fn default() -> Self {
        Self {
            name: None,
            scenes: PathBuf::from("assets/scenes"),
            scene_index: PathBuf::from("config/scene_guids.json"),
            build_settings: PathBuf::from("config/build_settings.json"),
            presets: PathBuf::from("assets/presets"),
            prefs: PathBuf::from("config/editor_prefs.json"),
            startup_scene: SceneRef::Unset,
        }
    }
}

impl ProjectManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read project manifest {}", path.display()))?;
        let manifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse project manifest {}", path.display()))?;
        Ok(manifest)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                eprintln!("[project] manifest load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create manifest dir {}", parent.display()))?;
            }
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write project manifest {}", path.display()))?;
        Ok(())
    }
}
