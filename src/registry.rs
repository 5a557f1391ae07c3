use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One row of the build registry: a scene eligible for inclusion in a
/// shipped sequence. The guid is assigned by the scene database and is
/// never rewritten here; `path` may dangle without invalidating the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneInBuild {
    pub guid: Uuid,
    pub path: String,
    pub enabled: bool,
}

impl SceneInBuild {
    pub fn new(guid: Uuid, path: impl Into<String>, enabled: bool) -> Self {
        Self { guid, path: path.into(), enabled }
    }
}

/// The build registry is owned outside the editing surface and is only
/// readable/writable as a whole ordered sequence. Other writers may
/// insert, remove, or reorder rows between a snapshot and a replace.
pub trait BuildRegistry {
    fn scenes(&self) -> Vec<SceneInBuild>;
    fn set_scenes(&mut self, scenes: Vec<SceneInBuild>) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryBuildRegistry {
    scenes: Vec<SceneInBuild>,
}

impl MemoryBuildRegistry {
    pub fn new(scenes: Vec<SceneInBuild>) -> Self {
        Self { scenes }
    }
}

impl BuildRegistry for MemoryBuildRegistry {
    fn scenes(&self) -> Vec<SceneInBuild> {
        self.scenes.clone()
    }

    fn set_scenes(&mut self, scenes: Vec<SceneInBuild>) -> Result<()> {
        self.scenes = scenes;
        Ok(())
    }
}

/// JSON-file-backed build registry. Every whole-sequence replace is
/// written through to disk immediately.
#[derive(Debug)]
pub struct BuildSettingsFile {
    path: PathBuf,
    scenes: Vec<SceneInBuild>,
}

impl BuildSettingsFile {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read build settings file {}", path.display()))?;
        let scenes = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse build settings file {}", path.display()))?;
        Ok(Self { path, scenes })
    }

    /// Missing or unreadable settings start an empty registry rather than
    /// blocking the editor.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.exists() {
            return Self { path, scenes: Vec::new() };
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("[build-settings] load error: {err:?}. Starting with an empty list.");
                Self { path, scenes: Vec::new() }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create build settings dir {}", parent.display())
                })?;
            }
        }
        let data = serde_json::to_string_pretty(&self.scenes)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write build settings file {}", self.path.display()))?;
        Ok(())
    }
}

impl BuildRegistry for BuildSettingsFile {
    fn scenes(&self) -> Vec<SceneInBuild> {
        self.scenes.clone()
    }

    fn set_scenes(&mut self, scenes: Vec<SceneInBuild>) -> Result<()> {
        self.scenes = scenes;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn settings_file_round_trips() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config/build_settings.json");
        let mut settings = BuildSettingsFile::load_or_empty(&path);
        assert!(settings.scenes().is_empty());

        let rows = vec![
            SceneInBuild::new(Uuid::new_v4(), "scenes/title.json", true),
            SceneInBuild::new(Uuid::new_v4(), "scenes/forest.json", false),
        ];
        settings.set_scenes(rows.clone()).expect("replace scenes");

        let reloaded = BuildSettingsFile::load(&path).expect("load settings");
        assert_eq!(reloaded.scenes(), rows);
    }

    #[test]
    fn load_errors_on_missing_file() {
        let dir = tempdir().expect("tempdir");
        let err = BuildSettingsFile::load(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"), "error should name the read failure");
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("build_settings.json");
        fs::write(&path, "not json").expect("write corrupt file");
        let settings = BuildSettingsFile::load_or_empty(&path);
        assert!(settings.scenes().is_empty());
    }
}
