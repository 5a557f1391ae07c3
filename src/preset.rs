use crate::database::{SceneDatabase, SceneHandle, SceneResolver};
use crate::registry::SceneInBuild;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// One preset row: a resolved scene handle plus its enable flag. Unlike a
/// registry row, a preset entry always holds a live handle; building one
/// from a row that does not resolve is a caller error and fails loudly
/// instead of degrading.
#[derive(Debug, Clone)]
pub struct PresetEntry {
    handle: SceneHandle,
    enabled: bool,
}

impl PresetEntry {
    pub fn new(handle: SceneHandle, enabled: bool) -> Self {
        Self { handle, enabled }
    }

    pub fn from_build_row(row: &SceneInBuild, resolver: &impl SceneResolver) -> Result<Self> {
        let handle = resolver
            .handle_for_path(&row.path)
            .ok_or_else(|| anyhow!("Scene '{}' is not in the scene database", row.path))?;
        Ok(Self::new(handle, row.enabled))
    }

    pub fn to_build_row(&self, resolver: &impl SceneResolver) -> Result<SceneInBuild> {
        let path = resolver.path_for_handle(&self.handle).ok_or_else(|| {
            anyhow!("Preset scene {} no longer exists in the scene database", self.handle.guid())
        })?;
        Ok(SceneInBuild::new(self.handle.guid(), path, self.enabled))
    }

    pub fn handle(&self) -> &SceneHandle {
        &self.handle
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PresetEntryData {
    guid: Uuid,
    enabled: bool,
}

/// A snapshot of the whole build list, restorable later. Load and apply
/// are whole-collection operations; any confirmation prompt before
/// overwriting belongs to the caller.
#[derive(Debug, Clone, Default)]
pub struct BuildListPreset {
    entries: Vec<PresetEntry>,
}

impl BuildListPreset {
    pub fn entries(&self) -> &[PresetEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the preset's contents from registry rows, one path-to-handle
    /// conversion per row. Fails without touching the preset if any row
    /// does not resolve.
    pub fn load_from(&mut self, rows: &[SceneInBuild], resolver: &impl SceneResolver) -> Result<()> {
        let entries = rows
            .iter()
            .map(|row| PresetEntry::from_build_row(row, resolver))
            .collect::<Result<Vec<_>>>()
            .context("Loading build list preset")?;
        self.entries = entries;
        Ok(())
    }

    /// Convert the preset back into registry rows, one handle-to-path
    /// conversion per entry. The caller replaces the registry wholesale
    /// with the result.
    pub fn apply_to(&self, resolver: &impl SceneResolver) -> Result<Vec<SceneInBuild>> {
        self.entries
            .iter()
            .map(|entry| entry.to_build_row(resolver))
            .collect::<Result<Vec<_>>>()
            .context("Applying build list preset")
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create preset dir {}", parent.display()))?;
            }
        }
        let data: Vec<PresetEntryData> = self
            .entries
            .iter()
            .map(|entry| PresetEntryData { guid: entry.handle.guid(), enabled: entry.enabled })
            .collect();
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preset file {}", path.display()))?;
        Ok(())
    }

    /// Load a preset file, recovering each handle from its persisted guid.
    /// A guid that no longer names a database scene fails the whole load.
    pub fn load_from_path(path: impl AsRef<Path>, database: &SceneDatabase) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read preset file {}", path.display()))?;
        let data: Vec<PresetEntryData> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse preset file {}", path.display()))?;
        let entries = data
            .into_iter()
            .map(|entry| {
                let handle = database.handle_for_guid(entry.guid).ok_or_else(|| {
                    anyhow!("Preset scene {} is not in the scene database", entry.guid)
                })?;
                Ok(PresetEntry::new(handle, entry.enabled))
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Loading preset file {}", path.display()))?;
        Ok(Self { entries })
    }
}
