use super::{EditorShell, StatusKind};
use crate::preset::BuildListPreset;
use crate::registry::BuildRegistry;
use anyhow::Result;
use std::path::{Path, PathBuf};

impl<R: BuildRegistry + 'static> EditorShell<R> {
    /// Snapshot the whole build list into a preset file. Fails if any row
    /// does not resolve in the scene database; a preset must never capture
    /// a dead row.
    pub fn save_preset(&mut self, path: &Path) -> Result<()> {
        let rows = self.registry.scenes();
        let mut preset = BuildListPreset::default();
        preset.load_from(&rows, &self.database)?;
        preset.save_to_path(path)?;
        self.set_status(
            StatusKind::Success,
            format!("Saved build list preset to {}", path.display()),
        );
        Ok(())
    }

    /// Replace the whole build list from a preset file. Destructive;
    /// callers confirm with the user before invoking this.
    pub fn apply_preset(&mut self, path: &Path) -> Result<()> {
        let preset = BuildListPreset::load_from_path(path, &self.database)?;
        let rows = preset.apply_to(&self.database)?;
        let count = rows.len();
        self.registry.set_scenes(rows)?;
        // Staged edits predate the preset; applying it supersedes them.
        self.pending_edits.clear();
        self.set_status(
            StatusKind::Success,
            format!("Applied build list preset ({count} scenes) from {}", path.display()),
        );
        Ok(())
    }

    /// Where a named preset lives under the project's preset directory.
    pub fn preset_path_for(&self, name: &str) -> PathBuf {
        let mut file_name = name.trim().to_string();
        if file_name.is_empty() {
            file_name.push_str("preset");
        }
        let sanitized = file_name
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' { ch } else { '_' })
            .collect::<String>();
        self.root.join(&self.manifest.presets).join(format!("{sanitized}.json"))
    }
}
