use super::{EditorShell, StatusKind};
use crate::build_list::{filter_scenes, reconcile};
use crate::registry::{BuildRegistry, SceneInBuild};
use anyhow::Result;
use uuid::Uuid;

impl<R: BuildRegistry + 'static> EditorShell<R> {
    /// A whole-sequence snapshot of the registry as it is right now.
    pub fn build_scenes(&self) -> Vec<SceneInBuild> {
        self.registry.scenes()
    }

    /// Whole-sequence replace, acting in the registry owner's role.
    /// Editing-surface changes should go through staging instead.
    pub fn replace_build_scenes(&mut self, scenes: Vec<SceneInBuild>) -> Result<()> {
        self.registry.set_scenes(scenes)
    }

    /// Stage an enable/disable edit for later reconciliation. Staging the
    /// same scene again overwrites the earlier value.
    pub fn stage_scene_enabled(&mut self, guid: Uuid, enabled: bool) {
        self.pending_edits.stage(guid, enabled);
    }

    pub fn pending_edit_count(&self) -> usize {
        self.pending_edits.len()
    }

    /// Merge staged edits into a fresh registry snapshot and write the
    /// result back as a whole sequence. Edits for rows that were removed
    /// out from under us are dropped silently; the staged set is drained
    /// either way.
    pub fn apply_pending_edits(&mut self) {
        if self.pending_edits.is_empty() {
            return;
        }
        let snapshot = self.registry.scenes();
        let merged = reconcile(&snapshot, &mut self.pending_edits);
        if let Err(err) = self.registry.set_scenes(merged) {
            self.set_status(StatusKind::Error, format!("Writing build settings failed: {err}"));
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn clear_search_term(&mut self) {
        self.search_term.clear();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Registry rows that pass the current search term, minus rows whose
    /// scene no longer resolves on disk.
    pub fn visible_scenes(&self) -> Vec<SceneInBuild> {
        let scenes = self.registry.scenes();
        filter_scenes(&scenes, &self.search_term, &self.database).cloned().collect()
    }
}
