use crate::database::SceneResolver;
use crate::registry::SceneInBuild;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Locally buffered enable/disable edits awaiting reconciliation with the
/// build registry. Edits are keyed by guid; staging a guid twice keeps
/// only the latest value.
#[derive(Debug, Default)]
pub struct PendingEdits {
    edits: HashMap<Uuid, bool>,
}

impl PendingEdits {
    pub fn stage(&mut self, guid: Uuid, enabled: bool) {
        self.edits.insert(guid, enabled);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    fn take(&mut self, guid: Uuid) -> Option<bool> {
        self.edits.remove(&guid)
    }
}

/// Merge pending edits into a fresh registry snapshot.
///
/// The snapshot is walked in its current order, so reordering and
/// insertion done by other writers since the edits were staged is kept.
/// Rows are matched by guid only; a row whose path went dangling or whose
/// position shifted still receives its edit. Edits whose guid is no longer
/// in the snapshot are dropped: the row was removed out from under us and
/// re-inserting it here would fight the other writer.
///
/// Drains `pending` completely, consumed and stale edits alike. With no
/// pending edits the snapshot comes back unchanged.
pub fn reconcile(snapshot: &[SceneInBuild], pending: &mut PendingEdits) -> Vec<SceneInBuild> {
    if pending.is_empty() {
        return snapshot.to_vec();
    }
    let merged = snapshot
        .iter()
        .map(|scene| match pending.take(scene.guid) {
            Some(enabled) => SceneInBuild { enabled, ..scene.clone() },
            None => scene.clone(),
        })
        .collect();
    pending.clear();
    merged
}

/// Display name of a scene row: the file stem of its portable path.
pub fn display_name(path: &str) -> &str {
    Path::new(path).file_stem().and_then(|stem| stem.to_str()).unwrap_or(path)
}

/// Case-insensitive substring filter over the rows' display names. An
/// empty term matches everything. Rows whose scene no longer resolves are
/// skipped regardless of the term so the surface never offers a dead row.
pub fn filter_scenes<'a, R: SceneResolver>(
    scenes: &'a [SceneInBuild],
    term: &str,
    resolver: &'a R,
) -> impl Iterator<Item = &'a SceneInBuild> {
    let needle = term.trim().to_lowercase();
    scenes.iter().filter(move |scene| {
        if scene.path.is_empty() || resolver.handle_for_path(&scene.path).is_none() {
            return false;
        }
        needle.is_empty() || display_name(&scene.path).to_lowercase().contains(&needle)
    })
}
