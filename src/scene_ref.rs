use crate::database::{SceneHandle, SceneResolver};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::mem;

/// A reference to a scene that survives serialization into a format the
/// rich editor handle cannot cross.
///
/// Only the portable path string is ever written out; the handle is
/// re-derived at two fixed synchronization points, [`before_save`] and
/// [`after_load`]. The four states are explicit so every transition has
/// exhaustive behavior instead of two nullable fields drifting apart:
///
/// - `Unset`: neither representation present.
/// - `HandleOnly`: handle held, no path could be derived from it.
/// - `PathOnly`: path held, handle not (yet) recovered.
/// - `Synced`: both present and denoting the same scene.
///
/// Resolution failure never errors out of here; the reference degrades to
/// its next-weaker state and heals on a later synchronization point.
///
/// [`before_save`]: SceneRef::before_save
/// [`after_load`]: SceneRef::after_load
#[derive(Debug, Clone, Default)]
pub enum SceneRef {
    #[default]
    Unset,
    HandleOnly {
        handle: SceneHandle,
    },
    PathOnly {
        path: String,
    },
    Synced {
        handle: SceneHandle,
        path: String,
    },
}

impl SceneRef {
    pub fn from_handle(handle: SceneHandle, resolver: &impl SceneResolver) -> Self {
        let mut scene_ref = SceneRef::Unset;
        scene_ref.set_handle(handle, resolver);
        scene_ref
    }

    pub fn from_path(path: impl Into<String>, resolver: &impl SceneResolver) -> Self {
        let mut scene_ref = SceneRef::Unset;
        scene_ref.set_path(path, resolver);
        scene_ref
    }

    /// Assign the handle side; the path is derived from it. A handle that
    /// no longer resolves is kept with the path cleared.
    pub fn set_handle(&mut self, handle: SceneHandle, resolver: &impl SceneResolver) {
        *self = match resolver.path_for_handle(&handle) {
            Some(path) if !path.is_empty() => SceneRef::Synced { handle, path },
            _ => SceneRef::HandleOnly { handle },
        };
    }

    /// Assign the path side; a handle is resolved from it if possible.
    /// The path is kept even when resolution fails, so a scene that shows
    /// up later can still be recovered. An empty path unsets the
    /// reference.
    pub fn set_path(&mut self, path: impl Into<String>, resolver: &impl SceneResolver) {
        let path = path.into();
        if path.is_empty() {
            *self = SceneRef::Unset;
            return;
        }
        *self = match resolver.handle_for_path(&path) {
            Some(handle) => SceneRef::Synced { handle, path },
            None => SceneRef::PathOnly { path },
        };
    }

    /// Pre-persist synchronization point. With a handle held it is
    /// authoritative and the stored path is recomputed from it; with only
    /// a path held, one recovery attempt is made and the path is kept
    /// either way.
    pub fn before_save(&mut self, resolver: &impl SceneResolver) {
        *self = match mem::take(self) {
            SceneRef::Unset => SceneRef::Unset,
            SceneRef::PathOnly { path } => match resolver.handle_for_path(&path) {
                Some(handle) => SceneRef::Synced { handle, path },
                None => SceneRef::PathOnly { path },
            },
            SceneRef::HandleOnly { handle } | SceneRef::Synced { handle, .. } => {
                match resolver.path_for_handle(&handle) {
                    Some(path) if !path.is_empty() => SceneRef::Synced { handle, path },
                    _ => SceneRef::HandleOnly { handle },
                }
            }
        };
    }

    /// Post-restore synchronization point. Must not run inside the restore
    /// itself (the resolver is off-limits there); callers defer it to the
    /// next editor idle tick. A path that fails recovery here is dropped:
    /// the reference becomes `Unset` instead of keeping an unreachable
    /// path around. Idempotent, so firing once per restore event more than
    /// once is harmless.
    pub fn after_load(&mut self, resolver: &impl SceneResolver) {
        *self = match mem::take(self) {
            SceneRef::PathOnly { path } => match resolver.handle_for_path(&path) {
                Some(handle) => SceneRef::Synced { handle, path },
                None => SceneRef::Unset,
            },
            other => other,
        };
    }

    /// The up-to-date portable path. With a handle present it is derived
    /// live so a scene moved on disk reports its current location; without
    /// one the stored path is returned verbatim. Empty means unset.
    pub fn current_path(&self, resolver: &impl SceneResolver) -> String {
        match self {
            SceneRef::Unset => String::new(),
            SceneRef::PathOnly { path } => path.clone(),
            SceneRef::HandleOnly { handle } | SceneRef::Synced { handle, .. } => {
                resolver.path_for_handle(handle).unwrap_or_default()
            }
        }
    }

    pub fn handle(&self) -> Option<&SceneHandle> {
        match self {
            SceneRef::HandleOnly { handle } | SceneRef::Synced { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// The path as stored, without consulting the resolver. This is what
    /// serialization writes.
    pub fn stored_path(&self) -> &str {
        match self {
            SceneRef::PathOnly { path } | SceneRef::Synced { path, .. } => path,
            _ => "",
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, SceneRef::Unset)
    }
}

impl Serialize for SceneRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.stored_path())
    }
}

impl<'de> Deserialize<'de> for SceneRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(if path.is_empty() { SceneRef::Unset } else { SceneRef::PathOnly { path } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SceneAsset;
    use std::collections::HashMap;
    use std::sync::Arc;
    use uuid::Uuid;

    #[derive(Default)]
    struct TableResolver {
        by_path: HashMap<String, SceneHandle>,
        by_guid: HashMap<Uuid, String>,
    }

    impl TableResolver {
        fn insert(&mut self, path: &str) -> SceneHandle {
            let handle = SceneAsset::fixed_for_tests(Uuid::new_v4());
            self.by_path.insert(path.to_string(), Arc::clone(&handle));
            self.by_guid.insert(handle.guid(), path.to_string());
            handle
        }

        fn remove(&mut self, path: &str) {
            if let Some(handle) = self.by_path.remove(path) {
                self.by_guid.remove(&handle.guid());
            }
        }

        fn relocate(&mut self, from: &str, to: &str) {
            if let Some(handle) = self.by_path.remove(from) {
                self.by_guid.insert(handle.guid(), to.to_string());
                self.by_path.insert(to.to_string(), handle);
            }
        }
    }

    impl SceneResolver for TableResolver {
        fn path_for_handle(&self, handle: &SceneHandle) -> Option<String> {
            self.by_guid.get(&handle.guid()).cloned()
        }

        fn handle_for_path(&self, path: &str) -> Option<SceneHandle> {
            self.by_path.get(path).map(Arc::clone)
        }
    }

    #[test]
    fn set_path_with_resolvable_scene_syncs() {
        let mut resolver = TableResolver::default();
        resolver.insert("scenes/title.json");

        let scene_ref = SceneRef::from_path("scenes/title.json", &resolver);
        assert!(matches!(scene_ref, SceneRef::Synced { .. }));
        assert_eq!(scene_ref.current_path(&resolver), "scenes/title.json");
    }

    #[test]
    fn set_path_keeps_path_on_first_resolution_failure() {
        let resolver = TableResolver::default();
        let scene_ref = SceneRef::from_path("scenes/missing.json", &resolver);
        assert!(matches!(scene_ref, SceneRef::PathOnly { .. }));
        assert_eq!(scene_ref.current_path(&resolver), "scenes/missing.json");
    }

    #[test]
    fn set_empty_path_unsets() {
        let resolver = TableResolver::default();
        let scene_ref = SceneRef::from_path("", &resolver);
        assert!(scene_ref.is_unset());
    }

    #[test]
    fn set_handle_keeps_handle_when_path_derivation_fails() {
        let mut resolver = TableResolver::default();
        let handle = resolver.insert("scenes/hub.json");
        resolver.remove("scenes/hub.json");

        let scene_ref = SceneRef::from_handle(handle, &resolver);
        assert!(matches!(scene_ref, SceneRef::HandleOnly { .. }));
        assert_eq!(scene_ref.current_path(&resolver), "");
    }

    #[test]
    fn before_save_trusts_the_handle_over_a_stale_path() {
        let mut resolver = TableResolver::default();
        resolver.insert("scenes/old.json");
        let mut scene_ref = SceneRef::from_path("scenes/old.json", &resolver);

        // The scene moved on disk after the reference synced.
        resolver.relocate("scenes/old.json", "scenes/new.json");
        scene_ref.before_save(&resolver);

        assert!(matches!(scene_ref, SceneRef::Synced { .. }));
        assert_eq!(scene_ref.stored_path(), "scenes/new.json");
    }

    #[test]
    fn before_save_recovers_a_handle_from_a_bare_path() {
        let mut resolver = TableResolver::default();
        let mut scene_ref = SceneRef::from_path("scenes/late.json", &resolver);
        assert!(scene_ref.handle().is_none());

        resolver.insert("scenes/late.json");
        scene_ref.before_save(&resolver);
        assert!(matches!(scene_ref, SceneRef::Synced { .. }));
        assert_eq!(scene_ref.stored_path(), "scenes/late.json");
    }

    #[test]
    fn before_save_keeps_the_path_when_recovery_fails() {
        let resolver = TableResolver::default();
        let mut scene_ref = SceneRef::from_path("scenes/waiting.json", &resolver);
        scene_ref.before_save(&resolver);
        assert!(matches!(scene_ref, SceneRef::PathOnly { .. }));
        assert_eq!(scene_ref.stored_path(), "scenes/waiting.json");
    }

    #[test]
    fn after_load_recovers_the_handle() {
        let mut resolver = TableResolver::default();
        resolver.insert("scenes/title.json");

        let mut scene_ref: SceneRef =
            serde_json::from_str("\"scenes/title.json\"").expect("deserialize");
        assert!(matches!(scene_ref, SceneRef::PathOnly { .. }));

        scene_ref.after_load(&resolver);
        assert!(matches!(scene_ref, SceneRef::Synced { .. }));
        assert_eq!(scene_ref.current_path(&resolver), "scenes/title.json");
    }

    #[test]
    fn after_load_drops_an_unrecoverable_path() {
        let resolver = TableResolver::default();
        let mut scene_ref = SceneRef::PathOnly { path: "scenes/gone.json".to_string() };
        scene_ref.after_load(&resolver);
        assert!(scene_ref.is_unset());
        assert_eq!(scene_ref.current_path(&resolver), "");
    }

    #[test]
    fn after_load_is_idempotent() {
        let mut resolver = TableResolver::default();
        resolver.insert("scenes/title.json");
        let mut scene_ref = SceneRef::PathOnly { path: "scenes/title.json".to_string() };
        scene_ref.after_load(&resolver);
        scene_ref.after_load(&resolver);
        assert!(matches!(scene_ref, SceneRef::Synced { .. }));
    }

    #[test]
    fn current_path_is_derived_live_when_a_handle_is_held() {
        let mut resolver = TableResolver::default();
        resolver.insert("scenes/a.json");
        let scene_ref = SceneRef::from_path("scenes/a.json", &resolver);

        resolver.relocate("scenes/a.json", "scenes/b.json");
        assert_eq!(scene_ref.current_path(&resolver), "scenes/b.json");
        // The stored path only catches up at the next synchronization point.
        assert_eq!(scene_ref.stored_path(), "scenes/a.json");
    }

    #[test]
    fn serialization_carries_only_the_path() {
        let mut resolver = TableResolver::default();
        resolver.insert("scenes/title.json");
        let scene_ref = SceneRef::from_path("scenes/title.json", &resolver);

        let json = serde_json::to_string(&scene_ref).expect("serialize");
        assert_eq!(json, "\"scenes/title.json\"");

        let restored: SceneRef = serde_json::from_str(&json).expect("deserialize");
        assert!(restored.handle().is_none(), "the handle never crosses serialization");
        assert_eq!(restored.stored_path(), "scenes/title.json");
    }

    #[test]
    fn unset_serializes_as_empty_string() {
        let json = serde_json::to_string(&SceneRef::Unset).expect("serialize");
        assert_eq!(json, "\"\"");
        let restored: SceneRef = serde_json::from_str(&json).expect("deserialize");
        assert!(restored.is_unset());
    }
}
