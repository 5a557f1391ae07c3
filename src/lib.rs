pub mod app;
pub mod build_list;
pub mod database;
pub mod lifecycle;
pub mod prefs;
pub mod preset;
pub mod project;
pub mod registry;
pub mod scene_ref;
pub mod scene_watch;

pub use app::{EditorShell, StatusKind, StatusMessage};
pub use build_list::{display_name, filter_scenes, reconcile, PendingEdits};
pub use database::{SceneDatabase, SceneHandle, SceneResolver};
pub use registry::{BuildRegistry, BuildSettingsFile, MemoryBuildRegistry, SceneInBuild};
pub use scene_ref::SceneRef;
