use crate::build_list::PendingEdits;
use crate::database::SceneDatabase;
use crate::lifecycle::IdleQueue;
use crate::prefs::EditorPrefs;
use crate::project::{ProjectManifest, DEFAULT_MANIFEST_NAME};
use crate::registry::{BuildRegistry, BuildSettingsFile};
use crate::scene_watch::SceneWatch;
use anyhow::Result;
use std::path::{Path, PathBuf};

mod build_list_tooling;
mod preset_tooling;
mod quick_play_tooling;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "ok",
            StatusKind::Warning => "warning",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
}

/// The editing surface around the build registry and the project's
/// startup scene reference. Enable/disable edits are staged locally and
/// only merged into the registry on [`apply_pending_edits`], since other
/// writers may reshape the registry at any time between the two.
///
/// [`apply_pending_edits`]: EditorShell::apply_pending_edits
pub struct EditorShell<R: BuildRegistry> {
    root: PathBuf,
    manifest_path: PathBuf,
    manifest: ProjectManifest,
    database: SceneDatabase,
    registry: R,
    prefs: EditorPrefs,
    pending_edits: PendingEdits,
    search_term: String,
    status: Option<StatusMessage>,
    idle: IdleQueue<EditorShell<R>>,
    scene_watch: Option<SceneWatch>,
    open_scene: Option<String>,
    playing: bool,
}

impl EditorShell<BuildSettingsFile> {
    /// Open the project at `root` with the file-backed build registry.
    pub fn open_project(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let manifest = ProjectManifest::load_or_default(root.join(DEFAULT_MANIFEST_NAME));
        let registry = BuildSettingsFile::load_or_empty(root.join(&manifest.build_settings));
        Self::with_registry(root, manifest, registry)
    }
}

impl<R: BuildRegistry + 'static> EditorShell<R> {
    pub fn with_registry(
        root: impl Into<PathBuf>,
        manifest: ProjectManifest,
        registry: R,
    ) -> Result<Self> {
        let root = root.into();
        let manifest_path = root.join(DEFAULT_MANIFEST_NAME);
        let scenes_root = root.join(&manifest.scenes);
        let mut database = SceneDatabase::new(&scenes_root, root.join(&manifest.scene_index));
        database.refresh()?;
        let scene_watch = match SceneWatch::new(&scenes_root) {
            Ok(watch) => Some(watch),
            Err(err) => {
                eprintln!("[shell] scene watcher unavailable: {err}");
                None
            }
        };
        let prefs = EditorPrefs::load_or_default(root.join(&manifest.prefs));
        let mut shell = Self {
            root,
            manifest_path,
            manifest,
            database,
            registry,
            prefs,
            pending_edits: PendingEdits::default(),
            search_term: String::new(),
            status: None,
            idle: IdleQueue::default(),
            scene_watch,
            open_scene: None,
            playing: false,
        };
        // The manifest was just restored; the reference sync must wait for
        // the first idle tick because the database is off-limits inside a
        // restore.
        shell.schedule_reference_recovery();
        Ok(shell)
    }

    /// One editor idle tick: pick up filesystem changes, then run any
    /// deferred one-shot callbacks.
    pub fn update(&mut self) {
        if let Some(watch) = self.scene_watch.as_mut() {
            if watch.take_changes() {
                if let Err(err) = self.database.refresh() {
                    eprintln!("[shell] scene database refresh failed: {err}");
                }
            }
        }
        for callback in self.idle.drain() {
            callback(self);
        }
    }

    /// Persist the manifest, synchronizing the startup scene reference
    /// first; a held handle is authoritative over the stored path.
    pub fn save_project(&mut self) -> Result<()> {
        self.manifest.startup_scene.before_save(&self.database);
        self.manifest.save_to_path(&self.manifest_path)
    }

    /// Re-read the manifest's content fields (name, startup scene) from
    /// disk. Structural paths (scenes root, registry file) are fixed for
    /// the shell's lifetime and picked up on the next open.
    pub fn reload_project(&mut self) -> Result<()> {
        self.manifest = ProjectManifest::load(&self.manifest_path)?;
        self.schedule_reference_recovery();
        Ok(())
    }

    fn schedule_reference_recovery(&mut self) {
        self.idle.schedule(|shell: &mut Self| {
            shell.manifest.startup_scene.after_load(&shell.database);
        });
    }

    pub fn set_startup_scene_path(&mut self, path: impl Into<String>) {
        self.manifest.startup_scene.set_path(path, &self.database);
    }

    /// The startup scene's current portable path, derived live from the
    /// handle when one is held. Empty means unset. Reads between a project
    /// reload and the next [`update`] may still observe the pre-recovery
    /// value.
    ///
    /// [`update`]: EditorShell::update
    pub fn startup_scene_path(&self) -> String {
        self.manifest.startup_scene.current_path(&self.database)
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database(&self) -> &SceneDatabase {
        &self.database
    }

    pub fn refresh_database(&mut self) -> Result<()> {
        self.database.refresh()
    }

    pub fn prefs(&self) -> &EditorPrefs {
        &self.prefs
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some(StatusMessage { kind, message: message.into() });
    }

    pub fn open_scene(&mut self, path: impl Into<String>) {
        self.open_scene = Some(path.into());
    }

    pub fn open_scene_path(&self) -> Option<&str> {
        self.open_scene.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
