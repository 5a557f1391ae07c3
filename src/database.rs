use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

const SCENE_EXTENSION: &str = "json";

/// An editor-process-only view of a scene on disk. Handles are handed out
/// by the [`SceneDatabase`] and are never serialized; the portable string
/// path is the only representation that crosses a save boundary.
#[derive(Debug)]
pub struct SceneAsset {
    guid: Uuid,
}

impl SceneAsset {
    pub fn guid(&self) -> Uuid {
        self.guid
    }

    #[cfg(test)]
    pub(crate) fn fixed_for_tests(guid: Uuid) -> SceneHandle {
        Arc::new(SceneAsset { guid })
    }
}

pub type SceneHandle = Arc<SceneAsset>;

/// Both resolution directions may fail without it being an error: a path
/// can dangle and a handle can outlive its file.
pub trait SceneResolver {
    fn path_for_handle(&self, handle: &SceneHandle) -> Option<String>;
    fn handle_for_path(&self, path: &str) -> Option<SceneHandle>;
}

/// Scans a scenes root for scene files and answers handle/path lookups.
/// Guids are kept stable across rescans and editor sessions through a
/// persisted path-to-guid index; an index entry survives its file going
/// missing, so a scene restored at the same path gets its old guid back.
pub struct SceneDatabase {
    root: PathBuf,
    index_path: PathBuf,
    index: BTreeMap<String, Uuid>,
    handles: HashMap<Uuid, SceneHandle>,
    paths_by_guid: HashMap<Uuid, String>,
    guids_by_path: HashMap<String, Uuid>,
    revision: u64,
}

impl SceneDatabase {
    pub fn new(root: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        let index_path = index_path.into();
        let index = Self::load_index(&index_path);
        Self {
            root: root.into(),
            index_path,
            index,
            handles: HashMap::new(),
            paths_by_guid: HashMap::new(),
            guids_by_path: HashMap::new(),
            revision: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn scene_count(&self) -> usize {
        self.guids_by_path.len()
    }

    pub fn handle_for_guid(&self, guid: Uuid) -> Option<SceneHandle> {
        if !self.paths_by_guid.contains_key(&guid) {
            return None;
        }
        self.handles.get(&guid).cloned()
    }

    pub fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .with_context(|| format!("Creating scenes directory {}", self.root.display()))?;
        }
        Ok(())
    }

    /// Rescan the scenes root and rebuild the lookup tables. New files are
    /// assigned fresh guids; files already in the index keep theirs.
    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_root()?;
        let mut found = Vec::new();
        collect_scene_files(&self.root, &self.root, &mut found)?;
        found.sort();

        let mut index_dirty = false;
        let mut paths_by_guid = HashMap::new();
        let mut guids_by_path = HashMap::new();
        for path in found {
            let guid = match self.index.get(&path) {
                Some(guid) => *guid,
                None => {
                    let guid = Uuid::new_v4();
                    self.index.insert(path.clone(), guid);
                    index_dirty = true;
                    guid
                }
            };
            self.handles.entry(guid).or_insert_with(|| Arc::new(SceneAsset { guid }));
            paths_by_guid.insert(guid, path.clone());
            guids_by_path.insert(path, guid);
        }
        self.paths_by_guid = paths_by_guid;
        self.guids_by_path = guids_by_path;
        if index_dirty {
            self.store_index()?;
        }
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    fn load_index(path: &Path) -> BTreeMap<String, Uuid> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("[scene-db] failed to read guid index: {err}");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(index) => index,
            Err(err) => {
                eprintln!("[scene-db] failed to parse guid index: {err}");
                BTreeMap::new()
            }
        }
    }

    fn store_index(&self) -> Result<()> {
        if let Some(parent) = self.index_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create guid index dir {}", parent.display()))?;
            }
        }
        let data = serde_json::to_string_pretty(&self.index)?;
        fs::write(&self.index_path, data)
            .with_context(|| format!("Failed to write guid index {}", self.index_path.display()))?;
        Ok(())
    }
}

impl SceneResolver for SceneDatabase {
    fn path_for_handle(&self, handle: &SceneHandle) -> Option<String> {
        self.paths_by_guid.get(&handle.guid()).cloned()
    }

    fn handle_for_path(&self, path: &str) -> Option<SceneHandle> {
        let guid = self.guids_by_path.get(path)?;
        self.handles.get(guid).cloned()
    }
}

fn collect_scene_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("Scanning scenes under {}", dir.display()))?
    {
        let entry = entry?;
        let ty = entry.file_type()?;
        let path = entry.path();
        if ty.is_dir() {
            collect_scene_files(root, &path, out)?;
            continue;
        }
        if !ty.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCENE_EXTENSION) {
            continue;
        }
        if let Some(portable) = portable_path(root, &path) {
            out.push(portable);
        }
    }
    Ok(())
}

/// Root-relative path with forward slashes, valid on every platform the
/// registry file may be shared across.
fn portable_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str()?;
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(part);
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
