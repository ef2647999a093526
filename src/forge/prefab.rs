/// Prefab files on disk
///
/// A prefab is a saved group of forge objects stored as `<name>.prefab` in a
/// single flat directory. Writing and reading the contents is the editor's
/// job; this only resolves paths and enforces the existence rules.
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::ForgeEditor;
use crate::error::PrefabError;

/// File extension of saved prefabs, without the dot
pub const PREFAB_EXT: &str = "prefab";

/// Letters, digits, spaces, `_` and `-` only; no separators or dots
fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_\- ]{1,64}$").ok())
        .as_ref()
}

/// Prefab directory
#[derive(Debug, Clone)]
pub struct PrefabLibrary {
    dir: PathBuf,
}

impl PrefabLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the named prefab lives at
    pub fn path_for(&self, name: &str) -> Result<PathBuf, PrefabError> {
        let valid = name_pattern().map_or(false, |re| re.is_match(name));
        if !valid || name.trim().is_empty() {
            return Err(PrefabError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", name, PREFAB_EXT)))
    }

    /// Save the editor's current selection under `name`
    ///
    /// Existing prefabs are never overwritten.
    pub fn save(&self, name: &str, editor: &dyn ForgeEditor) -> Result<PathBuf, PrefabError> {
        let path = self.path_for(name)?;

        fs::create_dir_all(&self.dir).map_err(|e| PrefabError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        if path.exists() {
            return Err(PrefabError::AlreadyExists);
        }

        if !editor.save_prefab(name, &path) {
            return Err(PrefabError::SaveFailed);
        }

        tracing::info!("Saved prefab {} to {}", name, path.display());
        Ok(path)
    }

    /// Spawn the named prefab through the editor
    pub fn load(&self, name: &str, editor: &dyn ForgeEditor) -> Result<PathBuf, PrefabError> {
        let path = self.path_for(name)?;

        if !path.exists() {
            return Err(PrefabError::NotFound);
        }

        if !editor.load_prefab(&path) {
            return Err(PrefabError::LoadFailed);
        }

        tracing::info!("Loaded prefab {}", name);
        Ok(path)
    }

    /// Names of saved prefabs, sorted; empty when the directory is missing
    pub fn list(&self) -> Result<Vec<String>, PrefabError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| PrefabError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(PREFAB_EXT))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();

        names.sort();
        Ok(names)
    }

    /// Saved prefab names as a JSON array
    pub fn dump_json(&self) -> Result<String, PrefabError> {
        let names = self.list()?;
        serde_json::to_string(&names).map_err(|e| PrefabError::Io {
            path: self.dir.display().to_string(),
            source: e.into(),
        })
    }
}
