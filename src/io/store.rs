//! Offline Transport: one pretty-printed JSON file per list.
//!
//! Layout under the store directory:
//!
//! ```text
//! sharedo.toml
//! lists/<list id>.json
//! ```

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::list::TodoList;
use crate::remote::{RemoteError, Transport};

/// Error type for store I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not parse {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no list with id {0}")]
    NotFound(String),
    #[error("invalid list id: {0:?}")]
    InvalidId(String),
}

impl From<StoreError> for RemoteError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => RemoteError::NotFound(id),
            StoreError::InvalidId(id) => RemoteError::NotFound(id),
            other => RemoteError::Unavailable(other.to_string()),
        }
    }
}

/// Directory-backed list store
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open (creating if needed) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let lists = root.join("lists");
        fs::create_dir_all(&lists).map_err(|e| StoreError::Write {
            path: lists,
            source: e,
        })?;
        Ok(JsonStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn list_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join("lists").join(format!("{}.json", id)))
    }

    pub fn load(&self, id: &str) -> Result<TodoList, StoreError> {
        let path = self.list_path(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Err(e) => return Err(StoreError::Read { path, source: e }),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::Parse { path, source: e })
    }

    pub fn save(&self, list: &TodoList) -> Result<(), StoreError> {
        let path = self.list_path(&list.id)?;
        let mut json = serde_json::to_string_pretty(list)?;
        json.push('\n');
        atomic_write(&path, json.as_bytes()).map_err(|e| StoreError::Write {
            path: path.clone(),
            source: e,
        })?;
        debug!(list_id = %list.id, path = %path.display(), "list written");
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let path = self.list_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(StoreError::Write { path, source: e }),
        }
    }

    /// Every readable list, oldest first. Unparseable files are skipped.
    pub fn all(&self) -> Result<Vec<TodoList>, StoreError> {
        let dir = self.root.join("lists");
        let entries = fs::read_dir(&dir).map_err(|e| StoreError::Read {
            path: dir.clone(),
            source: e,
        })?;
        let mut lists = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Read {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load(id) {
                Ok(list) => lists.push(list),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable list"),
            }
        }
        lists.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(lists)
    }

    fn update(
        &self,
        id: &str,
        f: impl FnOnce(&mut TodoList) -> Result<(), RemoteError>,
    ) -> Result<TodoList, RemoteError> {
        let mut list = self.load(id)?;
        f(&mut list)?;
        list.updated_at = Some(Utc::now());
        self.save(&list)?;
        Ok(list)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Transport for JsonStore {
    fn fetch_list(&self, list_id: &str) -> Result<TodoList, RemoteError> {
        Ok(self.load(list_id)?)
    }

    fn persist_list(&self, list: &TodoList) -> Result<TodoList, RemoteError> {
        let existing = self.load(&list.id)?;
        let mut saved = list.clone();
        saved.created_at = existing.created_at;
        saved.updated_at = Some(Utc::now());
        self.save(&saved)?;
        Ok(saved)
    }

    fn delete_list(&self, list_id: &str) -> Result<(), RemoteError> {
        Ok(self.remove(list_id)?)
    }

    fn share_list(&self, list_id: &str, email: &str) -> Result<TodoList, RemoteError> {
        self.update(list_id, |list| {
            if !list.shared_with.insert(email.to_string()) {
                return Err(RemoteError::Rejected {
                    reason: format!("list is already shared with {}", email),
                });
            }
            Ok(())
        })
    }

    fn create_list(&self, owner_id: &str, title: &str) -> Result<TodoList, RemoteError> {
        let mut list = TodoList::new(Uuid::new_v4().to_string(), owner_id, title);
        let now = Utc::now();
        list.created_at = Some(now);
        list.updated_at = Some(now);
        self.save(&list)?;
        Ok(list)
    }

    fn set_frozen(&self, list_id: &str, frozen: bool) -> Result<TodoList, RemoteError> {
        self.update(list_id, |list| {
            list.frozen = frozen;
            Ok(())
        })
    }

    fn user_lists(&self, user_id: &str) -> Result<Vec<TodoList>, RemoteError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|l| l.owner_id == user_id || l.shared_with.contains(user_id))
            .collect())
    }
}
