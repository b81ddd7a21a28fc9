//! File-backed document store.
//!
//! One directory per collection under `{DATA_DIR}`, one pretty-printed JSON
//! file per record (`{DATA_DIR}/tasks/{id}.json`). Writes go through a temp
//! file and a rename so a crash never leaves half a document behind.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use taskmate_core::{Note, Project, Result, Task, TaskMateError};
use tracing::{info, warn};

/// A record type that lives in its own collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Directory name under the data dir.
    const COLLECTION: &'static str;
    /// Human-readable name used in errors.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

impl Document for Task {
    const COLLECTION: &'static str = "tasks";
    const KIND: &'static str = "Task";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Note {
    const COLLECTION: &'static str = "notes";
    const KIND: &'static str = "Note";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const KIND: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }
}

pub struct DocumentStore<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

/// Ids are generated UUIDs; anything else cannot name a stored file.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl<T: Document> DocumentStore<T> {
    /// Open the collection, creating its directory if needed.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join(T::COLLECTION);
        fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "{} store initialized", T::KIND);
        Ok(Self {
            dir,
            _marker: PhantomData,
        })
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Every readable record, in no particular order. Corrupt files are skipped.
    pub fn list(&self) -> Result<Vec<T>> {
        let mut docs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(data) => match serde_json::from_str::<T>(&data) {
                    Ok(doc) => docs.push(doc),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping corrupt {}", T::KIND);
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read {}", T::KIND);
                }
            }
        }
        Ok(docs)
    }

    pub fn get(&self, id: &str) -> Result<Option<T>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        let path = self.path(id);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Insert or replace a record.
    pub fn save(&self, doc: &T) -> Result<()> {
        let id = doc.id();
        if !is_valid_id(id) {
            return Err(TaskMateError::Validation(format!(
                "invalid {} id '{}'",
                T::KIND,
                id
            )));
        }
        let data = serde_json::to_string_pretty(doc)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", id));
        fs::write(&tmp, data)?;
        fs::rename(&tmp, self.path(id))?;
        Ok(())
    }

    /// Returns `false` when there was nothing to delete.
    pub fn delete(&self, id: &str) -> Result<bool> {
        if !is_valid_id(id) {
            return Ok(false);
        }
        let path = self.path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    /// Like [`get`](Self::get) but missing records are an error.
    pub fn require(&self, id: &str) -> Result<T> {
        self.get(id)?.ok_or_else(|| TaskMateError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskmate_core::NewTask;

    fn new_task(title: &str) -> Task {
        Task::from_new(
            NewTask {
                title: Some(title.into()),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn save_get_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::<Task>::open(dir.path()).unwrap();

        let a = new_task("a");
        let b = new_task("b");
        store.save(&a).unwrap();
        store.save(&b).unwrap();

        assert_eq!(store.get(&a.id).unwrap().unwrap().title, "a");
        assert_eq!(store.list().unwrap().len(), 2);

        assert!(store.delete(&a.id).unwrap());
        assert!(!store.delete(&a.id).unwrap());
        assert!(store.get(&a.id).unwrap().is_none());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn save_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::<Task>::open(dir.path()).unwrap();

        let mut task = new_task("draft");
        store.save(&task).unwrap();
        task.title = "final".into();
        store.save(&task).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.require(&task.id).unwrap().title, "final");
    }

    #[test]
    fn corrupt_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::<Task>::open(dir.path()).unwrap();
        store.save(&new_task("ok")).unwrap();
        fs::write(dir.path().join("tasks").join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("tasks").join("README.txt"), "ignored").unwrap();

        let tasks = store.list().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "ok");
    }

    #[test]
    fn path_like_ids_never_reach_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::<Task>::open(dir.path()).unwrap();
        assert!(store.get("../secrets").unwrap().is_none());
        assert!(!store.delete("..").unwrap());
        assert!(matches!(
            store.require("missing-id"),
            Err(TaskMateError::NotFound { kind: "Task", .. })
        ));
    }

    #[test]
    fn collections_are_separate_directories() {
        let dir = tempfile::tempdir().unwrap();
        DocumentStore::<Task>::open(dir.path()).unwrap();
        DocumentStore::<Note>::open(dir.path()).unwrap();
        DocumentStore::<Project>::open(dir.path()).unwrap();
        for name in ["tasks", "notes", "projects"] {
            assert!(dir.path().join(name).is_dir());
        }
    }
}
