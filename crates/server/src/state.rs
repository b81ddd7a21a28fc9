use std::path::Path;

use tokio::sync::{Mutex, RwLock};

use taskmate_core::{Note, Project, Task};
use taskmate_prioritizer::Prioritizer;

use crate::keep_alive::KeepAlive;
use crate::store::DocumentStore;

pub struct AppState {
    pub tasks: RwLock<DocumentStore<Task>>,
    pub notes: RwLock<DocumentStore<Note>>,
    pub projects: RwLock<DocumentStore<Project>>,
    pub prioritizer: Prioritizer,
    pub keep_alive: Mutex<KeepAlive>,
}

impl AppState {
    /// Open every collection under `data_dir`.
    pub fn open(
        data_dir: &Path,
        prioritizer: Prioritizer,
        keep_alive: KeepAlive,
    ) -> taskmate_core::Result<Self> {
        Ok(Self {
            tasks: RwLock::new(DocumentStore::open(data_dir)?),
            notes: RwLock::new(DocumentStore::open(data_dir)?),
            projects: RwLock::new(DocumentStore::open(data_dir)?),
            prioritizer,
            keep_alive: Mutex::new(keep_alive),
        })
    }
}
