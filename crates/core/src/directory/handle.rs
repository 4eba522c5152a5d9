use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::directory::{Directory, DirectoryError, LoadedDirectory, ValidationMode};

/// Shared directory that can be swapped atomically while calls are in flight.
/// Readers take a snapshot and keep it for the whole decision.
#[derive(Debug)]
pub struct DirectoryHandle {
    current: RwLock<Arc<Directory>>,
}

impl DirectoryHandle {
    pub fn new(directory: Directory) -> Self {
        Self { current: RwLock::new(Arc::new(directory)) }
    }

    pub fn snapshot(&self) -> Arc<Directory> {
        let guard = match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(&guard)
    }

    /// Installs a new directory and returns the one it replaced.
    pub fn replace(&self, directory: Directory) -> Arc<Directory> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::mem::replace(&mut *guard, Arc::new(directory));
        info!(
            event_name = "directory.reloaded",
            staff_count = guard.staff().len(),
            previous_staff_count = previous.staff().len(),
            "directory replaced"
        );
        previous
    }

    /// Loads and validates a directory file. The current directory stays in place on error.
    pub fn reload(
        &self,
        path: &Path,
        mode: ValidationMode,
    ) -> Result<LoadedDirectory, DirectoryError> {
        let loaded = Directory::load(path, mode)?;
        self.replace(loaded.directory.clone());
        Ok(loaded)
    }
}
