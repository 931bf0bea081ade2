//! Cross-thread handle on a project.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::Project;

/// A [`Project`] behind one mutex.
///
/// Every touch and run goes through [`lock`](SharedProject::lock), so a
/// sequence like `set_source` followed by `run` is never interleaved with
/// another thread's edits while the guard is held.
#[derive(Default)]
pub struct SharedProject(Arc<Mutex<Project>>);

impl SharedProject {
    pub fn new(project: Project) -> Self {
        SharedProject(Arc::new(Mutex::new(project)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Project> {
        self.0.lock()
    }

    /// Run `f` with the project locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Project) -> R) -> R {
        f(&mut self.0.lock())
    }
}

impl Clone for SharedProject {
    fn clone(&self) -> Self {
        SharedProject(Arc::clone(&self.0))
    }
}

impl fmt::Debug for SharedProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedProject({:?})", self.0.lock().source_ids())
    }
}
