//! Navigation collaborator — step URLs and the major encoded in them.
//!
//! The core never owns routing; it pushes `/{major}/step{n}` paths to a
//! [`Navigator`] and reads the active major back out of the current path.

use std::str::FromStr;
use std::sync::RwLock;

use crate::questions::Major;
use crate::wizard::state::WizardStep;

/// Where the session lands after a successful submission.
pub const CONFIRMATION_PATH: &str = "/thanks";

/// The routing collaborator the wizard drives.
pub trait Navigator: Send + Sync {
    /// Move the client to `path`.
    fn push(&self, path: &str);

    /// The client's current location.
    fn current_path(&self) -> String;
}

/// Server-side record of the client location. Doubles as the test
/// navigator.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: RwLock<String>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(initial.into()),
        }
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, path: &str) {
        let mut current = self.path.write().expect("navigator lock poisoned");
        *current = path.to_string();
    }

    fn current_path(&self) -> String {
        self.path.read().expect("navigator lock poisoned").clone()
    }
}

/// Read the major out of a `/{major}/step{n}` path, `None` when the first
/// segment is missing or not a known major.
pub fn category_from_path(path: &str) -> Option<Major> {
    let first = path.split('/').find(|s| !s.is_empty())?;
    Major::from_str(first).ok()
}

/// Build the path for a step within a major's track.
pub fn step_path(major: Major, step: WizardStep) -> String {
    if step == WizardStep::Submitted {
        return CONFIRMATION_PATH.to_string();
    }
    format!("/{major}/{}", step.path_segment())
}
