//! Navigation seam between the gate and the surrounding router.

use std::sync::{Mutex, PoisonError};

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Add a new history entry.
    Push,
    /// Overwrite the current entry, so back-navigation cannot return to it.
    Replace,
}

/// Performs navigations on behalf of the guard and the role router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, mode: NavigationMode);
}

/// In-memory history stack.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history whose only entry is `path`.
    pub fn starting_at(path: &str) -> Self {
        Self {
            entries: Mutex::new(vec![path.to_string()]),
        }
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The entry currently displayed.
    pub fn current(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str, mode: NavigationMode) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if mode == NavigationMode::Replace {
            entries.pop();
        }
        entries.push(path.to_string());
    }
}
