//! Load-session string interning.
//!
//! Road names repeat heavily (every segment of a long street carries the
//! same name), so the loader resolves each name through a `StringInterner`
//! and stores the shared `Arc<str>`.  The interner is owned by one load
//! session and shared by that session's workers; there is no global table.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

/// Thread-safe set of shared strings.
#[derive(Debug, Default)]
pub struct StringInterner {
    strings: Mutex<FxHashSet<Arc<str>>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared instance equal to `s`, inserting it on first use.
    pub fn intern(&self, s: &str) -> Arc<str> {
        let mut strings = self.strings.lock();
        if let Some(existing) = strings.get(s) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(s);
        strings.insert(Arc::clone(&shared));
        shared
    }

    /// Number of distinct strings seen so far.
    pub fn len(&self) -> usize {
        self.strings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.lock().is_empty()
    }
}
