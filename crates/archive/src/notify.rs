use serde::{Deserialize, Serialize};

/// Content revision of one archive.
///
/// Bumped once per mutating call that changed a count. Saturates rather than
/// wrapping so it never appears to go backwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Revision(pub u32);

impl Revision {
    /// Revision of a freshly constructed archive.
    pub const ZERO: Self = Self(0);

    /// The following revision.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Revision counter plus a "contents changed" flag for save scheduling.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    revision: Revision,
    dirty: bool,
}

impl ChangeNotifier {
    /// Start at [`Revision::ZERO`], clean.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a persisted revision, clean.
    pub fn resume(revision: Revision) -> Self {
        Self {
            revision,
            dirty: false,
        }
    }

    /// Record one successful mutation.
    pub fn bump(&mut self) {
        self.revision = self.revision.next();
        self.dirty = true;
    }

    /// Current revision.
    pub fn current(&self) -> Revision {
        self.revision
    }

    /// Whether anything changed since the last [`take_dirty`](Self::take_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the changed flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
