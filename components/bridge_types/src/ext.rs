//! Extension record tags.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_TAG: AtomicU32 = AtomicU32::new(1);

/// Key identifying who owns an extension record on a scalar.
///
/// Tags are handed out once per owner and never reused, so a record can be
/// recognised by its tag alone. Two independently registered tags never
/// compare equal.
///
/// # Examples
///
/// ```
/// use bridge_types::ExtTag;
///
/// let a = ExtTag::register("a");
/// let b = ExtTag::register("b");
/// assert_ne!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtTag {
    id: u32,
    owner: &'static str,
}

impl ExtTag {
    /// Registers a new process-wide tag for `owner`.
    ///
    /// Call this once and keep the result; calling it again yields a
    /// different tag.
    pub fn register(owner: &'static str) -> Self {
        let id = NEXT_TAG.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, owner, "registered extension tag");
        ExtTag { id, owner }
    }

    /// Numeric id of this tag.
    pub fn id(self) -> u32 {
        self.id
    }

    /// Name given at registration.
    pub fn owner(self) -> &'static str {
        self.owner
    }
}

impl fmt::Debug for ExtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtTag({}#{})", self.owner, self.id)
    }
}
