use slotmap::new_key_type;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    pub struct ParticleId;
}

static NEXT_ENTITY_UID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identity assigned to every entity at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityUid(u64);

impl EntityUid {
    pub(crate) fn allocate() -> Self {
        Self(NEXT_ENTITY_UID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
