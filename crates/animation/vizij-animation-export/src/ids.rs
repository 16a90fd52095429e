//! Identifiers for channel groups and export sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a channel group, assigned by the scene traversal that supplies it.
///
/// Ids must be unique within an export session; the session rejects a second
/// data path under an id it has already exported.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Identity of one export run. Cached results never outlive their session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session #{}", self.0)
    }
}

/// Monotonic allocator for SessionId.
#[derive(Default, Debug)]
pub struct SessionIdAllocator {
    next_session: u32,
}

impl SessionIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session = self.next_session.wrapping_add(1);
        id
    }
}
