//! Session version tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic version of a navigation session.
///
/// Bumped whenever the session changes target or is reset. Callbacks carry
/// the epoch they were armed with so late ones can be recognised and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionEpoch(pub u64);

impl SessionEpoch {
    /// The following epoch
    #[inline]
    pub fn next(self) -> Self {
        SessionEpoch(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
