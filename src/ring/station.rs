//! Station Types
//!
//! The station number newtype and the arena node carrying the ring links.

use std::fmt;

// =============================================================================
// Station ID
// =============================================================================

/// Unique identifier for a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub u32);

impl StationId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Get the raw station number
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StationId {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl From<StationId> for u32 {
    fn from(station: StationId) -> Self {
        station.0
    }
}

// =============================================================================
// Station Node
// =============================================================================

/// A station stored in the registry arena.
///
/// `next` and `prev` are arena slot indices, not station numbers; a live
/// station always links to live slots. Links are registry-internal and only
/// ever rewritten by the build/close commands.
#[derive(Debug, Clone)]
pub struct Station {
    /// Station number
    pub id: StationId,
    /// Arena slot of the next station in ring order
    pub(crate) next: usize,
    /// Arena slot of the previous station in ring order
    pub(crate) prev: usize,
}

impl Station {
    /// Create a station self-linked at `slot`; the registry rewrites both
    /// links when the station is spliced into the ring.
    pub(crate) fn new(id: StationId, slot: usize) -> Self {
        Self {
            id,
            next: slot,
            prev: slot,
        }
    }
}
