//! Ring Module
//!
//! The circular station registry: a slab-backed doubly-linked ring with a
//! station-number index for O(1) command resolution.

pub mod registry;
pub mod station;

pub use registry::*;
pub use station::*;
