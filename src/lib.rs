//! Ring Registry
//!
//! A circular registry of uniquely numbered stations with O(1) keyed
//! lookup, driven by four neighbor commands:
//!
//! - `BN i j`: build station `j` immediately after station `i`
//! - `BP i j`: build station `j` immediately before station `i`
//! - `CN i`: close the station immediately after station `i`
//! - `CP i`: close the station immediately before station `i`
//!
//! Build commands report the neighbor they displaced; close commands report
//! the station they removed, and are refused without effect once the ring
//! is down to two stations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Script Runner                       │
//! │    header / initial stations / one command per line     │
//! ├─────────────────────────────────────────────────────────┤
//! │                     Ring Registry                       │
//! │  ┌───────────────────────┐     ┌─────────────────────┐  │
//! │  │     Slab<Station>     │     │ HashMap<StationId,  │  │
//! │  │  slot-linked next and │◄───►│ slot>               │  │
//! │  │  prev arena nodes     │     │ O(1) station lookup │  │
//! │  └───────────────────────┘     └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`ring`]: Arena-backed circular registry and station types
//! - [`script`]: Command parsing and script execution
//! - [`error`]: Error types and handling

pub mod error;
pub mod ring;
pub mod script;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};

pub use ring::{
    RegistryStats, RingIter, RingRegistry, Station, StationId,
    MIN_RING_SIZE,
};

pub use script::{
    apply_command, run_script,
    Command, ScriptSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
