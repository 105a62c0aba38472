//! Script Module
//!
//! Command parsing and script execution against the ring registry.

pub mod command;
pub mod runner;

pub use command::*;
pub use runner::*;
