//! # Red Tape Common
//!
//! Shared types, constants, and errors used by the form shell.
//!
//! ## Modules
//! - `types` - Wire-level data (ColorValue, Stage, Choice, client cues, views)
//! - `error` - Common error types
//! - `constants` - Delays, defaults, and fixed copy

pub mod constants;
pub mod error;
pub mod types;

pub use error::RedTapeError;
pub use types::*;
