//! Common utilities for the trellis workspace.
//!
//! This crate provides the infrastructure shared by the parsing crates:
//!
//! - [`source`] - Source locations and input modules
//! - [`intern`] - String interning using arena allocation
//! - [`debug`] - Per-module logging controlled via the `DEBUG` environment variable

pub mod debug;
pub mod intern;
pub mod source;

pub use debug::{create_logger, Logger};
pub use intern::StringInterner;
pub use source::{SourceLoc, SourceModule};
