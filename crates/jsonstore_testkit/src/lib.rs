//! # jsonstore testkit
//!
//! Test utilities for jsonstore.
//!
//! This crate provides:
//! - Scratch directories and backing paths for every text format
//! - Sample file contents, well-formed and broken
//! - Property-based generators for documents and edit sequences
//! - Test logging setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jsonstore_testkit::prelude::*;
//!
//! #[test]
//! fn commits_survive_reload() {
//!     for ext in TEXT_EXTENSIONS {
//!         let dir = ScratchDir::new();
//!         let path = dir.file(ext);
//!         // ... load, edit, commit, reload
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
