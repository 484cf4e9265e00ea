//! Analyzer test support utilities
//!
//! Shared by the analyzer's integration tests: unified logging
//! initialization and builders for archive session documents.

pub mod archive;
pub mod logging;
