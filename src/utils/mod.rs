//! Utility modules for common functionality
//!
//! Logging and progress reporting shared by the library and the binary.

pub mod logger;
pub(crate) mod progress;
