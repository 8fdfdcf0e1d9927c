// SPDX-License-Identifier: MPL-2.0
//! Media domain types.
//!
//! This module contains the photo format classification used to decide
//! whether a file is worth parsing for embedded metadata.

pub mod types;

// Re-export commonly used types
pub use types::PhotoFormat;
