// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//!
//! # Available Ports
//!
//! - [`photo`]: Retrieving photo bytes from a reference (URL or path)
//!
//! # Design Notes
//!
//! - Traits use domain and crate error types only (no `reqwest` types)
//! - Futures returned by ports are `Send` so pipelines can run on a
//!   multi-threaded runtime
//! - Timeouts and retries belong to adapters, never to callers

pub mod photo;

// Re-export main types for convenience
pub use photo::{FetchedPhoto, PhotoFetcher};
