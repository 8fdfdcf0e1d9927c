// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: Photo download via `reqwest` (implements [`PhotoFetcher`])
//! - [`file`]: Photo reads from a local directory (implements [`PhotoFetcher`])
//!
//! [`PhotoFetcher`]: crate::application::port::PhotoFetcher

pub mod file;
pub mod http;

// Re-export main types for convenience
pub use file::FilePhotoFetcher;
pub use http::HttpPhotoFetcher;
