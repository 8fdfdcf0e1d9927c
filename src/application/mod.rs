// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports between the pipeline and the outside world.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The correction pipeline is generic over these ports, so tests can
//!   substitute in-memory adapters
//!
//! # Example
//!
//! ```ignore
//! use geotag_lens::application::port::PhotoFetcher;
//! use geotag_lens::infrastructure::http::HttpPhotoFetcher;
//!
//! // Infrastructure implements the port trait
//! let fetcher = HttpPhotoFetcher::new(Duration::from_secs(15))?;
//! let photo = fetcher.fetch("https://example.com/p.jpg").await?;
//! ```

pub mod port;
