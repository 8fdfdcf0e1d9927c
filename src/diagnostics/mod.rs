// SPDX-License-Identifier: MPL-2.0
//! Coordinate diagnostics: history tracking, drift analysis and codec
//! round-trip checks.
//!
//! Diagnostics are purely observational. A [`DiagnosticsSession`] is owned
//! by the caller and passed explicitly to whatever should record into it;
//! nothing here influences pipeline outcomes.
//!
//! # Architecture
//!
//! - [`DiagnosticsSession`]: Append-only log of [`HistoryEntry`] values
//! - [`analyze_drift`]: Per-step and cumulative movement between entries
//! - [`round_trip_test`]: Encode/decode error against the accuracy radius
//!
//! # Example
//!
//! ```
//! use geotag_lens::diagnostics::{analyze_drift, DiagnosticsSession};
//! use geotag_lens::domain::geo::GeoCoordinate;
//!
//! let mut session = DiagnosticsSession::new();
//! session.track("original", GeoCoordinate::new(52.0972, 5.1196), "u178k");
//! session.track("recovered", GeoCoordinate::new(52.0973, 5.1198), "photo.jpg");
//!
//! let drift = analyze_drift(&session);
//! assert_eq!(drift.steps.len(), 1);
//! assert!(drift.cumulative.unwrap().haversine_meters < 50.0);
//! ```

mod drift;
mod round_trip;
mod session;

pub use drift::{analyze_drift, DriftReport, DriftStep};
pub use round_trip::{round_trip_test, RoundTripResult};
pub use session::{DiagnosticsSession, HistoryEntry, SessionExport};
