// SPDX-License-Identifier: MPL-2.0
//! Caller-owned coordinate history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::drift::{analyze_drift, DriftReport};
use crate::domain::geo::GeoCoordinate;
use crate::error::Result;

/// A coordinate observed at one stage of processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Processing stage, e.g. `original`, `recovered`, `corrected`.
    pub stage: String,
    pub coordinate: GeoCoordinate,
    pub timestamp: DateTime<Utc>,
    /// Where the coordinate came from (marker id, photo reference, geohash).
    pub source: String,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(stage: impl Into<String>, coordinate: GeoCoordinate, source: impl Into<String>) -> Self {
        Self::at(stage, coordinate, source, Utc::now())
    }

    /// Creates an entry with an explicit timestamp.
    #[must_use]
    pub fn at(
        stage: impl Into<String>,
        coordinate: GeoCoordinate,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            stage: stage.into(),
            coordinate,
            timestamp,
            source: source.into(),
        }
    }
}

/// Append-only history of coordinates, in insertion order.
///
/// Entries are only removed by an explicit [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSession {
    entries: Vec<HistoryEntry>,
}

impl DiagnosticsSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `coordinate` for `stage`, stamped with the current time.
    pub fn track(&mut self, stage: impl Into<String>, coordinate: GeoCoordinate, source: impl Into<String>) {
        self.push(HistoryEntry::new(stage, coordinate, source));
    }

    /// Appends a prepared entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        tracing::trace!(stage = %entry.stage, source = %entry.source, "history entry");
        self.entries.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries recorded for `stage`.
    pub fn stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a HistoryEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.stage == stage)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes the history and its drift analysis as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Json`] if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        let export = SessionExport {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            entry_count: self.entries.len(),
            entries: self.entries.clone(),
            drift: analyze_drift(self),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

/// JSON document produced by [`DiagnosticsSession::export_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// When the export was generated (RFC 3339)
    pub generated_at: String,
    /// Crate version that produced the export
    pub version: String,
    pub entry_count: usize,
    pub entries: Vec<HistoryEntry>,
    pub drift: DriftReport,
}
