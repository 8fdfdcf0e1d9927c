// SPDX-License-Identifier: MPL-2.0
//! Correction pipeline: photo fetch, extraction, scoring and application.
//!
//! Per marker, candidates move through
//! `Identified → (fetch) → ExtractedOk | ExtractedNone | FetchFailed →
//! ComputedCorrection | Rejected → Applied | Discarded`.
//!
//! Photos are tried strictly one at a time and the first successful
//! extraction ends the search. Markers in a batch are processed in order,
//! never concurrently. Every per-photo and per-marker failure is logged and
//! skipped; a batch always returns.

use std::collections::HashMap;
use std::fmt;
use std::pin::pin;

use futures_util::{future, stream, StreamExt};
use serde::Serialize;

use super::confidence::is_applicable;
use super::identify::PrecisionMarker;
use super::{Correction, PipelineSettings};
use crate::application::port::PhotoFetcher;
use crate::diagnostics::DiagnosticsSession;
use crate::error::{ExtractionFailure, FetchError};
use crate::extraction::{Extracted, GpsExtractor};
use crate::geohash;

// =============================================================================
// States
// =============================================================================

/// Where a candidate marker is in the correction process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateState {
    Identified,
    FetchFailed,
    ExtractedNone,
    ExtractedOk,
    ComputedCorrection,
    Rejected,
    Applied,
    Discarded,
}

impl CandidateState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateState::Identified => "identified",
            CandidateState::FetchFailed => "fetch_failed",
            CandidateState::ExtractedNone => "extracted_none",
            CandidateState::ExtractedOk => "extracted_ok",
            CandidateState::ComputedCorrection => "computed_correction",
            CandidateState::Rejected => "rejected",
            CandidateState::Applied => "applied",
            CandidateState::Discarded => "discarded",
        }
    }

    /// State of a computed correction given the apply threshold.
    #[must_use]
    pub fn scored(confidence: f64, apply_threshold: f64) -> Self {
        if is_applicable(confidence, apply_threshold) {
            CandidateState::ComputedCorrection
        } else {
            CandidateState::Rejected
        }
    }
}

impl fmt::Display for CandidateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of trying one photo reference.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    FetchFailed(FetchError),
    ExtractedNone(ExtractionFailure),
    ExtractedOk(Extracted),
}

impl AttemptOutcome {
    #[must_use]
    pub fn state(&self) -> CandidateState {
        match self {
            AttemptOutcome::FetchFailed(_) => CandidateState::FetchFailed,
            AttemptOutcome::ExtractedNone(_) => CandidateState::ExtractedNone,
            AttemptOutcome::ExtractedOk(_) => CandidateState::ExtractedOk,
        }
    }

    fn into_extracted(self) -> Option<Extracted> {
        match self {
            AttemptOutcome::ExtractedOk(extracted) => Some(extracted),
            _ => None,
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Recovers precise coordinates for markers from their attached photos.
#[derive(Debug, Clone)]
pub struct CorrectionPipeline<F> {
    fetcher: F,
    extractor: GpsExtractor,
    settings: PipelineSettings,
}

impl<F: PhotoFetcher> CorrectionPipeline<F> {
    pub fn new(fetcher: F, settings: PipelineSettings) -> Self {
        Self {
            fetcher,
            extractor: GpsExtractor::new(settings.min_exif_bytes),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches one photo and runs extraction on it.
    pub async fn attempt(&self, photo_ref: &str) -> AttemptOutcome {
        let photo = match self.fetcher.fetch(photo_ref).await {
            Ok(photo) => photo,
            Err(e) => {
                tracing::warn!(photo = photo_ref, error = %e, "fetch failed, trying next photo");
                return AttemptOutcome::FetchFailed(e);
            }
        };

        match self
            .extractor
            .extract_detailed(&photo.bytes, photo.declared_type.as_deref())
        {
            Ok(extracted) => AttemptOutcome::ExtractedOk(extracted),
            Err(failure) => {
                tracing::debug!(photo = photo_ref, reason = %failure, "no GPS in photo");
                AttemptOutcome::ExtractedNone(failure)
            }
        }
    }

    /// Tries the marker's photos in order and scores the first coordinate
    /// found. Returns `None` when no photo yields one.
    pub async fn correct_marker(&self, marker: &PrecisionMarker) -> Option<Correction> {
        tracing::debug!(marker = marker.id(), state = %CandidateState::Identified);

        let attempts = stream::iter(marker.photo_refs())
            .then(|photo_ref| async move { (photo_ref, self.attempt(photo_ref).await) })
            .inspect(|(photo_ref, outcome)| {
                tracing::debug!(marker = marker.id(), photo = %photo_ref, state = %outcome.state());
            })
            .filter_map(|(photo_ref, outcome)| {
                future::ready(outcome.into_extracted().map(|extracted| (photo_ref, extracted)))
            });
        let (photo_ref, extracted) = pin!(attempts).next().await?;

        let correction = match Correction::compute(
            marker,
            extracted.coordinate,
            photo_ref,
            extracted.strategy,
            self.settings.target_precision,
        ) {
            Ok(correction) => correction,
            Err(e) => {
                tracing::warn!(marker = marker.id(), error = %e, "cannot encode recovered coordinate");
                return None;
            }
        };

        tracing::info!(
            marker = marker.id(),
            from = correction.original_geohash(),
            to = correction.corrected_geohash(),
            distance_m = correction.distance_meters(),
            confidence = correction.confidence(),
            state = %CandidateState::scored(correction.confidence(), self.settings.apply_threshold),
            "correction computed"
        );
        Some(correction)
    }

    /// [`correct_marker`](Self::correct_marker), recording the original,
    /// recovered and corrected coordinates in `session`.
    pub async fn correct_marker_tracked(
        &self,
        marker: &PrecisionMarker,
        session: &mut DiagnosticsSession,
    ) -> Option<Correction> {
        session.track("original", marker.coordinate(), marker.id());

        let correction = self.correct_marker(marker).await?;
        session.track(
            "recovered",
            correction.recovered_coordinate(),
            correction.photo_source(),
        );
        if let Ok(corrected) = geohash::decode(correction.corrected_geohash()) {
            session.track("corrected", corrected, correction.corrected_geohash());
        }
        Some(correction)
    }

    /// Markers a batch will process: with photos, coarsest first, capped.
    fn batch_candidates<'m>(&self, markers: &'m [PrecisionMarker]) -> Vec<&'m PrecisionMarker> {
        let mut candidates: Vec<&PrecisionMarker> = markers
            .iter()
            .filter(|marker| !marker.photo_refs().is_empty())
            .collect();
        candidates.sort_by_key(|marker| marker.precision());
        candidates.truncate(self.settings.max_corrections.value());
        candidates
    }

    /// Corrects up to `max_corrections` markers, coarsest first.
    ///
    /// Markers without photos are skipped; failures for one marker never
    /// stop the batch.
    pub async fn batch_correct(&self, markers: &[PrecisionMarker]) -> Vec<Correction> {
        let candidates = self.batch_candidates(markers);
        tracing::info!(candidates = candidates.len(), total = markers.len(), "batch started");

        let corrections: Vec<Correction> = stream::iter(candidates)
            .then(|marker| self.correct_marker(marker))
            .filter_map(future::ready)
            .collect()
            .await;

        tracing::info!(corrections = corrections.len(), "batch finished");
        corrections
    }

    /// [`batch_correct`](Self::batch_correct) with history tracking.
    pub async fn batch_correct_tracked(
        &self,
        markers: &[PrecisionMarker],
        session: &mut DiagnosticsSession,
    ) -> Vec<Correction> {
        let mut corrections = Vec::new();
        for marker in self.batch_candidates(markers) {
            if let Some(correction) = self.correct_marker_tracked(marker, session).await {
                corrections.push(correction);
            }
        }
        corrections
    }
}

// =============================================================================
// Application
// =============================================================================

/// Markers after applying corrections, with the ids that changed and the
/// ids whose correction was not confident enough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedCorrections {
    pub markers: Vec<PrecisionMarker>,
    pub applied: Vec<String>,
    pub rejected: Vec<String>,
}

/// Applies corrections whose confidence exceeds `apply_threshold`.
///
/// A corrected marker takes the corrected geohash and re-derives its
/// coordinate, precision and label from it, so applying the same
/// corrections again yields the same markers. Markers without a matching
/// correction are returned unchanged, in their original order.
#[must_use]
pub fn apply_corrections(
    markers: &[PrecisionMarker],
    corrections: &[Correction],
    apply_threshold: f64,
) -> AppliedCorrections {
    let mut by_marker: HashMap<&str, &Correction> = HashMap::new();
    for correction in corrections {
        by_marker.entry(correction.marker_id()).or_insert(correction);
    }

    let mut applied = Vec::new();
    let mut rejected = Vec::new();

    let markers = markers
        .iter()
        .map(|marker| {
            let Some(correction) = by_marker.get(marker.id()) else {
                return marker.clone();
            };

            if !is_applicable(correction.confidence(), apply_threshold) {
                tracing::debug!(
                    marker = marker.id(),
                    confidence = correction.confidence(),
                    state = %CandidateState::Discarded
                );
                rejected.push(marker.id().to_string());
                return marker.clone();
            }

            match marker.corrected(correction) {
                Ok(updated) => {
                    tracing::info!(
                        marker = marker.id(),
                        geohash = updated.geohash(),
                        state = %CandidateState::Applied
                    );
                    applied.push(marker.id().to_string());
                    updated
                }
                Err(e) => {
                    tracing::warn!(marker = marker.id(), error = %e, "corrected geohash invalid");
                    rejected.push(marker.id().to_string());
                    marker.clone()
                }
            }
        })
        .collect();

    AppliedCorrections {
        markers,
        applied,
        rejected,
    }
}
