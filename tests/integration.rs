// SPDX-License-Identifier: MPL-2.0
use approx::assert_abs_diff_eq;
use geotag_lens::config::{self, Config};
use geotag_lens::correction::{
    apply_corrections, identify_low_precision_markers, stats, CorrectionPipeline, LocationRecord,
    PipelineSettings,
};
use geotag_lens::diagnostics::{analyze_drift, round_trip_test, DiagnosticsSession};
use geotag_lens::domain::geo::{GeoCoordinate, GeohashPrecision};
use geotag_lens::extraction::{self, writer::embed_gps, ExtractionStrategy};
use geotag_lens::geohash;
use geotag_lens::infrastructure::FilePhotoFetcher;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{ExtendedColorType, ImageEncoder};
use std::path::Path;
use tempfile::tempdir;

fn plain_jpeg() -> Vec<u8> {
    let pixels: Vec<u8> = (0..32u32 * 32)
        .flat_map(|i| [(i % 251) as u8, 64, (i / 32) as u8])
        .collect();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 85)
        .write_image(&pixels, 32, 32, ExtendedColorType::Rgb8)
        .expect("fixture JPEG should encode");
    bytes
}

fn write_photo(dir: &Path, name: &str, coordinate: Option<(f64, f64)>) {
    let bytes = match coordinate {
        Some((lat, lon)) => embed_gps(&plain_jpeg(), &GeoCoordinate::new(lat, lon))
            .expect("GPS should embed"),
        None => plain_jpeg(),
    };
    std::fs::write(dir.join(name), bytes).expect("failed to write photo");
}

fn record(id: &str, geohash: &str, images: &[&str]) -> LocationRecord {
    LocationRecord {
        id: id.to_string(),
        geohash: geohash.to_string(),
        images: images.iter().map(|s| s.to_string()).collect(),
        ..LocationRecord::default()
    }
}

#[test]
fn tagged_photo_extracts_back() {
    let tagged = embed_gps(&plain_jpeg(), &GeoCoordinate::new(-33.8688, 151.2092))
        .expect("GPS should embed");
    let coordinate = extraction::extract(&tagged, Some("image/jpeg")).expect("GPS expected");

    assert_abs_diff_eq!(coordinate.latitude(), -33.8688, epsilon = 1e-6);
    assert_abs_diff_eq!(coordinate.longitude(), 151.2092, epsilon = 1e-6);
    assert!(extraction::extract(&plain_jpeg(), Some("image/jpeg")).is_none());
}

#[tokio::test]
async fn distant_photo_is_computed_but_not_applied() {
    let dir = tempdir().expect("failed to create temp dir");
    write_photo(dir.path(), "utrecht.jpg", Some((52.0907, 5.1214)));

    let records = vec![record("munich", "u281z", &["utrecht.jpg"])];
    let settings = PipelineSettings::default();
    let markers = identify_low_precision_markers(&records, settings.precision_threshold);
    assert_eq!(markers.len(), 1);

    let pipeline = CorrectionPipeline::new(FilePhotoFetcher::new(dir.path()), settings);
    let correction = pipeline
        .correct_marker(&markers[0])
        .await
        .expect("photo carries GPS");

    assert_eq!(correction.corrected_geohash(), "u178kdc6");
    assert!(correction.distance_meters() > 600_000.0);
    assert_abs_diff_eq!(correction.confidence(), 0.18, epsilon = 1e-9);
    assert_eq!(correction.strategy(), ExtractionStrategy::Translated);

    let result = apply_corrections(&markers, &[correction], settings.apply_threshold);
    assert!(result.applied.is_empty());
    assert_eq!(result.rejected, vec!["munich"]);
    assert_eq!(result.markers, markers);
}

#[tokio::test]
async fn nearby_photo_upgrades_marker() {
    let dir = tempdir().expect("failed to create temp dir");
    write_photo(dir.path(), "blank.jpg", None);
    write_photo(dir.path(), "dom.jpg", Some((52.0973, 5.1198)));

    let records = vec![
        record("dom", "u178k", &["missing.jpg", "blank.jpg", "file://dom.jpg"]),
        record("precise", "u178kdc6", &["dom.jpg"]),
    ];
    let settings = PipelineSettings::default();
    let markers = identify_low_precision_markers(&records, settings.precision_threshold);
    assert_eq!(markers.len(), 1);

    let pipeline = CorrectionPipeline::new(FilePhotoFetcher::new(dir.path()), settings);
    let corrections = pipeline.batch_correct(&markers).await;
    assert_eq!(corrections.len(), 1);
    assert_eq!(corrections[0].photo_source(), "file://dom.jpg");
    assert!(corrections[0].distance_meters() < 50.0);
    assert_abs_diff_eq!(corrections[0].confidence(), 0.72, epsilon = 1e-9);

    let once = apply_corrections(&markers, &corrections, settings.apply_threshold);
    assert_eq!(once.applied, vec!["dom"]);
    let upgraded = &once.markers[0];
    assert_eq!(upgraded.precision(), 8);
    assert_eq!(upgraded.geohash(), corrections[0].corrected_geohash());
    assert_eq!(
        upgraded.coordinate(),
        geohash::decode(upgraded.geohash()).expect("valid geohash")
    );

    let twice = apply_corrections(&once.markers, &corrections, settings.apply_threshold);
    assert_eq!(twice.markers, once.markers);

    let summary = stats(&corrections);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.high_confidence_count, 1);
    assert_eq!(summary.applicable_count, 1);
    assert_eq!(summary.precision_histogram.get("5→8"), Some(&1));
}

#[tokio::test]
async fn unreachable_photos_yield_no_correction() {
    let dir = tempdir().expect("failed to create temp dir");
    let records = vec![record("lost", "u281z", &["https://gone.invalid/a.jpg", "nope.jpg"])];
    let settings = PipelineSettings::default();
    let markers = identify_low_precision_markers(&records, settings.precision_threshold);

    let pipeline = CorrectionPipeline::new(FilePhotoFetcher::new(dir.path()), settings);
    assert!(pipeline.correct_marker(&markers[0]).await.is_none());
    assert!(pipeline.batch_correct(&markers).await.is_empty());
    assert_eq!(stats(&[]).count, 0);
}

#[tokio::test]
async fn tracked_run_reports_drift() {
    let dir = tempdir().expect("failed to create temp dir");
    write_photo(dir.path(), "dom.jpg", Some((52.0973, 5.1198)));

    let records = vec![record("dom", "u178k", &["dom.jpg"])];
    let settings = PipelineSettings::default();
    let markers = identify_low_precision_markers(&records, settings.precision_threshold);
    let pipeline = CorrectionPipeline::new(FilePhotoFetcher::new(dir.path()), settings);

    let mut session = DiagnosticsSession::new();
    let corrections = pipeline.batch_correct_tracked(&markers, &mut session).await;
    assert_eq!(corrections.len(), 1);
    assert_eq!(session.len(), 3);

    let drift = analyze_drift(&session);
    assert_eq!(drift.steps.len(), 2);
    let total = drift.cumulative.expect("two or more entries");
    assert!(total.haversine_meters < 50.0);

    let export = session.export_json().expect("session should serialize");
    assert!(export.contains("\"recovered\""));
}

#[test]
fn geohash_round_trip_stays_in_cell() {
    let coordinate = GeoCoordinate::new(52.0907, 5.1214);
    for precision in 1..=12 {
        let result = round_trip_test(&coordinate, precision).expect("valid precision");
        assert!(result.within_radius, "precision {precision}");
        let bounds = geohash::bounds(&result.geohash).expect("valid geohash");
        assert!(bounds.contains(&coordinate));
    }
}

#[test]
fn config_file_drives_pipeline_settings() {
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().join("settings.toml");

    let config = Config {
        target_precision: Some(9),
        max_corrections: Some(3),
        ..Config::default()
    };
    config::save_to_path(&config, &path).expect("failed to save config");
    let loaded = config::load_from_path(&path).expect("failed to load config");
    assert_eq!(loaded, config);

    let settings = loaded.pipeline_settings();
    assert_eq!(settings.target_precision, GeohashPrecision::new(9));
    assert_eq!(settings.max_corrections.value(), 3);

    dir.close().expect("failed to close temp dir");
}
