// SPDX-License-Identifier: MPL-2.0
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use geotag_lens::application::port::PhotoFetcher;
use geotag_lens::config::{self, Config};
use geotag_lens::correction::{
    apply_corrections, identify_low_precision_markers, CorrectionPipeline, CorrectionStats,
    LocationRecord, PipelineSettings, PrecisionMarker,
};
use geotag_lens::domain::geo::GeoCoordinate;
use geotag_lens::error::{Error, Result};
use geotag_lens::extraction::{self, writer};
use geotag_lens::geohash;
use geotag_lens::infrastructure::{FilePhotoFetcher, HttpPhotoFetcher};
use geotag_lens::validation;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
geotag-lens: recover precise locations from photo GPS metadata

USAGE:
  geotag-lens extract <photo>
  geotag-lens validate <lat> <lon>
  geotag-lens encode <lat> <lon> [--precision N]
  geotag-lens decode <geohash>
  geotag-lens tag <in.jpg> <out.jpg> <lat> <lon>
  geotag-lens correct <records.json> [--apply] [--max N] [--target N] [--root DIR] [--config FILE]

Logging is controlled by RUST_LOG (default: info) and goes to stderr.
";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn arg_error(err: pico_args::Error) -> Error {
    Error::Config(err.to_string())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(mut args: pico_args::Arguments) -> Result<()> {
    let command = args.subcommand().map_err(arg_error)?;
    match command.as_deref() {
        Some("extract") => {
            let photo: PathBuf = args.free_from_str().map_err(arg_error)?;
            extract(&photo)
        }
        Some("validate") => {
            let coordinate = coordinate_args(&mut args)?;
            print_json(&json!({
                "validation": validation::validate(&coordinate),
                "suggestions": validation::suggest_corrections(&coordinate),
                "reasonableness": validation::classify_reasonableness(&coordinate),
            }))
        }
        Some("encode") => {
            let precision: u8 = args
                .opt_value_from_str("--precision")
                .map_err(arg_error)?
                .unwrap_or(config::DEFAULT_TARGET_PRECISION);
            let coordinate = coordinate_args(&mut args)?;
            let hash = geohash::encode(&coordinate, precision)?;
            print_json(&json!({
                "geohash": hash,
                "accuracy": geohash::accuracy_label(precision),
            }))
        }
        Some("decode") => {
            let hash: String = args.free_from_str().map_err(arg_error)?;
            let bounds = geohash::bounds(&hash)?;
            let precision = geohash::hash_precision(&hash)?;
            print_json(&json!({
                "coordinate": bounds.center(),
                "bounds": bounds,
                "accuracy": geohash::accuracy_label(precision),
            }))
        }
        Some("tag") => {
            let input: PathBuf = args.free_from_str().map_err(arg_error)?;
            let output: PathBuf = args.free_from_str().map_err(arg_error)?;
            let coordinate = coordinate_args(&mut args)?;
            let tagged = writer::embed_gps(&std::fs::read(&input)?, &coordinate)?;
            std::fs::write(&output, tagged)?;
            tracing::info!(output = %output.display(), coordinate = %coordinate.format(), "photo tagged");
            Ok(())
        }
        Some("correct") => {
            let apply = args.contains("--apply");
            let max: Option<usize> = args.opt_value_from_str("--max").map_err(arg_error)?;
            let target: Option<u8> = args.opt_value_from_str("--target").map_err(arg_error)?;
            let root: Option<PathBuf> = args.opt_value_from_str("--root").map_err(arg_error)?;
            let config_path: Option<PathBuf> =
                args.opt_value_from_str("--config").map_err(arg_error)?;
            let records_path: PathBuf = args.free_from_str().map_err(arg_error)?;

            let mut config = match config_path {
                Some(path) => config::load_from_path(&path)?,
                None => config::load().unwrap_or_default(),
            };
            config.max_corrections = max.or(config.max_corrections);
            config.target_precision = target.or(config.target_precision);

            correct(&records_path, &config, root.as_deref(), apply).await
        }
        Some(other) => Err(Error::Config(format!("Unknown command: {other}"))),
        None => {
            print!("{HELP}");
            Ok(())
        }
    }
}

fn coordinate_args(args: &mut pico_args::Arguments) -> Result<GeoCoordinate> {
    let latitude: f64 = args.free_from_str().map_err(arg_error)?;
    let longitude: f64 = args.free_from_str().map_err(arg_error)?;
    Ok(GeoCoordinate::new(latitude, longitude))
}

fn extract(photo: &Path) -> Result<()> {
    let bytes = std::fs::read(photo)?;
    let declared = photo.to_string_lossy();
    match extraction::extract_detailed(&bytes, Some(declared.as_ref())) {
        Ok(extracted) => print_json(&extracted),
        Err(failure) => print_json(&json!({ "coordinate": null, "reason": failure.to_string() })),
    }
}

async fn correct(
    records_path: &Path,
    config: &Config,
    root: Option<&Path>,
    apply: bool,
) -> Result<()> {
    let records: Vec<LocationRecord> =
        serde_json::from_str(&std::fs::read_to_string(records_path)?)?;
    let settings = config.pipeline_settings();
    let markers = identify_low_precision_markers(&records, settings.precision_threshold);
    tracing::info!(records = records.len(), markers = markers.len(), "low-precision markers identified");

    let report = match root {
        Some(root) => run_pipeline(FilePhotoFetcher::new(root), settings, &markers, apply).await,
        None => {
            let fetcher = HttpPhotoFetcher::new(config.fetch_timeout())?;
            run_pipeline(fetcher, settings, &markers, apply).await
        }
    };
    print_json(&report)
}

async fn run_pipeline<F: PhotoFetcher>(
    fetcher: F,
    settings: PipelineSettings,
    markers: &[PrecisionMarker],
    apply: bool,
) -> serde_json::Value {
    let pipeline = CorrectionPipeline::new(fetcher, settings);
    let corrections = pipeline.batch_correct(markers).await;
    let stats = CorrectionStats::from_corrections(&corrections, settings.apply_threshold);
    let applied =
        apply.then(|| apply_corrections(markers, &corrections, settings.apply_threshold));

    json!({
        "corrections": corrections,
        "stats": stats,
        "applied": applied,
    })
}
