use crack_detect::config::{Config, OutputConfig, PipelineConfig};
use crack_detect::{load_grid, BatchRunner, CrackError, CrackPipeline};
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Dark 640x480 surface with a bright horizontal band rows 200..220.
fn write_band_image(dir: &Path, name: &str) -> PathBuf {
    let image = GrayImage::from_fn(640, 480, |_, y| {
        if (200..220).contains(&y) {
            Luma([220])
        } else {
            Luma([10])
        }
    });
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

fn write_uniform_image(dir: &Path, name: &str, width: u32, height: u32, value: u8) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_pixel(width, height, Luma([value]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn test_band_image_is_cracked() {
    let dir = TempDir::new().unwrap();
    let source = write_band_image(dir.path(), "wall.png");

    let result = CrackPipeline::default().run(&source).unwrap();

    assert_eq!(result.threshold, 10);
    assert!(result.has_crack);
    assert!(result.white_ratio > 0.04 && result.white_ratio < 0.05);
    assert_eq!((result.width, result.height), (640, 480));
    assert_eq!(result.output_path, dir.path().join("wall_binarizada10.png"));

    let written = load_grid(&result.output_path).unwrap();
    assert_eq!((written.width(), written.height()), (640, 480));
    assert!(written.pixels().all(|v| v == 0 || v == 255));
    assert_eq!(written[(210, 320)], 255);
    assert_eq!(written[(100, 320)], 0);
}

#[test]
fn test_stage_timings_cover_every_stage() {
    let dir = TempDir::new().unwrap();
    let source = write_band_image(dir.path(), "timed.png");

    let result = CrackPipeline::default().run(&source).unwrap();
    let names: Vec<&str> = result
        .stage_timings
        .iter()
        .map(|t| t.stage_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Load", "Resize", "MedianFilter", "OtsuThreshold", "Binarize", "Persist", "Classify"]
    );
    assert!(result.total_duration_ms() >= 0.0);
}

#[test]
fn test_black_image_is_clean() {
    let dir = TempDir::new().unwrap();
    let source = write_uniform_image(dir.path(), "black.png", 64, 48, 0);

    let result = CrackPipeline::default().run(&source).unwrap();

    assert!(!result.has_crack);
    assert_eq!(result.threshold, 0);
    assert_eq!(result.white_ratio, 0.0);
    // upscaled into the bounding box
    assert_eq!((result.width, result.height), (640, 480));
    assert!(dir.path().join("black_binarizada0.png").exists());
}

#[test]
fn test_color_input_is_gray_normalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("color.png");
    RgbImage::from_pixel(640, 480, Rgb([0, 0, 0])).save(&path).unwrap();

    let result = CrackPipeline::default().run(&path).unwrap();
    assert!(!result.has_crack);
}

#[test]
fn test_rerun_overwrites_by_default() {
    let dir = TempDir::new().unwrap();
    let source = write_band_image(dir.path(), "again.png");
    let pipeline = CrackPipeline::default();

    let first = pipeline.run(&source).unwrap();
    let second = pipeline.run(&source).unwrap();
    assert_eq!(first.output_path, second.output_path);
}

#[test]
fn test_avoid_overwrite_numbers_outputs() {
    let dir = TempDir::new().unwrap();
    let source = write_band_image(dir.path(), "keep.png");
    let pipeline = CrackPipeline::new(
        PipelineConfig::default(),
        OutputConfig {
            avoid_overwrite: true,
            ..OutputConfig::default()
        },
    );

    let first = pipeline.run(&source).unwrap();
    let second = pipeline.run(&source).unwrap();
    assert_eq!(first.output_path, dir.path().join("keep_binarizada10.png"));
    assert_eq!(second.output_path, dir.path().join("keep_binarizada10_1.png"));
}

#[test]
fn test_custom_suffix_and_ratio() {
    let dir = TempDir::new().unwrap();
    let source = write_band_image(dir.path(), "strict.png");
    let mut config = Config::default();
    config.output.suffix = "_bin".to_string();
    config.pipeline.crack_ratio = 0.5;

    let result = CrackPipeline::from_config(&config).run(&source).unwrap();
    assert!(!result.has_crack);
    assert_eq!(result.output_path, dir.path().join("strict_bin10.png"));
}

#[test]
fn test_threshold_preview_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = write_band_image(dir.path(), "preview.png");

    let threshold = CrackPipeline::default().threshold_for(&source).unwrap();
    assert_eq!(threshold, 10);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_file_reports_image_error() {
    let dir = TempDir::new().unwrap();
    let err = CrackPipeline::default()
        .run(&dir.path().join("absent.png"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CrackError>(),
        Some(CrackError::Image { .. })
    ));
}

#[test]
fn test_single_pixel_image_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = write_uniform_image(dir.path(), "dot.png", 1, 1, 200);

    let err = CrackPipeline::default().run(&source).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CrackError>(),
        Some(CrackError::InvalidDimensions { .. })
    ));
    assert!(format!("{err:#}").contains("Resize"));
}

#[test]
fn test_batch_reports_failures_and_skips_outputs() {
    let dir = TempDir::new().unwrap();
    write_band_image(dir.path(), "a.png");
    write_uniform_image(dir.path(), "b.png", 64, 48, 0);
    std::fs::write(dir.path().join("c.png"), b"not an image").unwrap();

    let runner = BatchRunner::from_config(&Config::default());
    let report = runner.run(dir.path()).unwrap();

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.cracked, 1);
    assert_eq!(report.summary.clean, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.mean_threshold, Some(5.0));
    assert!(report.entries[2].error.is_some());

    // outputs from the first run are not picked up again
    let rerun = runner.run(dir.path()).unwrap();
    assert_eq!(rerun.summary.total, 3);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"cracked\": 1"));
}
