//! Classify every image in a directory.
//!
//! Images are classified independently on rayon's pool (or a dedicated pool
//! when `batch.threads` is set). A failing image is recorded in the report and
//! does not stop the others.
use crate::config::BatchConfig;
use crate::data::is_binarized_output;
use crate::logging::clear_correlation_id;
use crate::pipeline::{ClassificationResult, CrackPipeline};
use crate::Result;
use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Option<ClassificationResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub cracked: usize,
    pub clean: usize,
    pub failed: usize,
    /// Mean Otsu threshold over the successful images
    pub mean_threshold: Option<f64>,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let results: Vec<&ClassificationResult> =
            entries.iter().filter_map(|e| e.result.as_ref()).collect();
        let cracked = results.iter().filter(|r| r.has_crack).count();
        let mean_threshold = if results.is_empty() {
            None
        } else {
            let sum: f64 = results.iter().map(|r| f64::from(r.threshold)).sum();
            Some(sum / results.len() as f64)
        };

        Self {
            total: entries.len(),
            cracked,
            clean: results.len() - cracked,
            failed: entries.len() - results.len(),
            mean_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub entries: Vec<BatchEntry>,
    pub summary: BatchSummary,
    pub elapsed_ms: f64,
}

impl BatchReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("writing batch report {}", path.display()))
    }
}

pub struct BatchRunner {
    pipeline: CrackPipeline,
    config: BatchConfig,
    suffix: String,
}

impl BatchRunner {
    pub fn new(pipeline: CrackPipeline, config: BatchConfig, suffix: impl Into<String>) -> Self {
        Self {
            pipeline,
            config,
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            CrackPipeline::from_config(config),
            config.batch.clone(),
            config.output.suffix.clone(),
        )
    }

    /// Classify every supported image under `dir`.
    pub fn run(&self, dir: &Path) -> Result<BatchReport> {
        let images = collect_images(dir, &self.config, &self.suffix)?;
        tracing::info!(
            directory = %dir.display(),
            images = images.len(),
            threads = self.config.threads,
            "Starting batch classification"
        );

        let start = Instant::now();
        let entries = if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .context("building batch thread pool")?;
            pool.install(|| self.classify_all(&images))
        } else {
            self.classify_all(&images)
        };

        let summary = BatchSummary::from_entries(&entries);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            total = summary.total,
            cracked = summary.cracked,
            clean = summary.clean,
            failed = summary.failed,
            elapsed_ms,
            "Batch classification finished"
        );

        Ok(BatchReport {
            directory: dir.to_path_buf(),
            entries,
            summary,
            elapsed_ms,
        })
    }

    fn classify_all(&self, images: &[PathBuf]) -> Vec<BatchEntry> {
        images
            .par_iter()
            .map(|path| {
                let outcome = self.pipeline.run(path);
                clear_correlation_id();
                match outcome {
                    Ok(result) => BatchEntry {
                        path: path.clone(),
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => {
                        tracing::error!(source = %path.display(), error = %e, "Image failed");
                        BatchEntry {
                            path: path.clone(),
                            result: None,
                            error: Some(format!("{e:#}")),
                        }
                    }
                }
            })
            .collect()
    }
}

/// Supported images under `dir`, sorted, excluding earlier binarized outputs.
pub fn collect_images(dir: &Path, config: &BatchConfig, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    walk(dir, config, suffix, &mut images)?;
    images.sort();
    Ok(images)
}

fn walk(dir: &Path, config: &BatchConfig, suffix: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if config.recursive {
                walk(&path, config, suffix, out)?;
            }
            continue;
        }
        if has_supported_extension(&path, &config.extensions)
            && !is_binarized_output(&path, suffix)
        {
            out.push(path);
        }
    }
    Ok(())
}

fn has_supported_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
