//! End-to-end crack classification for one image.
//!
//! Stage order is fixed: decode and gray-normalize, resize into the bounding
//! box, 3x3 median, Otsu on the filtered grid, binarize that same filtered
//! grid, write the result, classify.
use crate::config::{OutputConfig, PipelineConfig};
use crate::data::{load_grid, PixelGrid};
use crate::logging::new_correlation_id;
use crate::pipeline::{
    BinarizeStage, ClassificationResult, ClassifyStage, MedianStage, OtsuStage, PersistStage,
    Pipeline, PipelineBuilder, ResizeStage, StageData, StageTime, Verdict,
};
use crate::Result;
use anyhow::{anyhow, Context};
use std::path::Path;
use std::time::Instant;

/// Full in-memory result of [`CrackPipeline::analyze_grid`].
#[derive(Debug, Clone)]
pub struct GridAnalysis {
    pub filtered: PixelGrid,
    pub binarized: PixelGrid,
    pub threshold: u8,
    pub white_ratio: f64,
    pub has_crack: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CrackPipeline {
    pipeline: PipelineConfig,
    output: OutputConfig,
}

impl CrackPipeline {
    pub fn new(pipeline: PipelineConfig, output: OutputConfig) -> Self {
        Self { pipeline, output }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.pipeline.clone(), config.output.clone())
    }

    /// Stages after decoding for a run on `source`.
    fn build_for(&self, source: &Path) -> Pipeline {
        PipelineBuilder::new("crack-classification")
            .add_stage(
                ResizeStage::new(self.pipeline.max_width, self.pipeline.max_height)
                    .with_filter(self.pipeline.resample_filter),
            )
            .add_stage(MedianStage)
            .add_stage(OtsuStage)
            .add_stage(BinarizeStage)
            .add_stage(
                PersistStage::new(source, self.output.suffix.clone())
                    .avoid_overwrite(self.output.avoid_overwrite),
            )
            .add_stage(ClassifyStage::new(self.pipeline.crack_ratio))
            .build()
    }

    /// Classify the image at `path` and write its binarized version.
    pub fn run(&self, path: &Path) -> Result<ClassificationResult> {
        let correlation_id = new_correlation_id();
        tracing::info!(
            source = %path.display(),
            correlation_id = %correlation_id,
            "Classifying image"
        );

        let load_start = Instant::now();
        let grid = load_grid(path).with_context(|| format!("loading {}", path.display()))?;
        let mut stage_timings = vec![StageTime {
            stage_name: "Load".to_string(),
            duration_ms: load_start.elapsed().as_secs_f64() * 1000.0,
        }];

        let outcome = self.build_for(path).execute(StageData::Grid(grid))?;
        stage_timings.extend(outcome.stage_timings);

        let verdict = expect_verdict(outcome.output)?;
        let output_path = verdict
            .output_path
            .ok_or_else(|| anyhow!("pipeline finished without writing an output"))?;

        tracing::info!(
            source = %path.display(),
            output = %output_path.display(),
            threshold = verdict.threshold,
            white_ratio = verdict.white_ratio,
            has_crack = verdict.has_crack,
            "Classification finished"
        );

        Ok(ClassificationResult {
            source_path: path.to_path_buf(),
            output_path,
            has_crack: verdict.has_crack,
            threshold: verdict.threshold,
            white_ratio: verdict.white_ratio,
            width: verdict.width,
            height: verdict.height,
            stage_timings,
            processed_at: chrono::Utc::now(),
        })
    }

    /// Filter, threshold, binarize and classify a grid without resizing or
    /// writing anything.
    pub fn analyze_grid(&self, grid: &PixelGrid) -> Result<GridAnalysis> {
        let filtered = crate::algorithms::median_filter_3x3(grid);
        let threshold = crate::algorithms::compute_otsu(&filtered);
        let binarized = crate::algorithms::apply_threshold(&filtered, threshold);
        let white_ratio = crate::algorithms::white_ratio(&binarized)?;
        let has_crack = white_ratio > self.pipeline.crack_ratio;
        Ok(GridAnalysis {
            filtered,
            binarized,
            threshold,
            white_ratio,
            has_crack,
        })
    }

    /// Otsu threshold the pipeline would pick for `path`, without writing.
    pub fn threshold_for(&self, path: &Path) -> Result<u8> {
        let grid = load_grid(path).with_context(|| format!("loading {}", path.display()))?;
        let outcome = PipelineBuilder::new("threshold-preview")
            .add_stage(
                ResizeStage::new(self.pipeline.max_width, self.pipeline.max_height)
                    .with_filter(self.pipeline.resample_filter),
            )
            .add_stage(MedianStage)
            .add_stage(OtsuStage)
            .build()
            .execute(StageData::Grid(grid))?;
        match outcome.output {
            StageData::Thresholded { threshold, .. } => Ok(threshold),
            other => Err(anyhow!("expected a threshold, got {}", other.kind())),
        }
    }
}

fn expect_verdict(data: StageData) -> Result<Verdict> {
    match data {
        StageData::Verdict(v) => Ok(*v),
        other => Err(anyhow!("expected a verdict, got {}", other.kind())),
    }
}
