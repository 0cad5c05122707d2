use crate::algorithms::{
    apply_threshold, classify_with, compute_otsu, median_filter_3x3, resize_to_fit, white_ratio,
    ResampleFilter,
};
use crate::data::{binarized_output_path, next_free_path, save_grid};
use crate::error::CrackError;
use crate::pipeline::{PipelineStage, StageData, Verdict};
use std::path::PathBuf;

fn unexpected(stage: &str, input: &StageData) -> CrackError {
    CrackError::UnexpectedStageData {
        stage: stage.to_string(),
        found: input.kind(),
    }
}

/// Scale the grid to fit a bounding box, keeping its aspect ratio.
pub struct ResizeStage {
    max_width: u32,
    max_height: u32,
    filter: ResampleFilter,
}

impl ResizeStage {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            filter: ResampleFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl PipelineStage for ResizeStage {
    type Input = StageData;
    type Output = StageData;

    fn execute(&self, input: StageData) -> Result<StageData, CrackError> {
        match input {
            StageData::Grid(grid) => Ok(StageData::Grid(resize_to_fit(
                &grid,
                self.max_width,
                self.max_height,
                self.filter,
            )?)),
            other => Err(unexpected(self.stage_name(), &other)),
        }
    }

    fn stage_name(&self) -> &str {
        "Resize"
    }
}

pub struct MedianStage;

impl PipelineStage for MedianStage {
    type Input = StageData;
    type Output = StageData;

    fn execute(&self, input: StageData) -> Result<StageData, CrackError> {
        match input {
            StageData::Grid(grid) => Ok(StageData::Grid(median_filter_3x3(&grid))),
            other => Err(unexpected(self.stage_name(), &other)),
        }
    }

    fn stage_name(&self) -> &str {
        "MedianFilter"
    }
}

/// Computes the Otsu threshold and passes the grid through unchanged.
pub struct OtsuStage;

impl PipelineStage for OtsuStage {
    type Input = StageData;
    type Output = StageData;

    fn execute(&self, input: StageData) -> Result<StageData, CrackError> {
        match input {
            StageData::Grid(grid) => {
                let threshold = compute_otsu(&grid);
                Ok(StageData::Thresholded { grid, threshold })
            }
            other => Err(unexpected(self.stage_name(), &other)),
        }
    }

    fn stage_name(&self) -> &str {
        "OtsuThreshold"
    }
}

pub struct BinarizeStage;

impl PipelineStage for BinarizeStage {
    type Input = StageData;
    type Output = StageData;

    fn execute(&self, input: StageData) -> Result<StageData, CrackError> {
        match input {
            StageData::Thresholded { grid, threshold } => Ok(StageData::Binarized {
                grid: apply_threshold(&grid, threshold),
                threshold,
            }),
            other => Err(unexpected(self.stage_name(), &other)),
        }
    }

    fn stage_name(&self) -> &str {
        "Binarize"
    }
}

/// Writes the binarized grid next to the source image.
pub struct PersistStage {
    source: PathBuf,
    suffix: String,
    avoid_overwrite: bool,
}

impl PersistStage {
    pub fn new(source: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            suffix: suffix.into(),
            avoid_overwrite: false,
        }
    }

    pub fn avoid_overwrite(mut self, enabled: bool) -> Self {
        self.avoid_overwrite = enabled;
        self
    }
}

impl PipelineStage for PersistStage {
    type Input = StageData;
    type Output = StageData;

    fn execute(&self, input: StageData) -> Result<StageData, CrackError> {
        match input {
            StageData::Binarized { grid, threshold } => {
                let mut path = binarized_output_path(&self.source, threshold, &self.suffix);
                if self.avoid_overwrite {
                    path = next_free_path(&path);
                }
                save_grid(&grid, &path)?;
                tracing::debug!(path = %path.display(), "Binarized grid written");
                Ok(StageData::Persisted {
                    grid,
                    threshold,
                    path,
                })
            }
            other => Err(unexpected(self.stage_name(), &other)),
        }
    }

    fn stage_name(&self) -> &str {
        "Persist"
    }
}

/// Turns a binarized grid into a crack verdict.
pub struct ClassifyStage {
    min_ratio: f64,
}

impl ClassifyStage {
    pub fn new(min_ratio: f64) -> Self {
        Self { min_ratio }
    }
}

impl PipelineStage for ClassifyStage {
    type Input = StageData;
    type Output = StageData;

    fn execute(&self, input: StageData) -> Result<StageData, CrackError> {
        let (grid, threshold, output_path) = match input {
            StageData::Binarized { grid, threshold } => (grid, threshold, None),
            StageData::Persisted {
                grid,
                threshold,
                path,
            } => (grid, threshold, Some(path)),
            other => return Err(unexpected(self.stage_name(), &other)),
        };

        let ratio = white_ratio(&grid)?;
        let has_crack = classify_with(&grid, self.min_ratio)?;
        Ok(StageData::Verdict(Box::new(Verdict {
            has_crack,
            threshold,
            white_ratio: ratio,
            width: grid.width(),
            height: grid.height(),
            output_path,
        })))
    }

    fn stage_name(&self) -> &str {
        "Classify"
    }
}
