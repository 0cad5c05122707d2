use crate::data::PixelGrid;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Data handed from one stage to the next.
#[derive(Debug, Clone)]
pub enum StageData {
    /// A gray grid (decoded, resized or filtered).
    Grid(PixelGrid),
    /// The filtered grid together with the threshold computed from it.
    Thresholded { grid: PixelGrid, threshold: u8 },
    /// The two-level grid and the threshold that produced it.
    Binarized { grid: PixelGrid, threshold: u8 },
    /// A binarized grid that has been written to `path`.
    Persisted {
        grid: PixelGrid,
        threshold: u8,
        path: PathBuf,
    },
    /// Final verdict.
    Verdict(Box<Verdict>),
}

impl StageData {
    pub fn kind(&self) -> &'static str {
        match self {
            StageData::Grid(_) => "Grid",
            StageData::Thresholded { .. } => "Thresholded",
            StageData::Binarized { .. } => "Binarized",
            StageData::Persisted { .. } => "Persisted",
            StageData::Verdict(_) => "Verdict",
        }
    }

    /// Dimensions of the carried grid, if any.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match self {
            StageData::Grid(grid)
            | StageData::Thresholded { grid, .. }
            | StageData::Binarized { grid, .. }
            | StageData::Persisted { grid, .. } => Some((grid.width(), grid.height())),
            StageData::Verdict(v) => Some((v.width, v.height)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StageData::Grid(g) => format!("Grid({}x{})", g.width(), g.height()),
            StageData::Thresholded { grid, threshold } => {
                format!("Thresholded({}x{}, t={threshold})", grid.width(), grid.height())
            }
            StageData::Binarized { grid, threshold } => {
                format!("Binarized({}x{}, t={threshold})", grid.width(), grid.height())
            }
            StageData::Persisted { path, .. } => format!("Persisted({})", path.display()),
            StageData::Verdict(v) => format!(
                "Verdict(has_crack: {}, ratio: {:.4})",
                v.has_crack, v.white_ratio
            ),
        }
    }
}

/// Outcome of the classification stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub has_crack: bool,
    pub threshold: u8,
    pub white_ratio: f64,
    pub width: usize,
    pub height: usize,
    /// Where the binarized grid was written, when a persist stage ran.
    pub output_path: Option<PathBuf>,
}

/// Result of one full classification run on an image file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub has_crack: bool,
    pub threshold: u8,
    pub white_ratio: f64,
    pub width: usize,
    pub height: usize,
    pub stage_timings: Vec<StageTime>,
    pub processed_at: chrono::DateTime<chrono::Utc>,
}

impl ClassificationResult {
    pub fn total_duration_ms(&self) -> f64 {
        self.stage_timings.iter().map(|t| t.duration_ms).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTime {
    pub stage_name: String,
    pub duration_ms: f64,
}

/// Final data of a pipeline execution with the time spent per stage.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub output: StageData,
    pub stage_timings: Vec<StageTime>,
}
