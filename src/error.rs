//! Typed errors for the grid model, the image stages and the worker.
//!
//! Library functions return [`CrackError`]; the orchestration layers lift it
//! into `anyhow::Error` with extra context.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CrackError {
    /// A row of the input did not match the width of the first row, or the
    /// flat buffer length disagrees with `width * height`.
    #[error("malformed grid: {0}")]
    Shape(String),

    /// An intensity outside [0, 255] was supplied to a checked constructor.
    #[error("intensity {value} at ({row}, {col}) is outside [0, 255]")]
    IntensityOutOfRange { row: usize, col: usize, value: i32 },

    /// Source or target dimensions that cannot be scaled.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    /// Classification needs at least one pixel to compute a ratio.
    #[error("cannot classify an empty grid")]
    EmptyGrid,

    /// The decoded image has a color layout that cannot be reduced to 8-bit gray.
    #[error("unsupported color mode {0}")]
    UnsupportedColor(String),

    #[error("image codec error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A pipeline stage received a kind of data it does not handle.
    #[error("stage {stage} cannot consume {found}")]
    UnexpectedStageData { stage: String, found: &'static str },

    /// The worker already has a run in flight.
    #[error("a classification is already running on this worker")]
    WorkerBusy,

    /// The worker was used outside a tokio runtime.
    #[error("classification worker requires a running tokio runtime")]
    NoRuntime,
}

impl CrackError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        CrackError::Shape(message.into())
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        CrackError::Image {
            path: path.into(),
            source,
        }
    }
}
