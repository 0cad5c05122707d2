pub mod algorithms;
pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod visualization;

pub use algorithms::*;
pub use analysis::*;
pub use data::*;
pub use error::CrackError;
pub use pipeline::{ClassificationResult, ClassificationWorker, CrackPipeline};

pub type Result<T> = anyhow::Result<T>;
