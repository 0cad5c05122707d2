//! The image stages of the classifier: proportional resize, 3x3 median,
//! Otsu threshold, binarization and the white-ratio verdict.
pub mod binarize;
pub mod classify;
pub mod median;
pub mod otsu;
pub mod resize;

pub use binarize::apply_threshold;
pub use classify::{classify, classify_with, white_ratio, DEFAULT_CRACK_RATIO};
pub use median::median_filter_3x3;
pub use otsu::{between_class_variance, compute_otsu, Histogram};
pub use resize::{fit_dimensions, resize_to_fit, ResampleFilter};
