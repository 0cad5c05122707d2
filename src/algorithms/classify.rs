use crate::algorithms::binarize::WHITE;
use crate::data::PixelGrid;
use crate::error::CrackError;

/// Minimum share of white pixels above which a binarized grid counts as cracked.
pub const DEFAULT_CRACK_RATIO: f64 = 0.01;

/// Fraction of samples equal to 255.
pub fn white_ratio(grid: &PixelGrid) -> Result<f64, CrackError> {
    let total = grid.len();
    if total == 0 {
        return Err(CrackError::EmptyGrid);
    }
    let white = grid.pixels().filter(|&v| v == WHITE).count();
    Ok(white as f64 / total as f64)
}

/// `true` when more than 1% of the binarized grid is white.
pub fn classify(grid: &PixelGrid) -> Result<bool, CrackError> {
    classify_with(grid, DEFAULT_CRACK_RATIO)
}

/// Strict comparison: a ratio exactly equal to `min_ratio` is not a crack.
pub fn classify_with(grid: &PixelGrid, min_ratio: f64) -> Result<bool, CrackError> {
    Ok(white_ratio(grid)? > min_ratio)
}
