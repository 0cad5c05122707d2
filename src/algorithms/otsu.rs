//! Otsu's global threshold.
//!
//! The threshold `t` splits intensities into background (`<= t`) and
//! foreground (`> t`); the chosen `t` maximizes the between-class variance
//! `wB * wF * (mB - mF)^2` computed from the grid histogram.
use crate::data::PixelGrid;

/// 256-bin intensity histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub counts: [u64; 256],
    pub total: u64,
}

impl Histogram {
    pub fn from_grid(grid: &PixelGrid) -> Self {
        let mut counts = [0u64; 256];
        for v in grid.pixels() {
            counts[v as usize] += 1;
        }
        Self {
            counts,
            total: grid.len() as u64,
        }
    }

    /// Sum of `intensity * count` over all bins.
    pub fn weighted_sum(&self) -> f64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| i as f64 * c as f64)
            .sum()
    }
}

/// Between-class variance for the split `<= t` / `> t`, or `None` when one
/// side is empty.
pub fn between_class_variance(hist: &Histogram, t: u8) -> Option<f64> {
    let t = t as usize;
    let weight_bg: u64 = hist.counts[..=t].iter().sum();
    let weight_fg = hist.total - weight_bg;
    if weight_bg == 0 || weight_fg == 0 {
        return None;
    }
    let sum_bg: f64 = hist.counts[..=t]
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();
    let mean_bg = sum_bg / weight_bg as f64;
    let mean_fg = (hist.weighted_sum() - sum_bg) / weight_fg as f64;
    Some(weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg).powi(2))
}

/// Otsu threshold of `grid`.
///
/// Ties keep the lowest `t`. A grid with a single intensity (or no pixels)
/// never yields a positive variance and returns 0.
pub fn compute_otsu(grid: &PixelGrid) -> u8 {
    otsu_from_histogram(&Histogram::from_grid(grid))
}

pub fn otsu_from_histogram(hist: &Histogram) -> u8 {
    let sum_total = hist.weighted_sum();

    let mut sum_bg = 0.0f64;
    let mut weight_bg = 0u64;
    let mut max_variance = 0.0f64;
    let mut threshold = 0u8;

    for t in 0..256usize {
        weight_bg += hist.counts[t];
        if weight_bg == 0 {
            continue;
        }
        let weight_fg = hist.total - weight_bg;
        if weight_fg == 0 {
            break;
        }

        sum_bg += t as f64 * hist.counts[t] as f64;
        let mean_bg = sum_bg / weight_bg as f64;
        let mean_fg = (sum_total - sum_bg) / weight_fg as f64;
        let variance = weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg).powi(2);

        if variance > max_variance {
            max_variance = variance;
            threshold = t as u8;
        }
    }

    tracing::trace!(threshold, max_variance, "Otsu threshold selected");
    threshold
}
