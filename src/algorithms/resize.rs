use crate::data::{grid_to_gray_image, gray_image_to_grid, PixelGrid};
use crate::error::CrackError;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

/// Resampling kernels exposed through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Largest size with the source aspect ratio that fits `max_width × max_height`.
///
/// A single scale `min(max_w / w, max_h / h)` is applied to both axes and the
/// products are floored. Scales above 1 are not capped, so small sources are
/// enlarged to the bounding box.
pub fn fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> Result<(u32, u32), CrackError> {
    if width == 0 || height == 0 {
        return Err(CrackError::InvalidDimensions {
            width,
            height,
            reason: "source has a zero dimension",
        });
    }
    if width == 1 && height == 1 {
        return Err(CrackError::InvalidDimensions {
            width,
            height,
            reason: "single-pixel source",
        });
    }
    if max_width == 0 || max_height == 0 {
        return Err(CrackError::InvalidDimensions {
            width: max_width,
            height: max_height,
            reason: "bounding box has a zero dimension",
        });
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = (width as f64 * scale).floor() as u32;
    let new_height = (height as f64 * scale).floor() as u32;

    if new_width == 0 || new_height == 0 {
        return Err(CrackError::InvalidDimensions {
            width: new_width,
            height: new_height,
            reason: "aspect ratio collapses a side to zero",
        });
    }
    Ok((new_width.min(max_width), new_height.min(max_height)))
}

/// Resample `grid` to the size chosen by [`fit_dimensions`].
pub fn resize_to_fit(
    grid: &PixelGrid,
    max_width: u32,
    max_height: u32,
    filter: ResampleFilter,
) -> Result<PixelGrid, CrackError> {
    let (width, height) = fit_dimensions(
        grid.width() as u32,
        grid.height() as u32,
        max_width,
        max_height,
    )?;
    if width as usize == grid.width() && height as usize == grid.height() {
        return Ok(grid.clone());
    }

    let source = grid_to_gray_image(grid)?;
    let resized = imageops::resize(&source, width, height, filter.into());
    gray_image_to_grid(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downscale_keeps_aspect() {
        assert_eq!(fit_dimensions(1280, 960, 640, 480).unwrap(), (640, 480));
        assert_eq!(fit_dimensions(2000, 1000, 640, 480).unwrap(), (640, 320));
        assert_eq!(fit_dimensions(1000, 2000, 640, 480).unwrap(), (240, 480));
    }

    #[test]
    fn test_small_images_are_upscaled() {
        assert_eq!(fit_dimensions(320, 240, 640, 480).unwrap(), (640, 480));
        assert_eq!(fit_dimensions(10, 10, 640, 480).unwrap(), (480, 480));
    }

    #[test]
    fn test_degenerate_sources_are_rejected() {
        for (w, h) in [(0, 10), (10, 0), (0, 0), (1, 1)] {
            let err = fit_dimensions(w, h, 640, 480).unwrap_err();
            assert!(matches!(err, CrackError::InvalidDimensions { .. }), "{w}x{h}");
        }
        assert!(fit_dimensions(10, 10, 0, 480).is_err());
        // 100000 wide by 1 high collapses the height to zero
        assert!(fit_dimensions(100_000, 1, 640, 480).is_err());
    }

    #[test]
    fn test_resize_produces_target_size() {
        let grid = PixelGrid::filled(64, 32, 90);
        let out = resize_to_fit(&grid, 32, 32, ResampleFilter::Triangle).unwrap();
        assert_eq!((out.width(), out.height()), (32, 16));
        assert!(out.pixels().all(|v| v == 90));
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let grid = PixelGrid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let out = resize_to_fit(&grid, 2, 2, ResampleFilter::CatmullRom).unwrap();
        assert_eq!(out, grid);
    }
}
