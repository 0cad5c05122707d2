use crate::data::PixelGrid;
use crate::error::CrackError;
use image::{ColorType, DynamicImage, GrayImage, Luma, RgbImage};
use std::path::Path;

/// Decode an image file and normalize it to an 8-bit gray grid.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<PixelGrid, CrackError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| CrackError::image(path, e))?;
    let gray = to_gray8(img)?;
    tracing::debug!(
        path = %path.display(),
        width = gray.width(),
        height = gray.height(),
        "Decoded image into gray grid"
    );
    gray_image_to_grid(gray)
}

/// Reduce any supported color layout to single-channel 8-bit luma.
///
/// Color layouts use the ITU-R 601-2 weights (`0.299 R + 0.587 G + 0.114 B`)
/// in 16-bit fixed point, rounding half up. Alpha is ignored.
pub fn to_gray8(img: DynamicImage) -> Result<GrayImage, CrackError> {
    match img.color() {
        ColorType::L8 => Ok(img.into_luma8()),
        ColorType::La8 | ColorType::L16 | ColorType::La16 => Ok(img.to_luma8()),
        ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => Ok(rgb_to_luma_601(&img.to_rgb8())),
        other => Err(CrackError::UnsupportedColor(format!("{other:?}"))),
    }
}

fn rgb_to_luma_601(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma_601(r, g, b)])
    })
}

#[inline]
fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471;
    ((weighted + 0x8000) >> 16) as u8
}

pub fn gray_image_to_grid(image: GrayImage) -> Result<PixelGrid, CrackError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(PixelGrid::empty());
    }
    PixelGrid::new(width as usize, height as usize, image.into_raw())
}

pub fn grid_to_gray_image(grid: &PixelGrid) -> Result<GrayImage, CrackError> {
    GrayImage::from_raw(
        grid.width() as u32,
        grid.height() as u32,
        grid.as_slice().to_vec(),
    )
    .ok_or_else(|| CrackError::shape("grid buffer does not fit its dimensions"))
}

/// Encode the grid as 8-bit gray; the format follows the file extension.
pub fn save_grid<P: AsRef<Path>>(grid: &PixelGrid, path: P) -> Result<(), CrackError> {
    let path = path.as_ref();
    if grid.is_empty() {
        return Err(CrackError::shape("refusing to save an empty grid"));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let image = grid_to_gray_image(grid)?;
    image.save(path).map_err(|e| CrackError::image(path, e))
}
