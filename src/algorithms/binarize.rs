use crate::data::PixelGrid;

pub const WHITE: u8 = 255;
pub const BLACK: u8 = 0;

/// Two-level thresholding: samples strictly above `threshold` become 255,
/// everything else (including `threshold` itself) becomes 0.
pub fn apply_threshold(grid: &PixelGrid, threshold: u8) -> PixelGrid {
    grid.map(|v| if v > threshold { WHITE } else { BLACK })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let grid = PixelGrid::from_rows(vec![vec![99, 100, 101], vec![0, 255, 100]]).unwrap();
        let out = apply_threshold(&grid, 100);
        assert_eq!(out.row(0), &[0, 0, 255]);
        assert_eq!(out.row(1), &[0, 255, 0]);
    }

    #[test]
    fn test_threshold_255_is_all_black() {
        let grid = PixelGrid::filled(3, 3, 255);
        assert!(apply_threshold(&grid, 255).pixels().all(|v| v == BLACK));
    }

    #[test]
    fn test_empty_in_empty_out() {
        assert!(apply_threshold(&PixelGrid::empty(), 10).is_empty());
    }
}
