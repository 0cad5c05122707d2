use crate::data::PixelGrid;

/// 3x3 median filter.
///
/// Interior pixels take the median (index 4 of the sorted window) of their
/// 3x3 neighborhood. The outermost rows and columns are not filtered and are
/// written as 0, so the output always carries a one-pixel black frame.
/// Grids narrower or shorter than 3 therefore come back all zero.
pub fn median_filter_3x3(grid: &PixelGrid) -> PixelGrid {
    let (width, height) = (grid.width(), grid.height());
    if grid.is_empty() {
        return PixelGrid::empty();
    }

    let src = grid.as_slice();
    let mut out = vec![0u8; width * height];

    if width >= 3 && height >= 3 {
        let mut window = [0u8; 9];
        for i in 1..height - 1 {
            for j in 1..width - 1 {
                let mut k = 0;
                for di in 0..3 {
                    let base = (i + di - 1) * width + j - 1;
                    window[k..k + 3].copy_from_slice(&src[base..base + 3]);
                    k += 3;
                }
                window.sort_unstable();
                out[i * width + j] = window[4];
            }
        }
    }

    PixelGrid::from_parts(width, height, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_noise_is_removed() {
        let mut rows = vec![vec![100u8; 5]; 5];
        rows[2][2] = 255;
        rows[1][3] = 0;
        let grid = PixelGrid::from_rows(rows).unwrap();

        let out = median_filter_3x3(&grid);
        assert_eq!(out[(2, 2)], 100);
        assert_eq!(out[(1, 3)], 100);
    }

    #[test]
    fn test_border_is_zeroed() {
        let grid = PixelGrid::filled(4, 4, 200);
        let out = median_filter_3x3(&grid);
        for i in 0..4 {
            assert_eq!(out[(0, i)], 0);
            assert_eq!(out[(3, i)], 0);
            assert_eq!(out[(i, 0)], 0);
            assert_eq!(out[(i, 3)], 0);
        }
        assert_eq!(out[(1, 1)], 200);
        assert_eq!(out[(2, 2)], 200);
    }

    #[test]
    fn test_median_of_ramp() {
        let grid = PixelGrid::from_rows(vec![
            vec![1, 2, 3],
            vec![4, 5, 6],
            vec![7, 8, 9],
        ])
        .unwrap();
        let out = median_filter_3x3(&grid);
        assert_eq!(out[(1, 1)], 5);
        assert_eq!(out.pixels().filter(|&v| v != 0).count(), 1);
    }

    #[test]
    fn test_thin_grids_come_back_black() {
        let grid = PixelGrid::filled(10, 2, 77);
        let out = median_filter_3x3(&grid);
        assert_eq!((out.width(), out.height()), (10, 2));
        assert!(out.pixels().all(|v| v == 0));

        assert!(median_filter_3x3(&PixelGrid::empty()).is_empty());
    }
}
