//! Owned single-channel 8-bit grid in row-major layout.
//!
//! Every stage of the pipeline consumes a `PixelGrid` by reference and
//! returns a freshly allocated one; nothing is modified in place. A grid with
//! zero rows is the empty sentinel and always has zero columns as well.
use crate::error::CrackError;
use std::ops::Index;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Build a grid from a flat row-major buffer.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, CrackError> {
        if (width == 0) != (height == 0) {
            return Err(CrackError::shape(format!(
                "{width}x{height} grid: only 0x0 may be empty"
            )));
        }
        if data.len() != width * height {
            return Err(CrackError::shape(format!(
                "{width}x{height} grid needs {} samples, got {}",
                width * height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap a buffer the caller has already sized as `width * height`.
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a grid from nested rows; every row must have the length of the first.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, CrackError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height > 0 && width == 0 {
            return Err(CrackError::shape(format!("{height} rows of zero length")));
        }

        let mut data = Vec::with_capacity(width * height);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(CrackError::shape(format!(
                    "row {i} has length {}, expected {width}",
                    row.len()
                )));
            }
            data.extend_from_slice(&row);
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Like [`PixelGrid::from_rows`] but range-checks wider integers.
    pub fn from_int_rows(rows: &[Vec<i32>]) -> Result<Self, CrackError> {
        let mut narrowed = Vec::with_capacity(rows.len());
        for (row, values) in rows.iter().enumerate() {
            let mut out = Vec::with_capacity(values.len());
            for (col, &value) in values.iter().enumerate() {
                let v = u8::try_from(value)
                    .map_err(|_| CrackError::IntensityOutOfRange { row, col, value })?;
                out.push(v);
            }
            narrowed.push(out);
        }
        Self::from_rows(narrowed)
    }

    /// A `width × height` grid with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        if width == 0 || height == 0 {
            return Self::empty();
        }
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// Sample at (row, col), or `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        (row < self.height && col < self.width).then(|| self.data[row * self.width + col])
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.data.chunks_exact(self.width.max(1))
    }

    /// All samples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Apply `f` to every sample, keeping the shape.
    pub fn map(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl Index<(usize, usize)> for PixelGrid {
    type Output = u8;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &u8 {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) outside {}x{} grid",
            self.width,
            self.height
        );
        &self.data[row * self.width + col]
    }
}
