//! Dense distance matrix.

/// A dense `rows × cols` distance matrix stored in row-major order.
///
/// Terminal→plant distances use one row per terminal and one column per
/// plant; plant→plant distances use a square matrix.
///
/// # Examples
///
/// ```
/// use u_milkrun::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(2, 3);
/// dm.set(1, 2, 448.18);
/// assert_eq!(dm.get(1, 2), 448.18);
/// assert_eq!(dm.rows(), 2);
/// assert_eq!(dm.cols(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given shape, initialized to zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates a square matrix of the given size, initialized to zero.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Creates a matrix from explicit row-major data.
    ///
    /// Returns `None` if the data length doesn't match `rows * cols`.
    pub fn from_data(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { data, rows, cols })
    }

    /// Returns the distance from row `from` to column `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.cols + to]
    }

    /// Sets the distance from row `from` to column `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.cols + to] = distance;
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the first entry that is negative or not finite.
    pub fn find_invalid(&self) -> Option<(usize, usize, f64)> {
        self.data
            .iter()
            .position(|d| !d.is_finite() || *d < 0.0)
            .map(|idx| (idx / self.cols, idx % self.cols, self.data[idx]))
    }
}
