use rand::Rng;
use rand::distributions::IndependentSample;
use std::ops::Index;
use std::slice;

/// A dense matrix of `f64` values.
///
/// Rows are stored contiguously, so each neuron's incoming weights can be
/// handed out as a single slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    /// Builds a matrix by drawing every entry independently from
    /// `distribution`.
    pub fn random<D, R>(distribution: D, rows: usize, cols: usize, rng: &mut R) -> Self
        where D: IndependentSample<f64>,
              R: Rng
    {
        let mut data = Vec::with_capacity(rows * cols);
        for _ in 0..(rows * cols) {
            data.push(distribution.ind_sample(rng));
        }
        Mat {
            rows: rows,
            cols: cols,
            data: data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Iterates over the rows of the matrix as slices.
    pub fn row_iter(&self) -> slice::Chunks<f64> {
        self.data.chunks(self.cols)
    }

    /// Iterates over the rows of the matrix as mutable slices.
    pub fn row_iter_mut(&mut self) -> slice::ChunksMut<f64> {
        self.data.chunks_mut(self.cols)
    }
}

#[cfg(test)]
impl Mat {
    /// Builds a matrix from explicit entries, for tests.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols);
        Mat {
            rows: rows,
            cols: cols,
            data: data,
        }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::Range;
    use rand::{SeedableRng, XorShiftRng};

    #[test]
    fn random_entries_stay_in_range() {
        let mut rng = XorShiftRng::from_seed([1, 2, 3, 4]);
        let mat = Mat::random(Range::new(-1.0, 1.0), 7, 5, &mut rng);
        assert_eq!(mat.rows(), 7);
        assert_eq!(mat.cols(), 5);
        for row in mat.row_iter() {
            for &entry in row {
                assert!(entry >= -1.0 && entry < 1.0);
            }
        }
    }

    #[test]
    fn indexing_matches_row_layout() {
        let mat = Mat::from_vec(2, 3, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(mat[(0, 0)], 0.0);
        assert_eq!(mat[(0, 2)], 2.0);
        assert_eq!(mat[(1, 1)], 11.0);

        let rows: Vec<&[f64]> = mat.row_iter().collect();
        assert_eq!(rows, vec![&[0.0, 1.0, 2.0][..], &[10.0, 11.0, 12.0][..]]);
    }
}
