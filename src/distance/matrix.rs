//! Dense square matrices over locations.

use crate::models::Customer;
use serde::{Deserialize, Serialize};

/// A dense n×n matrix stored in row-major order.
///
/// Used for travel times ([`DistanceMatrix`]), arc prices, forbidden arcs
/// and per-arc reduced-cost bounds.
///
/// # Examples
///
/// ```
/// use u_pricing::distance::Matrix;
///
/// let mut m = Matrix::filled(3, false);
/// m.set(0, 2, true);
/// assert!(m.get(0, 2));
/// assert!(!m.get(2, 0));
/// assert_eq!(m.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    size: usize,
}

/// Travel times between locations.
pub type DistanceMatrix = Matrix<f64>;

impl<T: Copy> Matrix<T> {
    /// Creates a matrix of the given size with every entry set to `value`.
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            data: vec![value; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit n×n grid in row-major order.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Returns `None` unless every row has exactly `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<T>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.iter().flatten().copied().collect(),
            size,
        })
    }

    /// Returns the entry for the arc `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> T {
        self.data[from * self.size + to]
    }

    /// Sets the entry for the arc `from → to`.
    pub fn set(&mut self, from: usize, to: usize, value: T) {
        self.data[from * self.size + to] = value;
    }

    /// Row of outgoing entries of `from`.
    pub fn row(&self, from: usize) -> &[T] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Matrix<f64> {
    /// Computes a Euclidean travel-time matrix from customer coordinates.
    pub fn from_customers(customers: &[Customer]) -> Self {
        let n = customers.len();
        let mut dm = Self::filled(n, 0.0);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = customers[i].distance_to(&customers[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Replaces every entry `x` by `min(x, other)` entrywise.
    ///
    /// # Panics
    ///
    /// Panics if the sizes differ.
    pub fn min_assign(&mut self, other: &Self) {
        assert_eq!(self.size, other.size, "matrix sizes differ");
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            if b < *a {
                *a = b;
            }
        }
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}
