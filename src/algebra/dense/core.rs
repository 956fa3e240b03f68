#![allow(non_snake_case)]

use crate::algebra::*;

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.is_square());
        self.data.set(T::zero());
        for i in 0..self.ncols() {
            self[(i, i)] = T::one();
        }
    }

    /// Creates a matrix from column major data
    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        assert_eq!(size.0 * size.1, src.len());
        Self {
            m: size.0,
            n: size.1,
            data: src.to_vec(),
        }
    }

    /// Changes the dimensions of `self`.  Entries are not preserved in any
    /// meaningful order.  No allocation happens as long as the new size fits
    /// within the capacity of the existing storage.
    pub fn resize(&mut self, size: (usize, usize)) {
        let (m, n) = size;
        self.data.resize(m * n, T::zero());
        self.m = m;
        self.n = n;
    }

    pub fn copy_from_slice(&mut self, src: &[T]) -> &mut Self {
        self.data.copy_from_slice(src);
        self
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    pub fn sym(&self, uplo: MatrixTriangle) -> Symmetric<'_, Self> {
        Symmetric { src: self, uplo }
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Copies `B` into the block of `self` with top left corner
    /// at `(rowoff, coloff)`.
    pub fn set_submatrix(&mut self, rowoff: usize, coloff: usize, B: &Matrix<T>) {
        assert!(rowoff + B.nrows() <= self.nrows() && coloff + B.ncols() <= self.ncols());
        let m = B.nrows();
        for col in 0..B.ncols() {
            let dst = self.index_linear((rowoff, coloff + col));
            self.data[dst..dst + m].copy_from_slice(B.col_slice(col));
        }
    }

    /// Assigns the value `c` to every entry of the `(nrows × ncols)`
    /// block with top left corner at `(rowoff, coloff)`.
    pub fn fill_block(&mut self, (rowoff, coloff): (usize, usize), (nrows, ncols): (usize, usize), c: T) {
        assert!(rowoff + nrows <= self.nrows() && coloff + ncols <= self.ncols());
        for col in coloff..(coloff + ncols) {
            let start = self.index_linear((rowoff, col));
            self.data[start..start + nrows].set(c);
        }
    }

    /// Assigns the value `c` to the diagonal of the square block of
    /// dimension `dim` with top left corner at `(offset, offset)`.
    /// Only the diagonal is touched.
    pub fn set_block_diagonal(&mut self, offset: usize, dim: usize, c: T) {
        assert!(offset + dim <= self.nrows() && offset + dim <= self.ncols());
        for i in offset..(offset + dim) {
            self[(i, i)] = c;
        }
    }

    /// true if the matrix is square and equal to its transpose,
    /// up to an absolute tolerance
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for col in 0..self.ncols() {
            for row in (col + 1)..self.nrows() {
                if T::abs(self[(row, col)] - self[(col, row)]) > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    /// Constructs a matrix from row major nested data, e.g.
    /// `Matrix::from(&[[1., 2.], [3., 4.]])`
    fn from(rows: &[[T; N]; M]) -> Matrix<T> {
        let mut A = Matrix::zeros((M, N));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                A[(i, j)] = v;
            }
        }
        A
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.nrows() {
            write!(f, "[ ")?;
            for j in 0..self.ncols() {
                write!(f, " {:10.3e}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[test]
fn test_set_blocks() {
    let mut K = Matrix::<f64>::zeros((4, 4));
    let B = Matrix::from(&[[1., 2.], [3., 4.]]);

    K.set_submatrix(2, 1, &B);
    assert_eq!(K[(2, 1)], 1.);
    assert_eq!(K[(2, 2)], 2.);
    assert_eq!(K[(3, 1)], 3.);
    assert_eq!(K[(3, 2)], 4.);

    // fill the trailing 2x2 block, then replace it with -I
    K.fill_block((2, 2), (2, 2), 7.);
    assert_eq!(K[(2, 2)], 7.);
    assert_eq!(K[(3, 3)], 7.);
    assert_eq!(K[(2, 1)], 1.); // untouched

    K.fill_block((2, 2), (2, 2), 0.);
    K.set_block_diagonal(2, 2, -1.);
    assert_eq!(K[(2, 2)], -1.);
    assert_eq!(K[(3, 3)], -1.);
    assert_eq!(K[(3, 2)], 0.);
    assert_eq!(K[(2, 3)], 0.);
}

#[test]
fn test_resize() {
    let mut A = Matrix::<f64>::zeros((3, 3));
    let cap = A.data.capacity();
    A.resize((2, 2));
    assert_eq!(A.size(), (2, 2));
    assert_eq!(A.data().len(), 4);
    A.resize((3, 3));
    assert_eq!(A.data.capacity(), cap);
}

#[test]
fn test_is_symmetric() {
    let A = Matrix::from(&[[1., 2.], [2., 1.]]);
    assert!(A.is_symmetric(0.));
    let B = Matrix::from(&[[1., 2.], [2.1, 1.]]);
    assert!(!B.is_symmetric(1e-3));
    assert!(B.is_symmetric(0.2));
    assert!(!Matrix::<f64>::zeros((2, 3)).is_symmetric(1.));
}
