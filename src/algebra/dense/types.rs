use crate::algebra::*;
use std::ops::{Index, IndexMut};

/// Dense matrix in column major format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use conekkt::algebra::Matrix;
///
/// let A : Matrix<f64> = Matrix::from(
///     &[[1., 3., 5.],
///       [2., 0., 6.],
///       [0., 4., 7.]]);
///
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

/// Basic size queries for matrices and matrix views
pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn shape(&self) -> MatrixShape;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

//NB: the concrete dense type is just called "Matrix".  The "DenseMatrix" trait
//is implemented on Matrix, Adjoint and Symmetric types to allow for indexing
//of values in any of those formats.   This follows the Julia naming convention
//for similar types.
pub trait DenseMatrix: ShapedMatrix + Index<(usize, usize), Output = Self::T> {
    type T;
    fn index_linear(&self, idx: (usize, usize)) -> usize;
    fn data(&self) -> &[Self::T];
}

impl<T> ShapedMatrix for Matrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T> DenseMatrix for Matrix<T> {
    type T = T;
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }
    fn data(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.data[self.index_linear(idx)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

// ------------------------------------------------
// Adjoint and Symmetric implementations for Matrix.
// These are read only views of the matrix that allow for
// things like matrix multiplication and indexing, but
// do not allow for modification of the underlying data.

impl<M> ShapedMatrix for Adjoint<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.ncols()
    }
    fn ncols(&self) -> usize {
        self.src.nrows()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::T
    }
}

impl<M> ShapedMatrix for Symmetric<'_, M>
where
    M: ShapedMatrix,
{
    fn nrows(&self) -> usize {
        self.src.nrows()
    }
    fn ncols(&self) -> usize {
        self.src.ncols()
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T> DenseMatrix for Adjoint<'_, Matrix<T>> {
    type T = T;
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        //reverse the indices
        self.src.index_linear((idx.1, idx.0))
    }
    fn data(&self) -> &[T] {
        &self.src.data
    }
}

impl<T> DenseMatrix for Symmetric<'_, Matrix<T>> {
    type T = T;
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        let cmp = match self.uplo {
            MatrixTriangle::Triu => usize::le,
            MatrixTriangle::Tril => usize::ge,
        };

        if cmp(&idx.0, &idx.1) {
            //populated triangular part
            self.src.index_linear((idx.0, idx.1))
        } else {
            //reflected triangular part
            self.src.index_linear((idx.1, idx.0))
        }
    }
    fn data(&self) -> &[T] {
        &self.src.data
    }
}

impl<T> Index<(usize, usize)> for Adjoint<'_, Matrix<T>> {
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.src.data[self.index_linear(idx)]
    }
}

impl<T> Index<(usize, usize)> for Symmetric<'_, Matrix<T>> {
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.src.data[self.index_linear(idx)]
    }
}
