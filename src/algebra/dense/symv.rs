#![allow(non_snake_case)]

use crate::algebra::{FloatT, Matrix, MultiplySYMV, ShapedMatrix, Symmetric};

impl<'a, T> MultiplySYMV for Symmetric<'a, Matrix<T>>
where
    T: FloatT,
{
    type T = T;
    // implements y = αA*x + βy, reading only the triangle `uplo`
    fn symv(&self, x: &[T], y: &mut [T], α: T, β: T) {
        let (m, n) = self.size();
        assert!(m == n && n == x.len() && n == y.len());

        for (i, yi) in y.iter_mut().enumerate() {
            let mut s = T::zero();
            for (j, &xj) in x.iter().enumerate() {
                s += self[(i, j)] * xj;
            }
            *yi = if β == T::zero() {
                α * s
            } else {
                α * s + β * *yi
            };
        }
    }
}

#[test]
fn test_symv() {
    use crate::algebra::MatrixTriangle;

    #[rustfmt::skip]
    let A = Matrix::from(&[
        [ 1.,  2.,   4.],
        [ 0.,  3.,   5.],
        [ 0.,  0.,   6.],
    ]);

    let x = vec![1., -2., 3.];
    let mut y = vec![-4., -1., 3.];
    A.sym(MatrixTriangle::Triu).symv(&x, &mut y, 2.0, 3.0);
    assert_eq!(y, [6.0, 19.0, 33.0]);

    // same matrix held in the lower triangle
    #[rustfmt::skip]
    let L = Matrix::from(&[
        [ 1.,  9.,   9.],
        [ 2.,  3.,   9.],
        [ 4.,  5.,   6.],
    ]);
    let mut y = vec![-4., -1., 3.];
    L.sym(MatrixTriangle::Tril).symv(&x, &mut y, 2.0, 3.0);
    assert_eq!(y, [6.0, 19.0, 33.0]);
}
