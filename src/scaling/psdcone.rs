#![allow(non_snake_case)]

use super::{ScalingBlockT, ScalingWorkspace};
use crate::algebra::*;

// ------------------------------------
// Positive semidefinite cone scaling
// ------------------------------------

/// Borrowed semidefinite scaling block
///
/// With `rti = r⁻ᵀ`, the four operations on a symmetric block `X` are
/// `W(X) = r'Xr`, `W'(X) = rXr'`, `W⁻¹(X) = rti X rti'` and
/// `W⁻ᵀ(X) = rti' X rti`.
pub struct PSDScaling<'a, T> {
    r: &'a Matrix<T>,
    rti: &'a Matrix<T>,
}

impl<'a, T> PSDScaling<'a, T>
where
    T: FloatT,
{
    pub fn new(r: &'a Matrix<T>, rti: &'a Matrix<T>) -> Self {
        assert!(r.is_square() && r.size() == rti.size());
        Self { r, rti }
    }
}

impl<'a, T> ScalingBlockT<T> for PSDScaling<'a, T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.r.nrows() * self.r.nrows()
    }

    fn scale(&self, x: &mut [T], trans: MatrixShape, inverse: bool, work: &mut ScalingWorkspace<T>) {
        let k = self.r.nrows();
        if k == 0 {
            return;
        }
        let (X, tmp) = (&mut work.workmat1, &mut work.workmat2);
        X.resize((k, k));
        tmp.resize((k, k));

        // symmetric X from the lower triangle of x
        for j in 0..k {
            for i in j..k {
                let v = x[i + j * k];
                X[(i, j)] = v;
                X[(j, i)] = v;
            }
        }

        let R = if inverse { self.rti } else { self.r };

        // W and W^{-T} take the form R'XR, the other two RXR'
        let is_RtXR = (trans == MatrixShape::N) != inverse;
        if is_RtXR {
            tmp.mul(&R.t(), X, T::one(), T::zero());
            X.mul(tmp, R, T::one(), T::zero());
        } else {
            tmp.mul(X, &R.t(), T::one(), T::zero());
            X.mul(R, tmp, T::one(), T::zero());
        }

        // write back the symmetric part
        for j in 0..k {
            for i in j..k {
                let v = X[(i, j)];
                x[i + j * k] = v;
                x[j + i * k] = v;
            }
        }
    }
}

#[test]
fn test_psd_scaling_explicit() {
    use crate::cones::ConeDims;

    #[rustfmt::skip]
    let r = Matrix::from(&[
        [2., 0.],
        [1., 1.],
    ]);
    // r^{-T}
    #[rustfmt::skip]
    let rti = Matrix::from(&[
        [0.5, -0.5],
        [0.,   1. ],
    ]);
    let W = PSDScaling::new(&r, &rti);
    let dims = ConeDims::new(0, vec![], vec![2]).unwrap();
    let mut work = ScalingWorkspace::<f64>::new(&dims);

    // X = [1 2; 2 3], Xr = [4 2; 7 3], r'(Xr) = [15 7; 7 3]
    let x = vec![1., 2., 2., 3.];
    let mut y = x.clone();
    W.scale(&mut y, MatrixShape::N, false, &mut work);
    assert!(y.norm_inf_diff(&[15., 7., 7., 3.]) < 1e-14);

    // rXr' : rX = [2 4; 3 5], (rX)r' = [4 6; 6 8]
    let mut y = x.clone();
    W.scale(&mut y, MatrixShape::T, false, &mut work);
    assert!(y.norm_inf_diff(&[4., 6., 6., 8.]) < 1e-14);

    // upper triangle of the input is ignored
    let mut y = vec![1., 2., f64::NAN, 3.];
    W.scale(&mut y, MatrixShape::N, false, &mut work);
    W.scale(&mut y, MatrixShape::N, true, &mut work);
    assert!(y.norm_inf_diff(&x) < 1e-14);
}
