use super::{ScalingBlockT, ScalingWorkspace};
use crate::algebra::*;

// -------------------------------------
// Diagonal scaling, used for the nonlinear
// block and the nonnegative orthant
// -------------------------------------

/// Borrowed diagonal scaling block `W = diag(w)`
pub struct DiagonalScaling<'a, T> {
    w: &'a [T],
    winv: &'a [T],
}

impl<'a, T> DiagonalScaling<'a, T>
where
    T: FloatT,
{
    pub fn new(w: &'a [T], winv: &'a [T]) -> Self {
        assert_eq!(w.len(), winv.len());
        Self { w, winv }
    }
}

impl<'a, T> ScalingBlockT<T> for DiagonalScaling<'a, T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.w.len()
    }

    fn scale(
        &self,
        x: &mut [T],
        _trans: MatrixShape,
        inverse: bool,
        _work: &mut ScalingWorkspace<T>,
    ) {
        // symmetric, so ignore transpose
        if inverse {
            x.hadamard(self.winv);
        } else {
            x.hadamard(self.w);
        }
    }
}

#[test]
fn test_diagonal_scaling() {
    use crate::cones::ConeDims;

    let w = vec![2., 4.];
    let winv = vec![0.5, 0.25];
    let W = DiagonalScaling::new(&w, &winv);
    let mut work = ScalingWorkspace::<f64>::new(&ConeDims::default());

    let mut x = vec![1., 1.];
    W.scale(&mut x, MatrixShape::T, false, &mut work);
    assert_eq!(x, vec![2., 4.]);
    W.scale(&mut x, MatrixShape::N, true, &mut work);
    assert_eq!(x, vec![1., 1.]);
}
