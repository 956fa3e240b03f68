use super::{ScalingBlockT, ScalingWorkspace};
use crate::algebra::*;
use std::iter::zip;

// -------------------------------------
// Second order cone scaling
// -------------------------------------

/// Borrowed second order cone scaling block
///
/// `W = β(2vv' - J)` and `W⁻¹ = (1/β)(2Jvv'J - J)`, where
/// `J = diag(1, -1, …, -1)` and `v'Jv = 1`.  Both are symmetric.
pub struct SOCScaling<'a, T> {
    v: &'a [T],
    beta: T,
}

impl<'a, T> SOCScaling<'a, T>
where
    T: FloatT,
{
    pub fn new(v: &'a [T], beta: T) -> Self {
        Self { v, beta }
    }
}

impl<'a, T> ScalingBlockT<T> for SOCScaling<'a, T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.v.len()
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
            _soc_mul_Winv_inner(x, self.v, self.beta);
        } else {
            _soc_mul_W_inner(x, self.v, self.beta);
        }
    }
}

// x = β(2v(v'x) - Jx)
#[allow(non_snake_case)]
fn _soc_mul_W_inner<T>(x: &mut [T], v: &[T], β: T)
where
    T: FloatT,
{
    let two: T = (2.).as_T();
    let ζ = two * v.dot(x);

    x[0] = β * (ζ * v[0] - x[0]);
    for (xi, &vi) in zip(&mut x[1..], &v[1..]) {
        *xi = β * (ζ * vi + *xi);
    }
}

// x = (1/β)J(2v(v'Jx) - x)
#[allow(non_snake_case)]
fn _soc_mul_Winv_inner<T>(x: &mut [T], v: &[T], β: T)
where
    T: FloatT,
{
    let two: T = (2.).as_T();
    let ζ = two * (v[0] * x[0] - v[1..].dot(&x[1..]));

    x[0] = (ζ * v[0] - x[0]) / β;
    for (xi, &vi) in zip(&mut x[1..], &v[1..]) {
        *xi = (*xi - ζ * vi) / β;
    }
}

#[test]
fn test_soc_scaling_explicit() {
    use crate::cones::ConeDims;

    // v'Jv = 1.25 - 0.25 = 1
    let v = vec![f64::sqrt(1.25), 0.5, 0.];
    let β = 2.;
    let W = SOCScaling::new(&v, β);
    let mut work = ScalingWorkspace::<f64>::new(&ConeDims::default());

    // explicit W = β(2vv' - J)
    let x = vec![1., -2., 3.];
    let mut Wx = vec![0.; 3];
    for i in 0..3 {
        let Ji = if i == 0 { 1. } else { -1. };
        for j in 0..3 {
            let Jij = if i == j { Ji } else { 0. };
            Wx[i] += β * (2. * v[i] * v[j] - Jij) * x[j];
        }
    }

    let mut y = x.clone();
    W.scale(&mut y, MatrixShape::N, false, &mut work);
    assert!(y.norm_inf_diff(&Wx) < 1e-14);

    W.scale(&mut y, MatrixShape::N, true, &mut work);
    assert!(y.norm_inf_diff(&x) < 1e-14);
}
