//! Nesterov-Todd scaling of product cones.
//!
//! The scaling matrix `W` is block diagonal, with one block for the
//! nonlinear constraints, one for the nonnegative orthant and one for each
//! second order and semidefinite cone.  It is applied to vectors in the
//! _unpacked_ layout described in [`cones`](crate::cones).
//!
//! Construction of the scaling point itself is left to the caller.  This
//! module only stores the scaling and applies `W`, `Wᵀ`, `W⁻¹` or `W⁻ᵀ`.

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::cones::ConeDims;
use enum_dispatch::*;
use itertools::izip;
use std::iter::{once, zip};

mod nonnegative;
pub use nonnegative::*;
mod psdcone;
pub use psdcone::*;
mod socone;
pub use socone::*;

#[enum_dispatch(ScalingBlockT<T>)]
pub(crate) enum ScalingBlock<'a, T>
where
    T: FloatT,
{
    DiagonalScaling(DiagonalScaling<'a, T>),
    SOCScaling(SOCScaling<'a, T>),
    PSDScaling(PSDScaling<'a, T>),
}

#[enum_dispatch]
pub(crate) trait ScalingBlockT<T>
where
    T: FloatT,
{
    /// number of entries of the block in unpacked layout
    fn numel(&self) -> usize;

    /// implements x = op(W)x in place, where op(W) is one of W, W',
    /// W^{-1} or W^{-T}
    fn scale(&self, x: &mut [T], trans: MatrixShape, inverse: bool, work: &mut ScalingWorkspace<T>);
}

/// Scratch space for semidefinite blocks.
///
/// Holds two square matrices of the largest semidefinite order in the
/// descriptor it was created for, so that scaling never allocates.
#[derive(Debug, Clone)]
pub struct ScalingWorkspace<T> {
    order: usize,
    pub(crate) workmat1: Matrix<T>,
    pub(crate) workmat2: Matrix<T>,
}

impl<T> ScalingWorkspace<T>
where
    T: FloatT,
{
    pub fn new(dims: &ConeDims) -> Self {
        let k = dims.max_psd_order();
        Self {
            order: k,
            workmat1: Matrix::zeros((k, k)),
            workmat2: Matrix::zeros((k, k)),
        }
    }

    /// largest semidefinite order this workspace can serve
    pub fn order(&self) -> usize {
        self.order
    }
}

/// Nesterov-Todd scaling `W` of a product cone with an additional
/// diagonal block for nonlinear constraints.
///
/// * `dnl`, `dnli`: diagonal of the nonlinear block and its inverse
/// * `d`, `di`: diagonal of the nonnegative block and its inverse
/// * `v`, `beta`: one pair per second order cone, with
///   `W = beta(2vv' - J)` and `v'Jv = 1`
/// * `r`, `rti`: one pair per semidefinite cone, with `rti = r^{-T}` and
///   `W(X) = r'Xr`
#[derive(Debug, Clone, PartialEq)]
pub struct NTScaling<T = f64> {
    pub dnl: Vec<T>,
    pub dnli: Vec<T>,
    pub d: Vec<T>,
    pub di: Vec<T>,
    pub v: Vec<Vec<T>>,
    pub beta: Vec<T>,
    pub r: Vec<Matrix<T>>,
    pub rti: Vec<Matrix<T>>,
}

impl<T> NTScaling<T>
where
    T: FloatT,
{
    /// The scaling `W = I` for the given cone and nonlinear dimension
    pub fn identity(dims: &ConeDims, mnl: usize) -> Self {
        let e1 = |q: usize| {
            let mut v = vec![T::zero(); q];
            v[0] = T::one();
            v
        };
        Self {
            dnl: vec![T::one(); mnl],
            dnli: vec![T::one(); mnl],
            d: vec![T::one(); dims.l()],
            di: vec![T::one(); dims.l()],
            v: dims.q().iter().map(|&q| e1(q)).collect(),
            beta: vec![T::one(); dims.q().len()],
            r: dims.s().iter().map(|&k| Matrix::identity(k)).collect(),
            rti: dims.s().iter().map(|&k| Matrix::identity(k)).collect(),
        }
    }

    /// Creates a scaling from its defining blocks and computes the inverse
    /// diagonals `dnli` and `di`.  `rti` must be supplied.
    ///
    /// Block shapes are not checked here.  Use
    /// [`check_dims`](NTScaling::check_dims), which
    /// [`scale`](NTScaling::scale) and the KKT solver run before use.
    pub fn new(
        dnl: Vec<T>,
        d: Vec<T>,
        v: Vec<Vec<T>>,
        beta: Vec<T>,
        r: Vec<Matrix<T>>,
        rti: Vec<Matrix<T>>,
    ) -> Self {
        let mut dnli = dnl.clone();
        dnli.recip();
        let mut di = d.clone();
        di.recip();
        Self {
            dnl,
            dnli,
            d,
            di,
            v,
            beta,
            r,
            rti,
        }
    }

    /// Checks that every block agrees with the descriptor and the
    /// nonlinear dimension.
    pub fn check_dims(&self, dims: &ConeDims, mnl: usize) -> Result<(), DimensionError> {
        check_length("dnl", &self.dnl, mnl)?;
        check_length("dnli", &self.dnli, mnl)?;
        check_length("d", &self.d, dims.l())?;
        check_length("di", &self.di, dims.l())?;

        let (q, s) = (dims.q(), dims.s());
        check_nblocks("v", self.v.len(), q.len())?;
        check_nblocks("beta", self.beta.len(), q.len())?;
        for (vi, &qi) in zip(&self.v, q) {
            check_length("v", vi, qi)?;
        }

        check_nblocks("r", self.r.len(), s.len())?;
        check_nblocks("rti", self.rti.len(), s.len())?;
        for (r, rti, &k) in izip!(&self.r, &self.rti, s) {
            check_square("r", r, k)?;
            check_square("rti", rti, k)?;
        }
        Ok(())
    }

    /// Applies `W` (`trans = N`, `inverse = false`), `W'` (`T`, `false`),
    /// `W^{-1}` (`N`, `true`) or `W^{-T}` (`T`, `true`) to the unpacked
    /// vector `x` in place.
    ///
    /// `x` must have length `mnl + Nunpacked`.  Semidefinite blocks of `x`
    /// are read through their lower triangles and written in full.
    pub fn scale(
        &self,
        x: &mut [T],
        dims: &ConeDims,
        mnl: usize,
        trans: MatrixShape,
        inverse: bool,
        work: &mut ScalingWorkspace<T>,
    ) -> Result<(), DimensionError> {
        self.check_dims(dims, mnl)?;
        check_length("x", x, mnl + dims.numel_unpacked())?;
        if work.order() < dims.max_psd_order() {
            let k = dims.max_psd_order();
            return Err(DimensionError::MatrixSize {
                name: "work",
                expected: (k, k),
                found: (work.order(), work.order()),
            });
        }

        let mut start = 0;
        for block in self.blocks() {
            let stop = start + block.numel();
            block.scale(&mut x[start..stop], trans, inverse, work);
            start = stop;
        }
        Ok(())
    }

    // blocks in storage order: nonlinear, orthant, second order, semidefinite
    pub(crate) fn blocks(&self) -> impl Iterator<Item = ScalingBlock<'_, T>> {
        let nonlinear = DiagonalScaling::new(&self.dnl, &self.dnli);
        let orthant = DiagonalScaling::new(&self.d, &self.di);

        once(ScalingBlock::DiagonalScaling(nonlinear))
            .chain(once(ScalingBlock::DiagonalScaling(orthant)))
            .chain(
                zip(&self.v, &self.beta)
                    .map(|(v, &beta)| ScalingBlock::SOCScaling(SOCScaling::new(v, beta))),
            )
            .chain(
                zip(&self.r, &self.rti)
                    .map(|(r, rti)| ScalingBlock::PSDScaling(PSDScaling::new(r, rti))),
            )
    }
}

fn check_length<T>(name: &'static str, v: &[T], expected: usize) -> Result<(), DimensionError> {
    if v.len() != expected {
        return Err(DimensionError::VectorLength {
            name,
            expected,
            found: v.len(),
        });
    }
    Ok(())
}

fn check_nblocks(name: &'static str, found: usize, expected: usize) -> Result<(), DimensionError> {
    if found != expected {
        return Err(DimensionError::ScalingBlocks {
            name,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_square<T>(name: &'static str, M: &Matrix<T>, k: usize) -> Result<(), DimensionError> {
    if M.size() != (k, k) {
        return Err(DimensionError::MatrixSize {
            name,
            expected: (k, k),
            found: M.size(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    pub(crate) fn rng(seed: u64) -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(seed)
    }

    // a random scaling with W positive definite and well conditioned
    pub(crate) fn random_scaling(
        rng: &mut Xoshiro256StarStar,
        dims: &ConeDims,
        mnl: usize,
    ) -> NTScaling<f64> {
        let dnl = (0..mnl).map(|_| rng.gen_range(0.5..2.0)).collect();
        let d = (0..dims.l()).map(|_| rng.gen_range(0.5..2.0)).collect();

        let v = dims
            .q()
            .iter()
            .map(|&q| {
                let mut v: Vec<f64> = (0..q).map(|_| rng.gen_range(-0.5..0.5)).collect();
                v[0] = f64::sqrt(1.0 + v[1..].sumsq());
                v
            })
            .collect();
        let beta = dims.q().iter().map(|_| rng.gen_range(0.5..2.0)).collect();

        // r lower triangular with a dominant diagonal
        let mut r = vec![];
        let mut rti = vec![];
        for &k in dims.s() {
            let mut L = Matrix::<f64>::zeros((k, k));
            for j in 0..k {
                L[(j, j)] = rng.gen_range(1.0..2.0);
                for i in (j + 1)..k {
                    L[(i, j)] = rng.gen_range(-0.3..0.3);
                }
            }
            let Linv = lower_triangular_inverse(&L);
            let mut Linvt = Matrix::<f64>::zeros((k, k));
            for j in 0..k {
                for i in 0..k {
                    Linvt[(i, j)] = Linv[(j, i)];
                }
            }
            r.push(L);
            rti.push(Linvt);
        }

        NTScaling::new(dnl, d, v, beta, r, rti)
    }

    pub(crate) fn lower_triangular_inverse(L: &Matrix<f64>) -> Matrix<f64> {
        let k = L.nrows();
        let mut X = Matrix::<f64>::zeros((k, k));
        for col in 0..k {
            for i in col..k {
                let mut s = if i == col { 1.0 } else { 0.0 };
                for j in col..i {
                    s -= L[(i, j)] * X[(j, col)];
                }
                X[(i, col)] = s / L[(i, i)];
            }
        }
        X
    }

    // symmetric random vector in unpacked layout
    pub(crate) fn random_unpacked(
        rng: &mut Xoshiro256StarStar,
        dims: &ConeDims,
        mnl: usize,
    ) -> Vec<f64> {
        let mut x: Vec<f64> = (0..mnl + dims.numel_unpacked())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        let mut start = mnl + dims.numel_linear();
        for &k in dims.s() {
            for j in 0..k {
                for i in (j + 1)..k {
                    x[start + j + i * k] = x[start + i + j * k];
                }
            }
            start += k * k;
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;

    fn dims() -> ConeDims {
        ConeDims::new(3, vec![1, 3, 4], vec![1, 2, 3]).unwrap()
    }

    #[test]
    fn test_identity_scaling() {
        let dims = dims();
        let mnl = 2;
        let W = NTScaling::<f64>::identity(&dims, mnl);
        let mut work = ScalingWorkspace::new(&dims);
        assert!(W.check_dims(&dims, mnl).is_ok());

        let mut rng = rng(1);
        let x = random_unpacked(&mut rng, &dims, mnl);
        for trans in [MatrixShape::N, MatrixShape::T] {
            for inverse in [false, true] {
                let mut y = x.clone();
                W.scale(&mut y, &dims, mnl, trans, inverse, &mut work)
                    .unwrap();
                assert!(y.norm_inf_diff(&x) < 1e-15);
            }
        }
    }

    #[test]
    fn test_scaling_inverse_identities() {
        let dims = dims();
        let mnl = 2;
        let mut rng = rng(2);
        let W = random_scaling(&mut rng, &dims, mnl);
        let mut work = ScalingWorkspace::new(&dims);
        let x = random_unpacked(&mut rng, &dims, mnl);

        for trans in [MatrixShape::N, MatrixShape::T] {
            // W^{-1}W = I and W^{-T}W' = I
            let mut y = x.clone();
            W.scale(&mut y, &dims, mnl, trans, false, &mut work).unwrap();
            assert!(y.norm_inf_diff(&x) > 1e-3);
            W.scale(&mut y, &dims, mnl, trans, true, &mut work).unwrap();
            assert!(y.norm_inf_diff(&x) < 1e-12);
        }
    }

    #[test]
    fn test_scaling_transpose_adjoint() {
        // <Wx, y> = <x, W'y> on unpacked symmetric vectors
        let dims = dims();
        let mnl = 1;
        let mut rng = rng(3);
        let W = random_scaling(&mut rng, &dims, mnl);
        let mut work = ScalingWorkspace::new(&dims);
        let x = random_unpacked(&mut rng, &dims, mnl);
        let y = random_unpacked(&mut rng, &dims, mnl);

        for inverse in [false, true] {
            let mut Wx = x.clone();
            W.scale(&mut Wx, &dims, mnl, MatrixShape::N, inverse, &mut work)
                .unwrap();
            let mut Wty = y.clone();
            W.scale(&mut Wty, &dims, mnl, MatrixShape::T, inverse, &mut work)
                .unwrap();
            assert!((Wx.dot(&y) - x.dot(&Wty)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scaling_check_dims() {
        let dims = dims();
        let W = NTScaling::<f64>::identity(&dims, 2);
        let mut work = ScalingWorkspace::new(&dims);

        assert_eq!(
            W.check_dims(&dims, 1),
            Err(DimensionError::VectorLength {
                name: "dnl",
                expected: 1,
                found: 2
            })
        );

        let other = ConeDims::new(3, vec![1, 3], vec![1, 2, 3]).unwrap();
        assert!(matches!(
            W.check_dims(&other, 2),
            Err(DimensionError::ScalingBlocks { name: "v", .. })
        ));

        let other = ConeDims::new(3, vec![1, 3, 4], vec![1, 2, 2]).unwrap();
        assert!(matches!(
            W.check_dims(&other, 2),
            Err(DimensionError::MatrixSize { name: "r", .. })
        ));

        let mut x = vec![0.; 3];
        assert!(matches!(
            W.scale(&mut x, &dims, 2, MatrixShape::N, false, &mut work),
            Err(DimensionError::VectorLength { name: "x", .. })
        ));

        // workspace built for a smaller descriptor
        let small = ConeDims::new(0, vec![], vec![1]).unwrap();
        let mut small_work = ScalingWorkspace::new(&small);
        let mut x = vec![0.; 2 + dims.numel_unpacked()];
        assert!(matches!(
            W.scale(&mut x, &dims, 2, MatrixShape::N, false, &mut small_work),
            Err(DimensionError::MatrixSize { name: "work", .. })
        ));
    }
}
