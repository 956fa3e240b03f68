#![allow(non_snake_case)]

use crate::algebra::*;

/// Available implementations of the symmetric indefinite factorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LDLBackend {
    /// Bunch-Kaufman factorization implemented in Rust
    Native,
    /// LAPACK ?sytrf / ?sytrs
    #[cfg(feature = "lapack")]
    Lapack,
}

impl Default for LDLBackend {
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature="lapack")] {
                LDLBackend::Lapack
            } else {
                LDLBackend::Native
            }
        }
    }
}

/// Counts of positive, negative and zero eigenvalues of the
/// block diagonal factor of an LDL' decomposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inertia {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

/// Bunch-Kaufman LDL' factorization of a dense symmetric matrix.
///
/// The factorization is computed in place from the lower triangle of
/// the matrix passed to [`factor`](LDLEngine::factor).  The strict upper
/// triangle is never read or written.  On success the lower triangle holds
/// the unit lower triangular factor L and the block diagonal D, and the
/// pivot record `ipiv` follows the LAPACK `?sytrf` convention: entries are
/// 1-based, and a pair of equal negative entries marks a 2x2 block of D.
///
/// The same matrix must then be passed unchanged to [`solve`](LDLEngine::solve).
pub struct LDLEngine<T> {
    /// pivot record in LAPACK convention
    pub ipiv: Vec<i32>,
    backend: LDLBackend,
    // LAPACK workspace, unused by the native backend
    #[cfg_attr(not(feature = "lapack"), allow(dead_code))]
    work: Vec<T>,
}

impl<T> LDLEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize, backend: LDLBackend) -> Self {
        let ipiv = vec![0; n];
        let work = match backend {
            LDLBackend::Native => vec![],
            #[cfg(feature = "lapack")]
            LDLBackend::Lapack => Self::lapack_workspace(n),
        };
        Self {
            ipiv,
            backend,
            work,
        }
    }

    pub fn backend(&self) -> LDLBackend {
        self.backend
    }

    pub fn dim(&self) -> usize {
        self.ipiv.len()
    }

    /// Factors `A` in place.  A nonzero LAPACK style status `k` is
    /// returned as an error when `D(k,k)` is exactly zero.  The
    /// factorization is still completed in that case, but it can
    /// not be used to solve.
    pub fn factor(&mut self, A: &mut Matrix<T>) -> Result<(), DenseFactorizationError> {
        if !A.is_square() || A.nrows() != self.dim() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let info = match self.backend {
            LDLBackend::Native => sytf2_lower(A, &mut self.ipiv),
            #[cfg(feature = "lapack")]
            LDLBackend::Lapack => self.lapack_sytrf(A),
        };

        if info != 0 {
            return Err(DenseFactorizationError::LDL(info));
        }
        Ok(())
    }

    /// Solves `Ax = b` in place, where `A` holds the output of a
    /// successful call to [`factor`](LDLEngine::factor).
    pub fn solve(&self, A: &Matrix<T>, b: &mut [T]) {
        assert!(A.nrows() == self.dim() && b.len() == self.dim());

        match self.backend {
            LDLBackend::Native => sytrs_lower(A, &self.ipiv, b),
            #[cfg(feature = "lapack")]
            LDLBackend::Lapack => self.lapack_sytrs(A, b),
        }
    }

    /// Inertia of the block diagonal factor D held in `A`
    pub fn inertia(&self, A: &Matrix<T>) -> Inertia {
        let n = self.dim();
        let mut inertia = Inertia::default();

        let count = |x: T, inertia: &mut Inertia| {
            if x > T::zero() {
                inertia.positive += 1;
            } else if x < T::zero() {
                inertia.negative += 1;
            } else {
                inertia.zero += 1;
            }
        };

        let mut k = 0;
        while k < n {
            if self.ipiv[k] > 0 {
                count(A[(k, k)], &mut inertia);
                k += 1;
            } else {
                let (a, b, c) = (A[(k, k)], A[(k + 1, k)], A[(k + 1, k + 1)]);
                let det = a * c - b * b;
                if det < T::zero() {
                    inertia.positive += 1;
                    inertia.negative += 1;
                } else if det > T::zero() {
                    count(a + c, &mut inertia);
                    count(a + c, &mut inertia);
                } else {
                    inertia.zero += 1;
                    count(a + c, &mut inertia);
                }
                k += 2;
            }
        }
        inertia
    }
}

#[cfg(feature = "lapack")]
impl<T> LDLEngine<T>
where
    T: FloatT,
{
    fn lapack_workspace(n: usize) -> Vec<T> {
        if n == 0 {
            return vec![];
        }
        // standard LAPACK workspace query
        let uplo = MatrixTriangle::Tril.as_blas_char();
        let mut a = [T::zero()];
        let mut ipiv = [0_i32];
        let mut work = [T::zero()];
        let info = &mut 0_i32;
        let n32 = n as i32;
        T::xsytrf(uplo, n32, &mut a, n32, &mut ipiv, &mut work, -1, info);

        let lwork = work[0].to_usize().unwrap_or(n).max(1);
        vec![T::zero(); lwork]
    }

    fn lapack_sytrf(&mut self, A: &mut Matrix<T>) -> i32 {
        let n = A.nrows();
        if n == 0 {
            return 0;
        }
        let uplo = MatrixTriangle::Tril.as_blas_char();
        let n = n as i32;
        let lwork = self.work.len() as i32;
        let info = &mut 0_i32;
        T::xsytrf(
            uplo,
            n,
            A.data_mut(),
            n,
            &mut self.ipiv,
            &mut self.work,
            lwork,
            info,
        );
        *info
    }

    fn lapack_sytrs(&self, A: &Matrix<T>, b: &mut [T]) {
        let n = A.nrows();
        if n == 0 {
            return;
        }
        let uplo = MatrixTriangle::Tril.as_blas_char();
        let n = n as i32;
        let info = &mut 0_i32;
        T::xsytrs(uplo, n, 1, A.data(), n, &self.ipiv, b, n, info);
        debug_assert_eq!(*info, 0);
    }
}

// ---------------------------------------------------------------------
// native Bunch-Kaufman kernels, lower triangle storage.
// Indices are 0-based internally and the pivot record is written
// 1-based so that both backends share one convention.

fn sytf2_lower<T: FloatT>(A: &mut Matrix<T>, ipiv: &mut [i32]) -> i32 {
    let n = A.nrows();
    let a = &mut A.data;
    let at = |i: usize, j: usize| i + j * n;

    let seventeen: T = (17.).as_T();
    let alpha = (T::one() + seventeen.sqrt()) / (8.).as_T();

    let mut info = 0;
    let mut k = 0;

    while k < n {
        let mut kstep = 1;
        let absakk = a[at(k, k)].abs();

        // largest off diagonal entry in column k
        let (imax, colmax) = if k + 1 < n {
            iamax(&a[at(k + 1, k)..at(0, k + 1)])
                .map(|(i, v)| (k + 1 + i, v))
                .unwrap_or((k, T::zero()))
        } else {
            (k, T::zero())
        };

        let kp;
        if T::max(absakk, colmax) == T::zero() || absakk.is_nan() {
            // column is zero: record the first such index and move on
            if info == 0 {
                info = (k + 1) as i32;
            }
            kp = k;
        } else {
            if absakk >= alpha * colmax {
                kp = k;
            } else {
                // largest off diagonal entry in row / column imax
                let mut rowmax = T::zero();
                for j in k..imax {
                    rowmax = T::max(rowmax, a[at(imax, j)].abs());
                }
                for i in (imax + 1)..n {
                    rowmax = T::max(rowmax, a[at(i, imax)].abs());
                }

                if absakk >= alpha * colmax * (colmax / rowmax) {
                    kp = k;
                } else if a[at(imax, imax)].abs() >= alpha * rowmax {
                    kp = imax;
                } else {
                    kp = imax;
                    kstep = 2;
                }
            }

            // interchange rows and columns kk and kp in the trailing block
            let kk = k + kstep - 1;
            if kp != kk {
                for i in (kp + 1)..n {
                    a.swap(at(i, kk), at(i, kp));
                }
                for j in (kk + 1)..kp {
                    a.swap(at(j, kk), at(kp, j));
                }
                a.swap(at(kk, kk), at(kp, kp));
                if kstep == 2 {
                    a.swap(at(k + 1, k), at(kp, k));
                }
            }

            if kstep == 1 {
                // rank one update of the trailing block, then
                // store L(k) in column k
                if k + 1 < n {
                    let d11 = T::recip(a[at(k, k)]);
                    for j in (k + 1)..n {
                        let xj = a[at(j, k)];
                        if xj != T::zero() {
                            let f = d11 * xj;
                            for i in j..n {
                                let xi = a[at(i, k)];
                                a[at(i, j)] -= f * xi;
                            }
                        }
                    }
                    for i in (k + 1)..n {
                        a[at(i, k)] *= d11;
                    }
                }
            } else if k + 2 < n {
                // rank two update of the trailing block using the
                // inverse of the 2x2 pivot, then store L(k) and L(k+1)
                let d21 = a[at(k + 1, k)];
                let d11 = a[at(k + 1, k + 1)] / d21;
                let d22 = a[at(k, k)] / d21;
                let t = T::recip(d11 * d22 - T::one());
                let d21 = t / d21;

                for j in (k + 2)..n {
                    let wk = d21 * (d11 * a[at(j, k)] - a[at(j, k + 1)]);
                    let wkp1 = d21 * (d22 * a[at(j, k + 1)] - a[at(j, k)]);
                    for i in j..n {
                        let update = a[at(i, k)] * wk + a[at(i, k + 1)] * wkp1;
                        a[at(i, j)] -= update;
                    }
                    a[at(j, k)] = wk;
                    a[at(j, k + 1)] = wkp1;
                }
            }
        }

        if kstep == 1 {
            ipiv[k] = (kp + 1) as i32;
        } else {
            ipiv[k] = -((kp + 1) as i32);
            ipiv[k + 1] = -((kp + 1) as i32);
        }
        k += kstep;
    }

    info
}

fn sytrs_lower<T: FloatT>(A: &Matrix<T>, ipiv: &[i32], b: &mut [T]) {
    let n = A.nrows();
    let a = &A.data;
    let at = |i: usize, j: usize| i + j * n;

    // solve L*D*y = b
    let mut k = 0;
    while k < n {
        if ipiv[k] > 0 {
            let kp = (ipiv[k] - 1) as usize;
            b.swap(k, kp);

            let bk = b[k];
            for i in (k + 1)..n {
                b[i] -= a[at(i, k)] * bk;
            }
            b[k] /= a[at(k, k)];
            k += 1;
        } else {
            let kp = (-ipiv[k] - 1) as usize;
            b.swap(k + 1, kp);

            let (bk, bkp1) = (b[k], b[k + 1]);
            for i in (k + 2)..n {
                b[i] -= a[at(i, k)] * bk + a[at(i, k + 1)] * bkp1;
            }

            let akm1k = a[at(k + 1, k)];
            let akm1 = a[at(k, k)] / akm1k;
            let ak = a[at(k + 1, k + 1)] / akm1k;
            let denom = akm1 * ak - T::one();
            let bkm1 = b[k] / akm1k;
            let bk = b[k + 1] / akm1k;
            b[k] = (ak * bkm1 - bk) / denom;
            b[k + 1] = (akm1 * bk - bkm1) / denom;
            k += 2;
        }
    }

    // solve L'*x = y
    let mut k = n;
    while k > 0 {
        let kk = k - 1;
        let tail = &a[at(kk + 1, kk)..at(0, kk + 1)];
        let dot = tail.dot(&b[(kk + 1)..]);
        b[kk] -= dot;

        if ipiv[kk] > 0 {
            let kp = (ipiv[kk] - 1) as usize;
            b.swap(kk, kp);
            k -= 1;
        } else {
            let tail = &a[at(kk + 1, kk - 1)..at(0, kk)];
            let dot = tail.dot(&b[(kk + 1)..]);
            b[kk - 1] -= dot;

            let kp = (-ipiv[kk] - 1) as usize;
            b.swap(kk, kp);
            k -= 2;
        }
    }
}

// index and value of the first entry of largest magnitude.  A NaN is
// returned only when it is the first entry, later NaNs never compare greater.
fn iamax<T: FloatT>(x: &[T]) -> Option<(usize, T)> {
    let mut out: Option<(usize, T)> = None;
    for (i, v) in x.iter().map(|v| v.abs()).enumerate() {
        match out {
            Some((_, best)) if !(v > best) => {}
            _ => out = Some((i, v)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256StarStar;

    fn residual(S: &Matrix<f64>, x: &[f64], b: &[f64]) -> f64 {
        let mut r = b.to_vec();
        S.sym(MatrixTriangle::Tril).symv(x, &mut r, 1.0, -1.0);
        r.norm_inf()
    }

    #[test]
    fn test_ldl_2x2_pivot() {
        let mut A = Matrix::from(&[[0., 1.], [1., 0.]]);
        let mut eng = LDLEngine::<f64>::new(2, LDLBackend::Native);
        assert!(eng.factor(&mut A).is_ok());
        assert_eq!(eng.ipiv, vec![-2, -2]);

        let mut b = vec![3., 5.];
        eng.solve(&A, &mut b);
        assert!(b.norm_inf_diff(&[5., 3.]) < 1e-15);

        let inertia = eng.inertia(&A);
        assert_eq!(
            inertia,
            Inertia {
                positive: 1,
                negative: 1,
                zero: 0
            }
        );
    }

    #[test]
    fn test_ldl_indefinite() {
        #[rustfmt::skip]
        let S = Matrix::from(&[
            [1.,  2., 3.],
            [2., -1., 0.],
            [3.,  0., 4.],
        ]);
        let mut A = S.clone();
        let mut eng = LDLEngine::<f64>::new(3, LDLBackend::Native);
        assert!(eng.factor(&mut A).is_ok());

        let mut x = vec![6., 4., 15.];
        eng.solve(&A, &mut x);
        assert!(x.norm_inf_diff(&[1., -2., 3.]) < 1e-12);

        // det = -11, trace = 4
        let inertia = eng.inertia(&A);
        assert_eq!((inertia.positive, inertia.negative, inertia.zero), (2, 1, 0));
    }

    #[test]
    fn test_ldl_upper_triangle_ignored() {
        #[rustfmt::skip]
        let S = Matrix::from(&[
            [4.,  1., -2., 0.],
            [1., -3.,  2., 1.],
            [-2., 2.,  0., 5.],
            [0.,  1.,  5., 1.],
        ]);
        let mut A = S.clone();
        for j in 0..4 {
            for i in 0..j {
                A[(i, j)] = f64::NAN;
            }
        }
        let mut eng = LDLEngine::<f64>::new(4, LDLBackend::Native);
        assert!(eng.factor(&mut A).is_ok());

        let b = vec![1., 2., 3., 4.];
        let mut x = b.clone();
        eng.solve(&A, &mut x);
        assert!(x.is_finite());
        assert!(residual(&S, &x, &b) < 1e-12);

        for j in 0..4 {
            for i in 0..j {
                assert!(A[(i, j)].is_nan());
            }
        }
    }

    #[test]
    fn test_ldl_singular() {
        let mut eng = LDLEngine::<f64>::new(2, LDLBackend::Native);

        let mut A = Matrix::<f64>::zeros((2, 2));
        assert_eq!(eng.factor(&mut A), Err(DenseFactorizationError::LDL(1)));

        let mut A = Matrix::from(&[[1., 1.], [1., 1.]]);
        assert_eq!(eng.factor(&mut A), Err(DenseFactorizationError::LDL(2)));
        assert_eq!(eng.inertia(&A).zero, 1);

        let mut A = Matrix::<f64>::zeros((3, 3));
        assert_eq!(
            eng.factor(&mut A),
            Err(DenseFactorizationError::IncompatibleDimension)
        );
    }

    #[test]
    fn test_ldl_random_quasidefinite() {
        // [P A'; A -I] with P positive definite has exactly
        // n positive and m negative eigenvalues
        let mut rng = Xoshiro256StarStar::seed_from_u64(1234);
        let (n, m) = (8, 5);
        let dim = n + m;

        let mut B = Matrix::<f64>::zeros((n, n));
        B.data_mut()
            .iter_mut()
            .for_each(|x| *x = rng.gen_range(-1.0..1.0));
        let mut P = Matrix::<f64>::identity(n);
        P.mul(&B, &B.t(), 1.0, 1.0);

        let mut S = Matrix::<f64>::zeros((dim, dim));
        S.set_submatrix(0, 0, &P);
        for j in 0..n {
            for i in n..dim {
                S[(i, j)] = rng.gen_range(-1.0..1.0);
                S[(j, i)] = S[(i, j)];
            }
        }
        S.set_block_diagonal(n, m, -1.0);

        let mut A = S.clone();
        let mut eng = LDLEngine::<f64>::new(dim, LDLBackend::Native);
        assert!(eng.factor(&mut A).is_ok());

        let b: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mut x = b.clone();
        eng.solve(&A, &mut x);
        assert!(residual(&S, &x, &b) < 1e-10);

        let inertia = eng.inertia(&A);
        assert_eq!((inertia.positive, inertia.negative, inertia.zero), (n, m, 0));
    }

    #[test]
    fn test_ldl_random_indefinite() {
        // mostly zero diagonal, so some 2x2 pivots are likely
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        let n = 12;
        let mut S = Matrix::<f64>::zeros((n, n));
        for j in 0..n {
            for i in (j + 1)..n {
                S[(i, j)] = rng.gen_range(-1.0..1.0);
                S[(j, i)] = S[(i, j)];
            }
        }
        S[(3, 3)] = 2.0;
        S[(7, 7)] = -0.5;

        let mut A = S.clone();
        let mut eng = LDLEngine::<f64>::new(n, LDLBackend::Native);
        assert!(eng.factor(&mut A).is_ok());

        let b: Vec<f64> = (0..n).map(|i| i as f64 - 3.0).collect();
        let mut x = b.clone();
        eng.solve(&A, &mut x);
        assert!(residual(&S, &x, &b) < 1e-9);

        let inertia = eng.inertia(&A);
        assert_eq!(inertia.positive + inertia.negative, n);
    }

    #[test]
    fn test_ldl_empty() {
        let mut A = Matrix::<f64>::zeros((0, 0));
        let mut eng = LDLEngine::<f64>::new(0, LDLBackend::default());
        assert!(eng.factor(&mut A).is_ok());
        let mut b: Vec<f64> = vec![];
        eng.solve(&A, &mut b);
        assert_eq!(eng.inertia(&A), Inertia::default());
    }
}
