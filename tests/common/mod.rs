#![allow(non_snake_case)]
#![allow(dead_code)]

use conekkt::algebra::*;
use conekkt::cones::ConeDims;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}

pub fn random_matrix(rng: &mut Xoshiro256StarStar, m: usize, n: usize) -> Matrix<f64> {
    let data: Vec<f64> = (0..m * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Matrix::new_from_slice((m, n), &data)
}

// B'B + I
pub fn random_spd(rng: &mut Xoshiro256StarStar, n: usize) -> Matrix<f64> {
    let B = random_matrix(rng, n, n);
    let mut H = Matrix::identity(n);
    for i in 0..n {
        for j in 0..n {
            H[(i, j)] += B.col_slice(i).dot(B.col_slice(j));
        }
    }
    H
}

// random vector in unpacked layout, with symmetric semidefinite blocks
pub fn random_unpacked(rng: &mut Xoshiro256StarStar, dims: &ConeDims, mnl: usize) -> Vec<f64> {
    let mut x: Vec<f64> = (0..mnl + dims.numel_unpacked())
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect();
    symmetrize(&mut x, dims, mnl);
    x
}

pub fn symmetrize(x: &mut [f64], dims: &ConeDims, mnl: usize) {
    let mut start = mnl + dims.numel_linear();
    for &k in dims.s() {
        for j in 0..k {
            for i in (j + 1)..k {
                x[start + j + i * k] = x[start + i + j * k];
            }
        }
        start += k * k;
    }
}

// y = A*x
pub fn matvec(A: &Matrix<f64>, x: &[f64]) -> Vec<f64> {
    let mut y = vec![0.; A.nrows()];
    for (j, &xj) in x.iter().enumerate() {
        y.axpby(xj, A.col_slice(j), 1.);
    }
    y
}

/// Solves the square system `Mx = b` by Gaussian elimination with
/// partial pivoting.  Used as a reference for the LDL based solves.
pub fn lu_solve(M: &Matrix<f64>, b: &[f64]) -> Vec<f64> {
    let n = M.nrows();
    let mut A = M.clone();
    let mut x = b.to_vec();

    for k in 0..n {
        let (p, _) = (k..n)
            .map(|i| (i, A[(i, k)].abs()))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        assert!(A[(p, k)].abs() > 1e-14, "reference system is singular");
        if p != k {
            for j in 0..n {
                let t = A[(k, j)];
                A[(k, j)] = A[(p, j)];
                A[(p, j)] = t;
            }
            x.swap(k, p);
        }
        for i in (k + 1)..n {
            let l = A[(i, k)] / A[(k, k)];
            for j in k..n {
                let akj = A[(k, j)];
                A[(i, j)] -= l * akj;
            }
            x[i] -= l * x[k];
        }
    }
    for k in (0..n).rev() {
        let mut s = x[k];
        for j in (k + 1)..n {
            s -= A[(k, j)] * x[j];
        }
        x[k] = s / A[(k, k)];
    }
    x
}
