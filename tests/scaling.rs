#![allow(non_snake_case)]

mod common;
use common::*;

use conekkt::algebra::*;
use conekkt::cones::*;
use conekkt::scaling::*;
use float_eq::assert_float_eq;
use rand::Rng;

// a scaling with random, well conditioned blocks
fn random_scaling(rng: &mut rand_xoshiro::Xoshiro256StarStar, dims: &ConeDims, mnl: usize) -> NTScaling<f64> {
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

    // upper triangular r, so that rti = r^{-T} is lower triangular
    // and both are easy to write down for k <= 2
    let mut r = vec![];
    let mut rti = vec![];
    for &k in dims.s() {
        assert!(k <= 2);
        let mut R = Matrix::identity(k);
        let mut Rti = Matrix::identity(k);
        for i in 0..k {
            R[(i, i)] = rng.gen_range(1.0..2.0);
            Rti[(i, i)] = 1. / R[(i, i)];
        }
        if k == 2 {
            R[(0, 1)] = rng.gen_range(-0.5..0.5);
            Rti[(1, 0)] = -R[(0, 1)] / (R[(0, 0)] * R[(1, 1)]);
        }
        r.push(R);
        rti.push(Rti);
    }
    NTScaling::new(dnl, d, v, beta, r, rti)
}

fn packed_dot(x: &[f64], y: &[f64], dims: &ConeDims, mnl: usize) -> f64 {
    let np = mnl + dims.numel_packed();
    let (mut xp, mut yp) = (vec![0.; np], vec![0.; np]);
    pack(x, &mut xp, dims, mnl, 0).unwrap();
    pack(y, &mut yp, dims, mnl, 0).unwrap();
    xp.dot(&yp)
}

#[test]
fn test_scaling_inverse() {
    let mut rng = rng(21);
    let dims = ConeDims::new(2, vec![1, 3], vec![1, 2]).unwrap();
    let mnl = 2;
    let W = random_scaling(&mut rng, &dims, mnl);
    let mut work = ScalingWorkspace::new(&dims);

    for trans in [MatrixShape::N, MatrixShape::T] {
        let x = random_unpacked(&mut rng, &dims, mnl);
        let mut y = x.clone();
        W.scale(&mut y, &dims, mnl, trans, false, &mut work).unwrap();
        W.scale(&mut y, &dims, mnl, trans, true, &mut work).unwrap();
        assert_float_eq!(y, x, abs_all <= 1e-12);
    }
}

#[test]
fn test_scaling_transpose() {
    // <W x, y> = <x, W' y> in the packed inner product
    let mut rng = rng(22);
    let dims = ConeDims::new(1, vec![4], vec![2]).unwrap();
    let W = random_scaling(&mut rng, &dims, 0);
    let mut work = ScalingWorkspace::new(&dims);

    for inverse in [false, true] {
        let x = random_unpacked(&mut rng, &dims, 0);
        let y = random_unpacked(&mut rng, &dims, 0);
        let (mut Wx, mut Wty) = (x.clone(), y.clone());
        W.scale(&mut Wx, &dims, 0, MatrixShape::N, inverse, &mut work).unwrap();
        W.scale(&mut Wty, &dims, 0, MatrixShape::T, inverse, &mut work).unwrap();

        assert_float_eq!(
            packed_dot(&Wx, &y, &dims, 0),
            packed_dot(&x, &Wty, &dims, 0),
            abs <= 1e-12
        );
    }
}

#[test]
fn test_scaling_identity() {
    let dims = ConeDims::new(2, vec![3], vec![2]).unwrap();
    let W = NTScaling::identity(&dims, 1);
    let mut work = ScalingWorkspace::new(&dims);
    let x = vec![1., 2., 3., 4., 5., 6., 7., 8., 8., 9.];
    let mut y = x.clone();
    W.scale(&mut y, &dims, 1, MatrixShape::T, true, &mut work).unwrap();
    assert_eq!(y, x);
}
