#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(clippy::too_many_arguments)]

// standard imports via blas-lapack-rs crates
extern crate blas_src;
extern crate lapack_src;
use lapack::*;

pub trait BlasFloatT:
    private::BlasFloatSealed
    + XsytrfScalar
    + XsytrsScalar
{}

impl BlasFloatT for f32 {}
impl BlasFloatT for f64 {}

mod private {
    pub trait BlasFloatSealed {}
    impl BlasFloatSealed for f32 {}
    impl BlasFloatSealed for f64 {}
}

// --------------------------------------
// ?sytrf : Bunch-Kaufman LDL' factorization
// --------------------------------------

pub trait XsytrfScalar: Sized {
    fn xsytrf(
        uplo: u8, n: i32, a: &mut [Self], lda: i32, ipiv: &mut [i32],
        work: &mut [Self], lwork: i32, info: &mut i32,
    );
}

macro_rules! impl_blas_xsytrf {
    ($T:ty, $XSYTRF:path) => {
        impl XsytrfScalar for $T {
            fn xsytrf(
                uplo: u8, n: i32, a: &mut [Self], lda: i32, ipiv: &mut [i32],
                work: &mut [Self], lwork: i32, info: &mut i32,
            ) {
                unsafe {
                    $XSYTRF(uplo, n, a, lda, ipiv, work, lwork, info);
                }
            }
        }
    };
}
impl_blas_xsytrf!(f32, ssytrf);
impl_blas_xsytrf!(f64, dsytrf);

// --------------------------------------
// ?sytrs : solve using a ?sytrf factorization
// --------------------------------------

pub trait XsytrsScalar: Sized {
    fn xsytrs(
        uplo: u8, n: i32, nrhs: i32, a: &[Self], lda: i32, ipiv: &[i32],
        b: &mut [Self], ldb: i32, info: &mut i32,
    );
}

macro_rules! impl_blas_xsytrs {
    ($T:ty, $XSYTRS:path) => {
        impl XsytrsScalar for $T {
            fn xsytrs(
                uplo: u8, n: i32, nrhs: i32, a: &[Self], lda: i32, ipiv: &[i32],
                b: &mut [Self], ldb: i32, info: &mut i32,
            ) {
                unsafe {
                    $XSYTRS(uplo, n, nrhs, a, lda, ipiv, b, ldb, info);
                }
            }
        }
    };
}
impl_blas_xsytrs!(f32, ssytrs);
impl_blas_xsytrs!(f64, dsytrs);
