#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

#[cfg(feature = "lapack")]
use crate::algebra::dense::BlasFloatT;

/// Bounds every scalar type must meet, independent of the LDL backend.
/// Use [`FloatT`] in generic code.
pub trait CoreFloatT:
    'static
    + Send
    + Sync
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

// ?sytrf / ?sytrs exist for f32 and f64 only

cfg_if::cfg_if! {
    if #[cfg(not(feature="lapack"))] {
    /// Scalar type of all matrices, scalings and KKT solves.
    ///
    /// Any type meeting [`CoreFloatT`] qualifies.  With the "lapack"
    /// feature only f32 and f64 do.
        pub trait FloatT: CoreFloatT {}
    } else{
        /// Scalar type of all matrices, scalings and KKT solves,
        /// restricted to f32 and f64 by the LAPACK backend.
        pub trait FloatT: CoreFloatT + BlasFloatT {}
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature="lapack")] {
        impl<T> FloatT for T where T: CoreFloatT + BlasFloatT {}
    } else{
        impl<T> FloatT for T where T: CoreFloatT {}
    }
}

/// Conversion of numeric constants to [`FloatT`], e.g. `(1e-13).as_T()`
/// in the [settings](crate::kktsolvers::DenseKKTSettings) defaults.
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
