//! Dense linear algebra used by the KKT solver.
//!
//! Everything here is generic over [`FloatT`](crate::algebra::FloatT).  Dense
//! matrices are column major, and factorizations either run natively or,
//! with the `lapack` feature, through LAPACK.

// first import floats and matrix types
mod floats;
pub use floats::*;
mod matrix_types;
pub use matrix_types::*;

// traits and error types
mod error_types;
pub use error_types::*;
mod math_traits;
pub use math_traits::*;

// scalar and vector operations on slices
mod scalarmath;
pub use scalarmath::*;
mod vecmath;

// dense matrices and factorizations
mod dense;
pub use dense::*;
