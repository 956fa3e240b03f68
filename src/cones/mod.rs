//! Cone descriptors and conversions between the packed and unpacked
//! layouts of vectors in a product cone.
//!
//! A product cone is described by a [`ConeDims`]: a nonnegative orthant of
//! dimension `l`, a list of second order cones and a list of positive
//! semidefinite cones.  Vectors in the cone are stored in one of two layouts.
//! In the _unpacked_ layout every semidefinite block of order `k` occupies
//! `k²` entries holding the full matrix in column major order.  In the
//! _packed_ layout only the lower triangle is stored, column by column, with
//! strictly off diagonal entries scaled by `√2` so that inner products of
//! packed vectors match Frobenius inner products of the matrices.

mod dims;
pub use dims::*;
mod packing;
pub use packing::*;
