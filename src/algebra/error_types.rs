use thiserror::Error;

/// Error type returned when an operand does not have the shape
/// implied by the problem dimensions or the cone descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    /// A vector has the wrong length
    #[error("vector `{name}` has length {found}, expected {expected}")]
    VectorLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    /// A matrix has the wrong size
    #[error("matrix `{name}` has size {found:?}, expected {expected:?}")]
    MatrixSize {
        name: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A vector is too short to hold a block starting at the given offset
    #[error("vector `{name}` of length {len} cannot hold {needed} entries at offset {offset}")]
    Offset {
        name: &'static str,
        len: usize,
        offset: usize,
        needed: usize,
    },
    /// A cone descriptor entry is invalid
    #[error("invalid cone descriptor: {0}")]
    BadCone(&'static str),
    /// A scaling block does not agree with the cone descriptor
    #[error("scaling `{name}` has {found} blocks, expected {expected}")]
    ScalingBlocks {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Error type returned by dense factorization routines.  Errors
/// return the internal (LAPACK style) status codes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("LDL factorization error (info = {0})")]
    LDL(i32),
}
