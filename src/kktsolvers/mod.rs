//! Dense LDL solver for the KKT systems of a conic interior point method.
//!
//! See [`DenseLDLKKTSolver`] for the system that is assembled and solved.

use crate::algebra::{DenseFactorizationError, DimensionError};
use thiserror::Error;

mod dense_ldl;
pub use dense_ldl::*;
mod settings;
pub use settings::*;

/// Error type returned by the KKT solver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KKTError {
    /// An operand does not match the problem dimensions
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// The LDL factorization returned a nonzero status
    #[error("LDL factorization failed (info = {0})")]
    Factorization(i32),
    /// A solve produced a result containing Infs or NaNs
    #[error("KKT solve produced a non-finite result")]
    NonFiniteSolution,
    /// A factorization token from an earlier call to `factor` was used
    #[error("stale factorization (token generation {token}, current generation {current})")]
    StaleFactorization { token: u64, current: u64 },
    /// A factorization token issued by a different solver was used
    #[error("factorization was issued by a different KKT solver")]
    ForeignFactorization,
    /// No usable factorization is held by the solver
    #[error("no valid KKT factorization is available")]
    NotFactored,
    /// Invalid solver settings
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl KKTError {
    /// true for failures of the numerical factorization or solve,
    /// as opposed to misuse of the solver
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            KKTError::Factorization(_) | KKTError::NonFiniteSolution
        )
    }
}

impl From<DenseFactorizationError> for KKTError {
    fn from(e: DenseFactorizationError) -> Self {
        match e {
            DenseFactorizationError::LDL(info) => KKTError::Factorization(info),
            // LAPACK convention for an illegal argument
            DenseFactorizationError::IncompatibleDimension => KKTError::Factorization(-1),
        }
    }
}
