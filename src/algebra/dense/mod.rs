mod types;
pub use self::types::*;
mod core;

// native matrix products
mod gemm;
mod symv;

// symmetric indefinite factorization
mod ldl;
pub use self::ldl::*;

#[cfg(feature = "lapack")]
mod blas;
#[cfg(feature = "lapack")]
pub use self::blas::*;
