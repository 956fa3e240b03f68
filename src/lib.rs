//! __conekkt__ assembles and solves the dense KKT systems that arise at each
//! iteration of a primal-dual interior point method for conic problems with
//! optional nonlinear constraints.
//!
//! Each iteration solves
//!
//! $$
//! \begin{bmatrix} H & A^T & G^T \\\\ A & 0 & 0 \\\\ G & 0 & -W^TW \end{bmatrix}
//! \begin{bmatrix} u_x \\\\ u_y \\\\ u_z \end{bmatrix} =
//! \begin{bmatrix} b_x \\\\ b_y \\\\ b_z \end{bmatrix}
//! $$
//!
//! where $W$ is the Nesterov-Todd scaling of the current iterate and $G$
//! stacks the nonlinear constraint Jacobian on top of the conic constraint
//! matrix.  The cone $\mathcal{K}$ is a product of a nonnegative orthant,
//! second order cones and positive semidefinite cones.
//!
//! The crate is organised as
//!
//! * [`algebra`]: dense column major matrices, vector math and a
//!   Bunch-Kaufman LDL factorization, with an optional LAPACK backend.
//! * [`cones`]: the cone descriptor [`ConeDims`](cones::ConeDims), and
//!   conversions between the unpacked and packed layouts of
//!   semidefinite blocks.
//! * [`scaling`]: application of the scaling $W$ and its inverse and
//!   transpose, block by block.
//! * [`kktsolvers`]: the dense LDL KKT solver.
//!
//! # Example
//!
//! ```
//! use conekkt::algebra::*;
//! use conekkt::cones::ConeDims;
//! use conekkt::kktsolvers::*;
//! use conekkt::scaling::NTScaling;
//!
//! // x ≥ 0 in two variables, no equalities
//! let dims = ConeDims::new(2, vec![], vec![]).unwrap();
//! let G = Matrix::<f64>::identity(2);
//! let A = Matrix::<f64>::zeros((0, 2));
//!
//! let mut kkt = DenseLDLKKTSolver::new(&G, &dims, &A, 0, DenseKKTSettings::default()).unwrap();
//! let W = NTScaling::identity(&dims, 0);
//! let fact = kkt.factor(&W, None, None).unwrap();
//!
//! let (mut bx, mut by, mut bz) = (vec![1., 2.], vec![], vec![3., 5.]);
//! kkt.solve(&fact, &mut bx, &mut by, &mut bz).unwrap();
//! assert!((bx[0] - 4.).abs() < 1e-12 && (bz[1] - 2.).abs() < 1e-12);
//! ```
//!
//! # Features
//!
//! * `serde`: serialization of [`ConeDims`](cones::ConeDims) and
//!   [`DenseKKTSettings`](kktsolvers::DenseKKTSettings).
//! * `lapack`: factor and solve through LAPACK `?sytrf` / `?sytrs`.  Use
//!   one of `lapack-openblas`, `lapack-netlib`, `lapack-mkl` or
//!   `lapack-accelerate` to select a provider.

//Rust hates greek characters
#![allow(confusable_idents)]

pub mod algebra;
pub mod cones;
pub mod kktsolvers;
pub mod scaling;
