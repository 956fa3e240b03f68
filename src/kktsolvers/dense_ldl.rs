#![allow(non_snake_case)]

use super::{DenseKKTSettings, KKTError};
use crate::algebra::*;
use crate::cones::{pack, unpack, ConeDims};
use crate::scaling::{NTScaling, ScalingWorkspace};
use std::sync::atomic::{AtomicU64, Ordering};

// source of solver instance ids, so that a handle can only
// be used with the solver that issued it
static NEXT_SOLVER_ID: AtomicU64 = AtomicU64::new(0);

// -------------------------------------
// KKTSolver using a dense LDL factorisation
// -------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FactorState {
    Unfactored,
    Factored,
    Failed,
}

/// Handle to the factorization produced by one call to
/// [`DenseLDLKKTSolver::factor`].
///
/// The handle borrows the scaling used to build the factorization, so every
/// solve against it uses the same `W`.  It becomes stale once `factor` is
/// called again, and solves with a stale handle are rejected.  Handles are
/// only accepted by the solver instance that issued them.
#[derive(Debug, Clone, Copy)]
pub struct KKTFactorization<'w, T> {
    solver_id: u64,
    generation: u64,
    W: &'w NTScaling<T>,
}

impl<'w, T> KKTFactorization<'w, T> {
    /// generation of the solver at the time of factorization
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// the scaling the factorization was built with
    pub fn scaling(&self) -> &'w NTScaling<T> {
        self.W
    }
}

/// Dense LDL solver for the KKT system
///
/// ```text
/// [ H     A'   GG'    ]   [ ux ]   [ bx ]
/// [ A     0    0      ] * [ uy ] = [ by ],      GG = [Df; G]
/// [ GG    0   -W'*W   ]   [ uz ]   [ bz ]
/// ```
///
/// The system is solved through its symmetric equivalent
///
/// ```text
/// [ H           A'   GG'*W^{-1} ]   [ ux   ]   [ bx        ]
/// [ A           0    0          ] * [ uy   ] = [ by        ]
/// [ W^{-T}*GG   0   -I          ]   [ W*uz ]   [ W^{-T}*bz ]
/// ```
///
/// with the last block row in packed layout, so that the dense matrix
/// `K` has order `n + p + mnl + Npacked`.  Only the lower triangle of `K`
/// is assembled.
///
/// All storage is allocated by [`new`](DenseLDLKKTSolver::new).
/// [`factor`](DenseLDLKKTSolver::factor) and
/// [`solve`](DenseLDLKKTSolver::solve) do not allocate.
pub struct DenseLDLKKTSolver<T: FloatT = f64> {
    // problem dimensions
    n: usize,
    p: usize,
    mnl: usize,
    dims: ConeDims,

    // problem data, fixed at construction
    A: Matrix<T>,
    G: Matrix<T>,

    settings: DenseKKTSettings<T>,

    // KKT matrix, factored in place, and an
    // unfactored copy for iterative refinement
    K: Matrix<T>,
    Kcopy: Matrix<T>,

    // the dense LDL engine and its pivots
    ldlsolver: LDLEngine<T>,

    // right hand side / solution of the packed system
    u: Vec<T>,
    // column of [Df; G] in unpacked layout
    g: Vec<T>,

    // internal workspace for IR scheme
    b: Vec<T>,
    work1: Vec<T>,
    work2: Vec<T>,

    scaling_work: ScalingWorkspace<T>,

    id: u64,
    generation: u64,
    state: FactorState,
}

impl<T> DenseLDLKKTSolver<T>
where
    T: FloatT,
{
    /// Creates a solver for the fixed data `G` (`Nunpacked × n`) and
    /// `A` (`p × n`), with `mnl` nonlinear constraints.
    pub fn new(
        G: &Matrix<T>,
        dims: &ConeDims,
        A: &Matrix<T>,
        mnl: usize,
        settings: DenseKKTSettings<T>,
    ) -> Result<Self, KKTError> {
        settings.validate()?;
        let backend = settings.ldl_backend()?;

        let n = G.ncols();
        let nunpacked = dims.numel_unpacked();
        check_size("G", G, (nunpacked, n))?;
        let p = A.nrows();
        check_size("A", A, (p, n))?;

        let ldK = n + p + mnl + dims.numel_packed();

        // LHS/RHS/work for iterative refinement
        let nrefine = if settings.iterative_refinement_enable {
            ldK
        } else {
            0
        };

        log::debug!(
            "KKT solver: n = {}, p = {}, mnl = {}, ldK = {}, backend = {:?}",
            n,
            p,
            mnl,
            ldK,
            backend
        );

        Ok(Self {
            n,
            p,
            mnl,
            dims: dims.clone(),
            A: A.clone(),
            G: G.clone(),
            settings,
            K: Matrix::zeros((ldK, ldK)),
            Kcopy: Matrix::zeros((nrefine, nrefine)),
            ldlsolver: LDLEngine::new(ldK, backend),
            u: vec![T::zero(); ldK],
            g: vec![T::zero(); mnl + nunpacked],
            b: vec![T::zero(); nrefine],
            work1: vec![T::zero(); nrefine],
            work2: vec![T::zero(); nrefine],
            scaling_work: ScalingWorkspace::new(dims),
            id: NEXT_SOLVER_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            state: FactorState::Unfactored,
        })
    }

    /// order of the dense KKT matrix, `n + p + mnl + Npacked`
    pub fn ldK(&self) -> usize {
        self.K.nrows()
    }

    /// the cone descriptor
    pub fn dims(&self) -> &ConeDims {
        &self.dims
    }

    /// number of variables `n`
    pub fn nvars(&self) -> usize {
        self.n
    }

    /// number of equality constraints `p`
    pub fn neq(&self) -> usize {
        self.p
    }

    /// number of nonlinear constraints
    pub fn mnl(&self) -> usize {
        self.mnl
    }

    pub fn settings(&self) -> &DenseKKTSettings<T> {
        &self.settings
    }

    /// number of calls to `factor` so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// true if the solver holds a usable factorization
    pub fn is_factored(&self) -> bool {
        self.state == FactorState::Factored
    }

    /// inertia of the current factorization, if there is one
    pub fn inertia(&self) -> Option<Inertia> {
        if self.is_factored() {
            Some(self.ldlsolver.inertia(&self.K))
        } else {
            None
        }
    }

    /// Assembles and factors the KKT matrix for the scaling `W`, the
    /// Hessian block `H` (`n × n`, or `None` for a zero block) and the
    /// nonlinear constraint Jacobian `Df` (`mnl × n`, may be `None` when
    /// `mnl = 0`).
    ///
    /// Dimension errors are reported before anything is modified, and
    /// leave the current factorization intact.  Otherwise every earlier
    /// factorization handle is invalidated, even if the factorization
    /// itself fails.
    pub fn factor<'w>(
        &mut self,
        W: &'w NTScaling<T>,
        H: Option<&Matrix<T>>,
        Df: Option<&Matrix<T>>,
    ) -> Result<KKTFactorization<'w, T>, KKTError> {
        self.check_factor_inputs(W, H, Df)?;

        self.generation += 1;
        self.state = FactorState::Failed;

        let (n, p, mnl) = (self.n, self.p, self.mnl);
        let m = mnl + self.dims.numel_packed();

        log::debug!(
            "factor: generation {}, ldK = {}",
            self.generation,
            self.ldK()
        );

        let K = &mut self.K;
        K.data_mut().set(T::zero());

        if let Some(H) = H {
            K.set_submatrix(0, 0, H);
        }
        K.set_submatrix(n, 0, &self.A);

        // columns of W^{-T}[Df; G], packed below the first n + p rows
        let g = &mut self.g;
        for k in 0..n {
            if let Some(Df) = Df {
                for (i, gi) in g[..mnl].iter_mut().enumerate() {
                    *gi = Df[(i, k)];
                }
            }
            g[mnl..].copy_from(self.G.col_slice(k));

            W.scale(
                g,
                &self.dims,
                mnl,
                MatrixShape::T,
                true,
                &mut self.scaling_work,
            )?;
            pack(g, K.col_slice_mut(k), &self.dims, mnl, n + p)?;
        }

        // trailing -I block
        K.fill_block((n + p, n + p), (m, m), T::zero());
        K.set_block_diagonal(n + p, m, -T::one());

        if self.settings.iterative_refinement_enable {
            self.Kcopy.copy_from_slice(K.data());
        }

        if let Err(e) = self.ldlsolver.factor(K) {
            log::warn!("KKT factorization failed: {}", e);
            return Err(e.into());
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("factor: inertia {:?}", self.ldlsolver.inertia(&self.K));
        }

        self.state = FactorState::Factored;
        Ok(KKTFactorization {
            solver_id: self.id,
            generation: self.generation,
            W,
        })
    }

    /// Solves the KKT system in place against the factorization `fact`.
    ///
    /// On entry `bx`, `by` and `bz` hold the right hand side, with `bz` in
    /// unpacked layout.  On exit they hold `ux`, `uy` and `W*uz`.
    ///
    /// Stale or foreign handles and length mismatches are rejected before
    /// any data is touched.  The right hand side is only overwritten on
    /// success.  A non-finite result marks the factorization as failed.
    pub fn solve(
        &mut self,
        fact: &KKTFactorization<'_, T>,
        bx: &mut [T],
        by: &mut [T],
        bz: &mut [T],
    ) -> Result<(), KKTError> {
        if fact.solver_id != self.id {
            log::warn!("solve: factorization was issued by another solver");
            return Err(KKTError::ForeignFactorization);
        }
        if fact.generation != self.generation {
            log::warn!(
                "solve: stale factorization (generation {} of {})",
                fact.generation,
                self.generation
            );
            return Err(KKTError::StaleFactorization {
                token: fact.generation,
                current: self.generation,
            });
        }
        if self.state != FactorState::Factored {
            return Err(KKTError::NotFactored);
        }

        let (n, p, mnl) = (self.n, self.p, self.mnl);
        check_length("bx", bx, n)?;
        check_length("by", by, p)?;
        check_length("bz", bz, mnl + self.dims.numel_unpacked())?;

        log::debug!("solve: generation {}", self.generation);

        let u = &mut self.u;
        u[..n].copy_from(bx);
        u[n..n + p].copy_from(by);

        // W^{-T}bz, scaled in the workspace so that bz is untouched on failure
        let g = &mut self.g;
        g.copy_from(bz);
        fact.W.scale(
            g,
            &self.dims,
            mnl,
            MatrixShape::T,
            true,
            &mut self.scaling_work,
        )?;
        pack(g, u, &self.dims, mnl, n + p)?;

        if self.settings.iterative_refinement_enable {
            self.b.copy_from(u);
        }

        self.ldlsolver.solve(&self.K, u);

        let is_success = {
            if self.settings.iterative_refinement_enable {
                self.iterative_refinement()
            } else {
                !self.settings.check_finite || self.u.is_finite()
            }
        };

        if !is_success {
            log::warn!("KKT solve produced a non-finite result");
            self.state = FactorState::Failed;
            return Err(KKTError::NonFiniteSolution);
        }

        let u = &self.u;
        bx.copy_from(&u[..n]);
        by.copy_from(&u[n..n + p]);
        unpack(u, bz, &self.dims, mnl, n + p)?;

        Ok(())
    }

    fn check_factor_inputs(
        &self,
        W: &NTScaling<T>,
        H: Option<&Matrix<T>>,
        Df: Option<&Matrix<T>>,
    ) -> Result<(), DimensionError> {
        let (n, mnl) = (self.n, self.mnl);

        if let Some(H) = H {
            check_size("H", H, (n, n))?;
        }
        match Df {
            Some(Df) => check_size("Df", Df, (mnl, n))?,
            None if mnl > 0 => {
                return Err(DimensionError::MatrixSize {
                    name: "Df",
                    expected: (mnl, n),
                    found: (0, 0),
                })
            }
            None => {}
        }
        W.check_dims(&self.dims, mnl)
    }

    // refines the solution held in self.u against the right hand side
    // self.b, using the unfactored copy of K.  Returns false if the
    // result is not finite.
    fn iterative_refinement(&mut self) -> bool {
        let (x, b) = (&mut self.u, &self.b);
        let (e, dx) = (&mut self.work1, &mut self.work2);
        let settings = &self.settings;

        // iterative refinement params
        let reltol = settings.iterative_refinement_reltol;
        let abstol = settings.iterative_refinement_abstol;
        let maxiter = settings.iterative_refinement_max_iter;
        let stopratio = settings.iterative_refinement_stop_ratio;

        let K = &self.Kcopy;
        let normb = b.norm_inf();

        //compute the initial error
        let mut norme = _get_refine_error(e, b, K, x);

        for i in 0..maxiter {
            // bail on numerical error
            if !norme.is_finite() {
                return false;
            }

            if norme <= (abstol + reltol * normb) {
                //within tolerance.  Exit
                log::trace!("refinement: converged after {} steps", i);
                break;
            }

            let lastnorme = norme;

            //make a refinement
            dx.copy_from(e);
            self.ldlsolver.solve(&self.K, dx);

            //prospective solution is x + dx.  Use dx space to
            // hold it for a check before applying to x
            dx.axpby(T::one(), x, T::one()); //now dx is really x + dx
            norme = _get_refine_error(e, b, K, dx);

            let improved_ratio = lastnorme / norme;
            if improved_ratio < stopratio {
                //insufficient improvement.  Exit
                if improved_ratio > T::one() {
                    x.copy_from(dx);
                }
                break;
            } else {
                x.copy_from(dx);
            }
        }
        x.is_finite()
    }
}

//  computes e = b - Kξ, overwriting the first argument
//  and returning its norm

fn _get_refine_error<T: FloatT>(e: &mut [T], b: &[T], K: &Matrix<T>, ξ: &[T]) -> T {
    // Note that K is only tril data, so need to
    // be careful when computing the residual here
    e.copy_from(b);
    K.sym(MatrixTriangle::Tril).symv(ξ, e, -T::one(), T::one()); //#  e = b - Kξ

    e.norm_inf()
}

fn check_length<T>(name: &'static str, v: &[T], expected: usize) -> Result<(), DimensionError> {
    if v.len() != expected {
        return Err(DimensionError::VectorLength {
            name,
            expected,
            found: v.len(),
        });
    }
    Ok(())
}

fn check_size<T>(
    name: &'static str,
    M: &Matrix<T>,
    expected: (usize, usize),
) -> Result<(), DimensionError> {
    if M.size() != expected {
        return Err(DimensionError::MatrixSize {
            name,
            expected,
            found: M.size(),
        });
    }
    Ok(())
}
