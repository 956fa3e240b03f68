use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by settings validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
    /// a factorization backend error of some kind (e.g. not compiled in)
    #[error("Problem with {solver} solver ({problem})")]
    LinearSolverProblem {
        solver: &'static str,
        problem: &'static str,
    },
}

/// Settings for the [`DenseLDLKKTSolver`](crate::kktsolvers::DenseLDLKKTSolver)
///
/// Use [`DenseKKTSettingsBuilder`] to override any of the defaults, e.g.
///
/// ```
/// use conekkt::kktsolvers::DenseKKTSettingsBuilder;
///
/// let settings = DenseKKTSettingsBuilder::<f64>::default()
///     .iterative_refinement_enable(true)
///     .build()
///     .unwrap();
/// assert_eq!(settings.direct_solve_method, "auto");
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DenseKKTSettings<T: FloatT> {
    ///LDL factorization backend ("auto", "native" or "lapack").
    ///"lapack" requires the "lapack" feature
    #[builder(default = r#""auto".to_string()"#)]
    pub direct_solve_method: String,

    ///KKT direct solve with iterative refinement
    #[builder(default = "false")]
    pub iterative_refinement_enable: bool,

    ///iterative refinement relative tolerance
    #[builder(default = "(1e-13).as_T()")]
    pub iterative_refinement_reltol: T,

    ///iterative refinement absolute tolerance
    #[builder(default = "(1e-12).as_T()")]
    pub iterative_refinement_abstol: T,

    ///iterative refinement maximum iterations
    #[builder(default = "10")]
    pub iterative_refinement_max_iter: u32,

    ///iterative refinement stalling tolerance
    #[builder(default = "(5.0).as_T()")]
    pub iterative_refinement_stop_ratio: T,

    ///reject solves that produce Infs or NaNs
    #[builder(default = "true")]
    pub check_finite: bool,
}

impl<T> Default for DenseKKTSettings<T>
where
    T: FloatT,
{
    fn default() -> DenseKKTSettings<T> {
        DenseKKTSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> DenseKKTSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.  This only ensures that fields specified
    /// by strings contain valid options.   It does not sanity check numerical values
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_direct_solve_method(&self.direct_solve_method)
    }

    /// the factorization backend selected by `direct_solve_method`
    pub fn ldl_backend(&self) -> Result<LDLBackend, SettingsError> {
        match self.direct_solve_method.as_str() {
            "auto" => Ok(LDLBackend::default()),
            "native" => Ok(LDLBackend::Native),
            #[cfg(feature = "lapack")]
            "lapack" => Ok(LDLBackend::Lapack),
            #[cfg(not(feature = "lapack"))]
            "lapack" => Err(lapack_unavailable()),
            _ => Err(SettingsError::BadFieldValue("direct_solve_method")),
        }
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DenseKKTSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DenseKKTSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DenseKKTSettingsBuilder<T>
where
    T: FloatT,
{
    /// check that the specified direct_solve_method is valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref direct_solve_method) = self.direct_solve_method {
            validate_direct_solve_method(direct_solve_method)?;
        }
        Ok(())
    }
}

fn validate_direct_solve_method(direct_solve_method: &str) -> Result<(), SettingsError> {
    match direct_solve_method {
        "auto" => Ok(()),
        "native" => Ok(()),
        #[cfg(feature = "lapack")]
        "lapack" => Ok(()),
        #[cfg(not(feature = "lapack"))]
        "lapack" => Err(lapack_unavailable()),
        _ => Err(SettingsError::BadFieldValue("direct_solve_method")),
    }
}

#[cfg(not(feature = "lapack"))]
fn lapack_unavailable() -> SettingsError {
    SettingsError::LinearSolverProblem {
        solver: "lapack",
        problem: "not compiled with the \"lapack\" feature",
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = DenseKKTSettingsBuilder::<f64>::default().build().unwrap();
    assert_eq!(settings, DenseKKTSettings::default());
    assert!(!settings.iterative_refinement_enable);
    assert_eq!(settings.iterative_refinement_max_iter, 10);
    assert_eq!(settings.ldl_backend(), Ok(LDLBackend::default()));

    // fail on unknown direct solve method
    assert!(DenseKKTSettingsBuilder::<f64>::default()
        .direct_solve_method("foo".to_string())
        .build()
        .is_err());

    // fail on solve options in disabled feature
    let builder = DenseKKTSettingsBuilder::<f64>::default()
        .direct_solve_method("lapack".to_string())
        .build();
    cfg_if::cfg_if! {
        if #[cfg(feature = "lapack")] {
            assert!(builder.is_ok());
        }
        else {
            assert!(builder.is_err());
        }
    }

    // directly construct a bad DenseKKTSettings and manually check
    let settings = DenseKKTSettings::<f64> {
        direct_solve_method: "foo".to_string(),
        ..DenseKKTSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("direct_solve_method"))
    );
    assert!(settings.ldl_backend().is_err());
}
