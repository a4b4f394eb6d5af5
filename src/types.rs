use std::collections::HashMap;

use crate::defaults::{DEFAULT_CANDIDATE_CAP, DEFAULT_MAX_AR, DEFAULT_MAX_DL};

/// One named exogenous series.
///
/// # Example
/// ```
/// use ardl::ExogSeries;
/// let x = ExogSeries::new("income", vec![1.0, 2.0, 3.0]);
/// assert_eq!(x.name, "income");
/// ```
#[derive(Clone, Debug)]
pub struct ExogSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl ExogSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Lag structure for one series: a contiguous up-to order, or an explicit
/// ascending set of lags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LagSpec {
    /// `Order(p)` expands to lags `{1..=p}` for the endogenous series and to
    /// `{0..=p}` (`{1..=p}` when causal) for an exogenous series.
    Order(usize),
    /// Explicit lags, strictly ascending.
    Lags(Vec<usize>),
}

impl LagSpec {
    /// Expand to autoregressive lags of the endogenous series.
    ///
    /// Explicit sets must be strictly ascending and must not contain lag 0
    /// (the response cannot regress on itself contemporaneously).
    pub fn ar_lags(&self) -> Result<Vec<usize>, ArdlError> {
        match self {
            LagSpec::Order(p) => Ok((1..=*p).collect()),
            LagSpec::Lags(lags) => {
                validate_ascending(lags)?;
                if lags.first() == Some(&0) {
                    return Err(ArdlError::InvalidSpecification(
                        "autoregressive lag set may not contain lag 0".to_string(),
                    ));
                }
                Ok(lags.clone())
            }
        }
    }

    /// Expand to distributed lags of an exogenous series.
    pub fn dl_lags(&self, causal: bool) -> Result<Vec<usize>, ArdlError> {
        match self {
            LagSpec::Order(q) => {
                let start = if causal { 1 } else { 0 };
                Ok((start..=*q).collect())
            }
            LagSpec::Lags(lags) => {
                validate_ascending(lags)?;
                if causal && lags.first() == Some(&0) {
                    return Err(ArdlError::InvalidSpecification(
                        "causal model may not include the contemporaneous lag 0".to_string(),
                    ));
                }
                Ok(lags.clone())
            }
        }
    }
}

fn validate_ascending(lags: &[usize]) -> Result<(), ArdlError> {
    for pair in lags.windows(2) {
        if pair[1] <= pair[0] {
            return Err(ArdlError::InvalidSpecification(format!(
                "explicit lag set must be strictly ascending, got {:?}",
                lags
            )));
        }
    }
    Ok(())
}

/// Deterministic polynomial-in-time terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    None,
    Constant,
    /// Constant plus linear time term.
    Linear,
    /// Powers of time up to the given degree (degree 0 equals `Constant`).
    Polynomial(usize),
}

impl Trend {
    pub(crate) fn degree(&self) -> Option<usize> {
        match self {
            Trend::None => None,
            Trend::Constant => Some(0),
            Trend::Linear => Some(1),
            Trend::Polynomial(d) => Some(*d),
        }
    }

    /// Number of deterministic columns this trend contributes.
    pub fn n_terms(&self) -> usize {
        self.degree().map(|d| d + 1).unwrap_or(0)
    }
}

/// Full lag-design specification for an ARDL model.
///
/// Distributed-lag specs are keyed by exogenous series name; every supplied
/// exogenous series must have an entry.
#[derive(Clone, Debug)]
pub struct AdlSpec {
    pub ar: LagSpec,
    pub dl: HashMap<String, LagSpec>,
    pub trend: Trend,
    /// Seasonal period; `Some(s)` adds `s - 1` dummy columns.
    pub seasonal: Option<usize>,
    /// Drop the contemporaneous exogenous term from `Order` expansions.
    pub causal: bool,
}

impl Default for AdlSpec {
    fn default() -> Self {
        Self {
            ar: LagSpec::Order(1),
            dl: HashMap::new(),
            trend: Trend::Constant,
            seasonal: None,
            causal: false,
        }
    }
}

/// Built regression design, immutable once constructed.
#[derive(Clone, Debug)]
pub struct Design {
    pub matrix: ndarray::Array2<f64>,
    pub response: ndarray::Array1<f64>,
    pub column_names: Vec<String>,
    pub n_deterministic: usize,
    pub ar_lags: Vec<usize>,
    pub dl_lags: Vec<(String, Vec<usize>)>,
    /// Largest lag used anywhere; the usable sample starts here.
    pub max_lag: usize,
    /// Length of the original series.
    pub n_obs: usize,
    pub trend: Trend,
    pub seasonal: Option<usize>,
}

impl Design {
    pub fn n_rows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Fitted ARDL model: one OLS solve over a built design.
#[derive(Clone, Debug)]
pub struct FittedModel {
    pub column_names: Vec<String>,
    pub coeffs: Vec<f64>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    pub rss: f64,
    /// Maximum-likelihood residual variance, RSS / n.
    pub sigma2: f64,
    pub loglik: f64,
    pub aic: f64,
    pub bic: f64,
    pub n_rows: usize,
    pub df_resid: usize,
    /// First usable index of the original series.
    pub sample_start: usize,
    pub ar_lags: Vec<usize>,
    pub dl_lags: Vec<(String, Vec<usize>)>,
    pub trend: Trend,
    pub seasonal: Option<usize>,
}

/// Information-criterion variants; smaller is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IcKind {
    Aic,
    Bic,
}

/// One enumerated lag specification with its score.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub ar_lags: Vec<usize>,
    pub dl_lags: Vec<(String, Vec<usize>)>,
    pub score: f64,
    pub n_params: usize,
    /// Position in the deterministic enumeration order; breaks score ties.
    pub index: usize,
}

/// Options for [`crate::select_order`].
#[derive(Clone, Debug)]
pub struct SelectConfig {
    pub max_ar: usize,
    /// Per-exogenous-series maximum distributed-lag order, in supplied order.
    pub max_dl: Vec<usize>,
    pub ic: IcKind,
    pub trend: Trend,
    pub seasonal: Option<usize>,
    pub causal: bool,
    /// Enumerate arbitrary lag subsets instead of contiguous orders.
    pub global: bool,
    /// Hard limit on the global search space.
    pub candidate_cap: usize,
}

impl SelectConfig {
    pub fn new(max_ar: usize, max_dl: Vec<usize>) -> Self {
        Self {
            max_ar,
            max_dl,
            ..Default::default()
        }
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            max_ar: DEFAULT_MAX_AR,
            max_dl: vec![DEFAULT_MAX_DL],
            ic: IcKind::Bic,
            trend: Trend::Constant,
            seasonal: None,
            causal: false,
            global: false,
            candidate_cap: DEFAULT_CANDIDATE_CAP,
        }
    }
}

/// Output of lag-order selection.
#[derive(Clone, Debug)]
pub struct Selection {
    /// Viable candidates ranked ascending by score, ties by enumeration order.
    pub candidates: Vec<Candidate>,
    pub best: Candidate,
    /// The best candidate refit for reporting.
    pub model: FittedModel,
    /// Total enumerated candidates, including skipped ones.
    pub n_enumerated: usize,
}

/// Fitted unconstrained error-correction reparameterization of an ARDL model.
#[derive(Clone, Debug)]
pub struct UecmFit {
    pub column_names: Vec<String>,
    pub coeffs: Vec<f64>,
    pub fitted: Vec<f64>,
    /// Residuals of the transformed regression, the long-run error series.
    pub residuals: Vec<f64>,
    pub rss: f64,
    pub n_rows: usize,
    pub sample_start: usize,
    /// Long-run coefficient per exogenous series, each level coefficient
    /// normalized by the negated endogenous level coefficient.
    pub long_run: Vec<(String, f64)>,
    pub(crate) matrix: ndarray::Array2<f64>,
    pub(crate) response: ndarray::Array1<f64>,
    pub(crate) level_cols: Vec<usize>,
    pub(crate) trend: Trend,
    pub(crate) n_exog: usize,
}

/// Deterministic-term case of the bounds-testing framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsCase {
    /// No intercept, no trend.
    I,
    /// Restricted intercept, no trend.
    II,
    /// Unrestricted intercept, no trend.
    III,
    /// Unrestricted intercept, restricted trend.
    IV,
    /// Unrestricted intercept and trend.
    V,
}

impl BoundsCase {
    pub fn number(&self) -> usize {
        match self {
            BoundsCase::I => 1,
            BoundsCase::II => 2,
            BoundsCase::III => 3,
            BoundsCase::IV => 4,
            BoundsCase::V => 5,
        }
    }
}

/// Decision of the bounds test at one significance level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsOutcome {
    /// Statistic above the I(1) bound: a level relationship exists.
    Reject,
    /// Statistic between the bounds.
    Inconclusive,
    /// Statistic below the I(0) bound.
    FailToReject,
}

/// Result of the bounds test for a level relationship.
#[derive(Clone, Debug)]
pub struct BoundsTest {
    pub f_stat: f64,
    pub case: BoundsCase,
    /// Number of exogenous regressors entering the level relationship.
    pub k: usize,
    pub n_rows: usize,
    /// `(significance level, lower bound, upper bound)` rows of the table.
    pub critical_values: Vec<(f64, f64, f64)>,
    /// P-value assuming all regressors are I(0).
    pub p_value_i0: f64,
    /// P-value assuming all regressors are I(1).
    pub p_value_i1: f64,
}

/// Library error type.
#[derive(thiserror::Error, Debug)]
pub enum ArdlError {
    #[error("input lengths mismatch")]
    LengthMismatch,
    #[error("empty input")]
    EmptyInput,
    #[error("insufficient data: {rows} usable observations, {needed} required")]
    InsufficientData { rows: usize, needed: usize },
    #[error("invalid specification: {0}")]
    InvalidSpecification(String),
    #[error("global search space of {candidates} candidates exceeds cap {cap}")]
    SearchSpaceTooLarge { candidates: u128, cap: usize },
    #[error("no enumerated candidate has enough history to be scored")]
    NoViableCandidate,
    #[error("unsupported specification: {0}")]
    UnsupportedSpecification(String),
    #[error("linear algebra failure: {0}")]
    Linalg(String),
}
