//! Bounds test for a long-run level relationship.
//!
//! Asymptotic critical-value bounds transcribed from Pesaran, Shin & Smith
//! (2001), Table CI, cases I through V, for up to five exogenous level
//! regressors. The lower bound assumes all regressors are I(0), the upper
//! bound assumes all are I(1).

use ndarray::Array2;

use crate::ols::{residual_stats, solve_ls};
use crate::types::{ArdlError, BoundsCase, BoundsOutcome, BoundsTest, Trend, UecmFit};

/// Tabulated significance levels, most to least permissive.
pub const LEVELS: [f64; 4] = [0.10, 0.05, 0.025, 0.01];

const MAX_K: usize = 5;

/// `TABLE_*[k][level] = [lower, upper]`, `k` = number of exogenous level
/// regressors, levels ordered as in [`LEVELS`].
const TABLE_CASE_I: [[[f64; 2]; 4]; 6] = [
    [[2.44, 2.44], [3.15, 3.15], [3.88, 3.88], [4.81, 4.81]],
    [[2.17, 3.19], [2.72, 3.83], [3.22, 4.50], [3.88, 5.30]],
    [[2.04, 3.01], [2.50, 3.58], [2.94, 4.10], [3.42, 4.84]],
    [[1.99, 2.94], [2.37, 3.42], [2.73, 3.90], [3.21, 4.53]],
    [[1.95, 2.88], [2.28, 3.32], [2.62, 3.77], [3.07, 4.44]],
    [[1.92, 2.84], [2.22, 3.25], [2.54, 3.68], [2.96, 4.26]],
];

const TABLE_CASE_II: [[[f64; 2]; 4]; 6] = [
    [[3.80, 3.80], [4.60, 4.60], [5.39, 5.39], [6.44, 6.44]],
    [[3.02, 3.51], [3.62, 4.16], [4.18, 4.79], [4.94, 5.58]],
    [[2.63, 3.35], [3.10, 3.87], [3.55, 4.38], [4.13, 5.00]],
    [[2.37, 3.20], [2.79, 3.67], [3.15, 4.08], [3.65, 4.66]],
    [[2.20, 3.09], [2.56, 3.49], [2.88, 3.87], [3.29, 4.37]],
    [[2.08, 3.00], [2.39, 3.38], [2.70, 3.73], [3.06, 4.15]],
];

const TABLE_CASE_III: [[[f64; 2]; 4]; 6] = [
    [[6.58, 6.58], [8.21, 8.21], [9.80, 9.80], [11.79, 11.79]],
    [[4.04, 4.78], [4.94, 5.73], [5.77, 6.68], [6.84, 7.84]],
    [[3.17, 4.14], [3.79, 4.85], [4.41, 5.52], [5.15, 6.36]],
    [[2.72, 3.77], [3.23, 4.35], [3.69, 4.89], [4.29, 5.61]],
    [[2.45, 3.52], [2.86, 4.01], [3.25, 4.49], [3.74, 5.06]],
    [[2.26, 3.35], [2.62, 3.79], [2.96, 4.18], [3.41, 4.68]],
];

const TABLE_CASE_IV: [[[f64; 2]; 4]; 6] = [
    [[5.37, 5.37], [6.29, 6.29], [7.14, 7.14], [8.26, 8.26]],
    [[4.05, 4.49], [4.68, 5.15], [5.30, 5.83], [6.10, 6.73]],
    [[3.38, 4.02], [3.88, 4.61], [4.37, 5.16], [4.99, 5.85]],
    [[2.97, 3.74], [3.38, 4.23], [3.80, 4.68], [4.30, 5.23]],
    [[2.68, 3.53], [3.05, 3.97], [3.40, 4.36], [3.84, 4.85]],
    [[2.49, 3.38], [2.81, 3.76], [3.11, 4.13], [3.50, 4.63]],
];

const TABLE_CASE_V: [[[f64; 2]; 4]; 6] = [
    [[9.81, 9.81], [11.64, 11.64], [13.36, 13.36], [15.73, 15.73]],
    [[5.59, 6.26], [6.56, 7.30], [7.46, 8.27], [8.74, 9.63]],
    [[4.19, 5.06], [4.87, 5.85], [5.49, 6.59], [6.34, 7.52]],
    [[3.47, 4.45], [4.01, 5.07], [4.52, 5.62], [5.17, 6.36]],
    [[3.03, 4.06], [3.47, 4.57], [3.89, 5.07], [4.40, 5.72]],
    [[2.75, 3.79], [3.12, 4.25], [3.47, 4.67], [3.93, 5.23]],
];

fn table_for(case: BoundsCase) -> &'static [[[f64; 2]; 4]; 6] {
    match case {
        BoundsCase::I => &TABLE_CASE_I,
        BoundsCase::II => &TABLE_CASE_II,
        BoundsCase::III => &TABLE_CASE_III,
        BoundsCase::IV => &TABLE_CASE_IV,
        BoundsCase::V => &TABLE_CASE_V,
    }
}

/// Asymptotic `(lower, upper)` critical bounds for `k` exogenous level
/// regressors at one of the tabulated significance levels.
pub fn critical_values(
    case: BoundsCase,
    k: usize,
    level: f64,
) -> Result<(f64, f64), ArdlError> {
    if k > MAX_K {
        return Err(ArdlError::InvalidSpecification(format!(
            "critical values tabulated for at most {} regressors, got {}",
            MAX_K, k
        )));
    }
    let slot = LEVELS
        .iter()
        .position(|&l| (l - level).abs() < 1e-12)
        .ok_or_else(|| {
            ArdlError::InvalidSpecification(format!(
                "significance level {} is not tabulated; use one of {:?}",
                level, LEVELS
            ))
        })?;
    let row = table_for(case)[k][slot];
    Ok((row[0], row[1]))
}

/// Bounds test on a fitted error-correction model.
///
/// The null is that every level-term coefficient is zero (no long-run
/// relationship); for cases II and IV the restricted deterministic term
/// joins the null, matching the table being consulted. The F statistic is
/// compared against both bounds: above the upper bound the null is rejected
/// whatever the regressors' integration order, below the lower bound it is
/// not, and between them the test is inconclusive.
///
/// # Errors
/// `InvalidSpecification` when the requested case does not match the
/// model's deterministic terms or `k` exceeds the tabulated range.
pub fn bounds_test(uecm: &UecmFit, case: BoundsCase) -> Result<BoundsTest, ArdlError> {
    let expected_trend = match case {
        BoundsCase::I => Trend::None,
        BoundsCase::II | BoundsCase::III => Trend::Constant,
        BoundsCase::IV | BoundsCase::V => Trend::Linear,
    };
    if uecm.trend != expected_trend {
        return Err(ArdlError::InvalidSpecification(format!(
            "case {} requires trend {:?}, model was fit with {:?}",
            case.number(),
            expected_trend,
            uecm.trend
        )));
    }

    let mut restricted: Vec<usize> = uecm.level_cols.clone();
    match case {
        BoundsCase::II => restricted.push(name_index(uecm, "const")?),
        BoundsCase::IV => restricted.push(name_index(uecm, "trend")?),
        _ => {}
    }
    restricted.sort_unstable();

    let n = uecm.n_rows;
    let k_u = uecm.matrix.ncols();
    if n <= k_u {
        return Err(ArdlError::InsufficientData {
            rows: n,
            needed: k_u + 1,
        });
    }

    let rss_r = restricted_rss(uecm, &restricted)?;
    let m = restricted.len() as f64;
    let df = (n - k_u) as f64;
    let f_stat = ((rss_r - uecm.rss) / m) / (uecm.rss / df);

    let k = uecm.n_exog;
    let mut critical = Vec::with_capacity(LEVELS.len());
    for &level in &LEVELS {
        let (lower, upper) = critical_values(case, k, level)?;
        critical.push((level, lower, upper));
    }

    let p_value_i0 = interpolate_p(f_stat, critical.iter().map(|&(l, lo, _)| (lo, l)));
    let p_value_i1 = interpolate_p(f_stat, critical.iter().map(|&(l, _, hi)| (hi, l)));

    Ok(BoundsTest {
        f_stat,
        case,
        k,
        n_rows: n,
        critical_values: critical,
        p_value_i0,
        p_value_i1,
    })
}

impl BoundsTest {
    /// Decision at one of the tabulated significance levels.
    pub fn decision(&self, level: f64) -> Result<BoundsOutcome, ArdlError> {
        let (lower, upper) = critical_values(self.case, self.k, level)?;
        Ok(if self.f_stat > upper {
            BoundsOutcome::Reject
        } else if self.f_stat < lower {
            BoundsOutcome::FailToReject
        } else {
            BoundsOutcome::Inconclusive
        })
    }
}

fn name_index(uecm: &UecmFit, name: &str) -> Result<usize, ArdlError> {
    uecm.column_names
        .iter()
        .position(|n| n == name)
        .ok_or_else(|| {
            ArdlError::InvalidSpecification(format!("model has no '{}' column", name))
        })
}

/// RSS of the model with the given columns removed; an empty restricted
/// design degenerates to the response's sum of squares.
fn restricted_rss(uecm: &UecmFit, dropped: &[usize]) -> Result<f64, ArdlError> {
    let keep: Vec<usize> = (0..uecm.matrix.ncols())
        .filter(|c| !dropped.contains(c))
        .collect();
    if keep.is_empty() {
        return Ok(uecm.response.iter().map(|v| v * v).sum());
    }

    let mut reduced = Array2::<f64>::zeros((uecm.matrix.nrows(), keep.len()));
    for (dest, &src) in keep.iter().enumerate() {
        reduced.column_mut(dest).assign(&uecm.matrix.column(src));
    }
    let beta = solve_ls(&reduced, &uecm.response)?;
    let (_, _, rss) = residual_stats(&reduced, &uecm.response, &beta);
    Ok(rss)
}

/// Piecewise-linear p-value against one side of the bounds table. Anchored
/// at `(0, 1)`; statistics beyond the 1% bound are reported as 0.01.
fn interpolate_p(f_stat: f64, points: impl Iterator<Item = (f64, f64)>) -> f64 {
    let mut prev = (0.0, 1.0);
    for (crit, level) in points {
        if f_stat <= crit {
            let span = crit - prev.0;
            if span <= 0.0 {
                return level;
            }
            let w = (f_stat - prev.0) / span;
            return prev.1 + w * (level - prev.1);
        }
        prev = (crit, level);
    }
    LEVELS[LEVELS.len() - 1]
}
