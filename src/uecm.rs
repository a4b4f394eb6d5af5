use ndarray::{Array1, Array2};

use crate::data::{usable_window, validate_series};
use crate::defaults::COEFF_EPS;
use crate::design::{deterministic_columns, resolve_spec};
use crate::ols::{residual_stats, solve_ls};
use crate::types::{AdlSpec, ArdlError, ExogSeries, FittedModel, Trend, UecmFit};

/// Reparameterize an ARDL specification as an unconstrained error-correction
/// model and fit it.
///
/// The response becomes `ΔY_t`; levels enter once per series at lag 1 and
/// every other lag enters differenced. The transform is algebraically exact,
/// so the refit reproduces the source model's residual sum of squares over
/// the same usable window. Level coefficients, normalized by the negated
/// endogenous level coefficient, give the long-run relationship.
///
/// # Errors
/// `UnsupportedSpecification` unless the source uses contiguous lag orders:
/// AR lags exactly `{1..=P}` with `P >= 1`, and per exogenous series
/// `{0..=Q}` or `{1..=Q}` with `Q >= 1` (a lone contemporaneous term has no
/// equivalent level-plus-difference form).
pub fn fit_uecm(
    endog: &[f64],
    exog: &[ExogSeries],
    spec: &AdlSpec,
) -> Result<UecmFit, ArdlError> {
    let (ar_lags, dl_lags) = resolve_spec(exog, spec)?;
    uecm_from_lags(endog, exog, &ar_lags, &dl_lags, spec.trend, spec.seasonal)
}

/// Reparameterize a fitted ARDL model, reusing its lag structure and
/// deterministic terms.
pub fn uecm_from_model(
    endog: &[f64],
    exog: &[ExogSeries],
    model: &FittedModel,
) -> Result<UecmFit, ArdlError> {
    let dl_lags: Vec<Vec<usize>> = model.dl_lags.iter().map(|(_, lags)| lags.clone()).collect();
    uecm_from_lags(
        endog,
        exog,
        &model.ar_lags,
        &dl_lags,
        model.trend,
        model.seasonal,
    )
}

/// Contiguous order of an AR lag set: `{1..=P}` yields `P`.
fn ar_order(ar_lags: &[usize]) -> Result<usize, ArdlError> {
    let p = ar_lags.len();
    if p == 0 || ar_lags.iter().enumerate().any(|(i, &lag)| lag != i + 1) {
        return Err(ArdlError::UnsupportedSpecification(format!(
            "error-correction form needs autoregressive lags 1..=P, got {:?}",
            ar_lags
        )));
    }
    Ok(p)
}

/// Contiguous order of a DL lag set: `{0..=Q}` or `{1..=Q}` with `Q >= 1`.
/// Returns `(q, causal)`.
fn dl_order(name: &str, lags: &[usize]) -> Result<(usize, bool), ArdlError> {
    let unsupported = || {
        ArdlError::UnsupportedSpecification(format!(
            "error-correction form needs distributed lags 0..=Q or 1..=Q with Q >= 1 \
             for series '{}', got {:?}",
            name, lags
        ))
    };
    match lags.first() {
        Some(0) => {
            if lags.len() < 2 || lags.iter().enumerate().any(|(i, &lag)| lag != i) {
                return Err(unsupported());
            }
            Ok((lags.len() - 1, false))
        }
        Some(1) => {
            if lags.iter().enumerate().any(|(i, &lag)| lag != i + 1) {
                return Err(unsupported());
            }
            Ok((lags.len(), true))
        }
        _ => Err(unsupported()),
    }
}

fn uecm_from_lags(
    endog: &[f64],
    exog: &[ExogSeries],
    ar_lags: &[usize],
    dl_lags: &[Vec<usize>],
    trend: Trend,
    seasonal: Option<usize>,
) -> Result<UecmFit, ArdlError> {
    let n = validate_series(endog, exog)?;
    if dl_lags.len() != exog.len() {
        return Err(ArdlError::LengthMismatch);
    }

    let p = ar_order(ar_lags)?;
    let mut dl_orders = Vec::with_capacity(exog.len());
    for (series, lags) in exog.iter().zip(dl_lags) {
        dl_orders.push(dl_order(&series.name, lags)?);
    }

    let max_lag = dl_lags
        .iter()
        .filter_map(|lags| lags.last())
        .copied()
        .fold(p, usize::max);
    let (start, rows) = usable_window(n, max_lag)?;

    let (det_cols, det_names) = deterministic_columns(trend, seasonal, start, rows)?;
    let n_det = det_cols.len();

    let n_cols = n_det
        + p // y level plus P-1 differences
        + dl_orders
            .iter()
            .map(|&(q, causal)| 1 + if causal { q - 1 } else { q })
            .sum::<usize>();
    let mut matrix = Array2::<f64>::zeros((rows, n_cols));
    let mut names = Vec::with_capacity(n_cols);
    let mut level_cols = Vec::with_capacity(1 + exog.len());
    let mut col = 0;

    for (values, name) in det_cols.into_iter().zip(det_names) {
        for (r, v) in values.into_iter().enumerate() {
            matrix[[r, col]] = v;
        }
        names.push(name);
        col += 1;
    }

    level_cols.push(col);
    for r in 0..rows {
        matrix[[r, col]] = endog[start + r - 1];
    }
    names.push("y.L1".to_string());
    col += 1;

    for lag in 1..p {
        for r in 0..rows {
            let t = start + r;
            matrix[[r, col]] = endog[t - lag] - endog[t - lag - 1];
        }
        names.push(format!("D.y.L{}", lag));
        col += 1;
    }

    for (series, &(q, causal)) in exog.iter().zip(&dl_orders) {
        level_cols.push(col);
        for r in 0..rows {
            matrix[[r, col]] = series.values[start + r - 1];
        }
        names.push(format!("{}.L1", series.name));
        col += 1;

        let first_diff = if causal { 1 } else { 0 };
        for lag in first_diff..q {
            for r in 0..rows {
                let t = start + r;
                matrix[[r, col]] = series.values[t - lag] - series.values[t - lag - 1];
            }
            names.push(format!("D.{}.L{}", series.name, lag));
            col += 1;
        }
    }

    let response = Array1::from_iter((start..n).map(|t| endog[t] - endog[t - 1]));

    let coeffs = solve_ls(&matrix, &response)?;
    let (fitted, residuals, rss) = residual_stats(&matrix, &response, &coeffs);

    let phi = coeffs[level_cols[0]];
    let long_run = exog
        .iter()
        .zip(level_cols[1..].iter())
        .map(|(series, &idx)| {
            let value = if phi.abs() < COEFF_EPS {
                f64::NAN
            } else {
                -coeffs[idx] / phi
            };
            (series.name.clone(), value)
        })
        .collect();

    Ok(UecmFit {
        column_names: names,
        coeffs,
        fitted,
        residuals,
        rss,
        n_rows: rows,
        sample_start: start,
        long_run,
        matrix,
        response,
        level_cols,
        trend,
        n_exog: exog.len(),
    })
}
