use ndarray::{Array1, Array2};

use crate::data::{usable_window, validate_series};
use crate::types::{AdlSpec, ArdlError, Design, ExogSeries, Trend};

/// Build the stacked-lag regression design for an ARDL specification.
///
/// Columns are ordered deterministically: deterministic terms first, then
/// autoregressive lags ascending, then each exogenous series' distributed
/// lags ascending, series in the order supplied. Rows cover the usable
/// sample `max_lag..n`.
///
/// # Example
/// ```
/// use ardl::{build_design, AdlSpec, LagSpec, Trend};
///
/// let y = vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0];
/// let spec = AdlSpec {
///     ar: LagSpec::Order(1),
///     trend: Trend::Constant,
///     ..Default::default()
/// };
/// let design = build_design(&y, &[], &spec).unwrap();
/// assert_eq!(design.n_rows(), 7);
/// assert_eq!(design.column_names, vec!["const", "y.L1"]);
/// ```
///
/// # Errors
/// `InsufficientData` when the largest lag leaves no usable rows,
/// `InvalidSpecification` for malformed lag sets, unknown or missing
/// distributed-lag keys, or non-finite data.
pub fn build_design(
    endog: &[f64],
    exog: &[ExogSeries],
    spec: &AdlSpec,
) -> Result<Design, ArdlError> {
    let (ar_lags, dl_lags) = resolve_spec(exog, spec)?;
    build_resolved(endog, exog, &ar_lags, &dl_lags, spec.trend, spec.seasonal)
}

/// Expand a specification's lag structure against the supplied exogenous
/// series, checking the distributed-lag keys both ways.
pub(crate) fn resolve_spec(
    exog: &[ExogSeries],
    spec: &AdlSpec,
) -> Result<(Vec<usize>, Vec<Vec<usize>>), ArdlError> {
    let ar_lags = spec.ar.ar_lags()?;

    for key in spec.dl.keys() {
        if !exog.iter().any(|series| &series.name == key) {
            return Err(ArdlError::InvalidSpecification(format!(
                "distributed-lag spec references unknown series '{}'",
                key
            )));
        }
    }

    let mut dl_lags = Vec::with_capacity(exog.len());
    for series in exog {
        let lag_spec = spec.dl.get(&series.name).ok_or_else(|| {
            ArdlError::InvalidSpecification(format!(
                "missing distributed-lag spec for series '{}'",
                series.name
            ))
        })?;
        dl_lags.push(lag_spec.dl_lags(spec.causal)?);
    }

    Ok((ar_lags, dl_lags))
}

/// Build a design from already-expanded lag sets, one per exogenous series
/// in order. Shared by [`build_design`] and the order-selection sweep.
pub(crate) fn build_resolved(
    endog: &[f64],
    exog: &[ExogSeries],
    ar_lags: &[usize],
    dl_lags: &[Vec<usize>],
    trend: Trend,
    seasonal: Option<usize>,
) -> Result<Design, ArdlError> {
    let n = validate_series(endog, exog)?;
    if dl_lags.len() != exog.len() {
        return Err(ArdlError::LengthMismatch);
    }

    let max_lag = ar_lags
        .iter()
        .chain(dl_lags.iter().flatten())
        .copied()
        .max()
        .unwrap_or(0);
    let (start, rows) = usable_window(n, max_lag)?;

    let (det_cols, det_names) = deterministic_columns(trend, seasonal, start, rows)?;

    let n_cols = det_cols.len() + ar_lags.len() + dl_lags.iter().map(Vec::len).sum::<usize>();
    let mut matrix = Array2::<f64>::zeros((rows, n_cols));
    let mut names = Vec::with_capacity(n_cols);
    let mut col = 0;

    for (values, name) in det_cols.into_iter().zip(det_names) {
        for (r, v) in values.into_iter().enumerate() {
            matrix[[r, col]] = v;
        }
        names.push(name);
        col += 1;
    }

    for &lag in ar_lags {
        for r in 0..rows {
            matrix[[r, col]] = endog[start + r - lag];
        }
        names.push(format!("y.L{}", lag));
        col += 1;
    }

    for (series, lags) in exog.iter().zip(dl_lags) {
        for &lag in lags {
            for r in 0..rows {
                matrix[[r, col]] = series.values[start + r - lag];
            }
            names.push(format!("{}.L{}", series.name, lag));
            col += 1;
        }
    }

    let response = Array1::from_iter(endog[start..].iter().copied());

    Ok(Design {
        matrix,
        response,
        n_deterministic: n_cols - ar_lags.len() - dl_lags.iter().map(Vec::len).sum::<usize>(),
        column_names: names,
        ar_lags: ar_lags.to_vec(),
        dl_lags: exog
            .iter()
            .zip(dl_lags)
            .map(|(series, lags)| (series.name.clone(), lags.clone()))
            .collect(),
        max_lag,
        n_obs: n,
        trend,
        seasonal,
    })
}

/// Deterministic columns for the usable window starting at `start`.
///
/// Time is measured on the original 0-based index, so trend values line up
/// across specifications with different burn-in. Seasonal dummies cover
/// seasons `1..period`; season 0 is the reference and is dropped to avoid
/// collinearity with the constant.
pub(crate) fn deterministic_columns(
    trend: Trend,
    seasonal: Option<usize>,
    start: usize,
    rows: usize,
) -> Result<(Vec<Vec<f64>>, Vec<String>), ArdlError> {
    let mut cols = Vec::new();
    let mut names = Vec::new();

    if let Some(degree) = trend.degree() {
        for power in 0..=degree {
            let values = (0..rows)
                .map(|r| ((start + r) as f64).powi(power as i32))
                .collect();
            cols.push(values);
            names.push(match power {
                0 => "const".to_string(),
                1 => "trend".to_string(),
                _ => format!("trend{}", power),
            });
        }
    }

    if let Some(period) = seasonal {
        if period < 2 {
            return Err(ArdlError::InvalidSpecification(format!(
                "seasonal period must be at least 2, got {}",
                period
            )));
        }
        for season in 1..period {
            let values = (0..rows)
                .map(|r| if (start + r) % period == season { 1.0 } else { 0.0 })
                .collect();
            cols.push(values);
            names.push(format!("s{}", season));
        }
    }

    Ok((cols, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LagSpec;
    use std::collections::HashMap;

    fn fib() -> Vec<f64> {
        vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0]
    }

    #[test]
    fn test_fibonacci_ar1_shape() {
        let spec = AdlSpec {
            ar: LagSpec::Order(1),
            ..Default::default()
        };
        let design = build_design(&fib(), &[], &spec).unwrap();
        assert_eq!(design.n_rows(), 7);
        assert_eq!(design.n_cols(), 2);
        assert_eq!(design.column_names, vec!["const", "y.L1"]);
        assert_eq!(design.max_lag, 1);
        // First usable row regresses y[1] on (1, y[0])
        assert_eq!(design.response[0], 2.0);
        assert_eq!(design.matrix[[0, 0]], 1.0);
        assert_eq!(design.matrix[[0, 1]], 1.0);
        assert_eq!(design.matrix[[6, 1]], 21.0);
    }

    #[test]
    fn test_rows_equal_n_minus_max_lag() {
        for p in 1..6 {
            let spec = AdlSpec {
                ar: LagSpec::Order(p),
                ..Default::default()
            };
            let design = build_design(&fib(), &[], &spec).unwrap();
            assert_eq!(design.n_rows(), 8 - p);
        }
    }

    #[test]
    fn test_insufficient_data() {
        let spec = AdlSpec {
            ar: LagSpec::Order(10),
            ..Default::default()
        };
        let err = build_design(&[1.0, 2.0, 3.0, 4.0, 5.0], &[], &spec).unwrap_err();
        assert!(matches!(err, ArdlError::InsufficientData { .. }));
    }

    #[test]
    fn test_column_ordering_with_exog() {
        let exog = vec![
            ExogSeries::new("a", vec![1.0; 12]),
            ExogSeries::new("b", vec![2.0; 12]),
        ];
        let mut dl = HashMap::new();
        dl.insert("a".to_string(), LagSpec::Order(1));
        dl.insert("b".to_string(), LagSpec::Order(0));
        let spec = AdlSpec {
            ar: LagSpec::Order(2),
            dl,
            trend: Trend::Linear,
            ..Default::default()
        };
        let y: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let design = build_design(&y, &exog, &spec).unwrap();
        assert_eq!(
            design.column_names,
            vec!["const", "trend", "y.L1", "y.L2", "a.L0", "a.L1", "b.L0"]
        );
        assert_eq!(design.n_deterministic, 2);
        // trend column carries the original time index
        assert_eq!(design.matrix[[0, 1]], 2.0);
    }

    #[test]
    fn test_causal_drops_contemporaneous() {
        let exog = vec![ExogSeries::new("x", vec![0.5; 10])];
        let mut dl = HashMap::new();
        dl.insert("x".to_string(), LagSpec::Order(2));
        let spec = AdlSpec {
            ar: LagSpec::Order(1),
            dl,
            causal: true,
            ..Default::default()
        };
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let design = build_design(&y, &exog, &spec).unwrap();
        assert!(!design.column_names.iter().any(|n| n == "x.L0"));
        assert_eq!(design.dl_lags[0].1, vec![1, 2]);
    }

    #[test]
    fn test_explicit_non_contiguous_lags() {
        let spec = AdlSpec {
            ar: LagSpec::Lags(vec![1, 3]),
            ..Default::default()
        };
        let y: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let design = build_design(&y, &[], &spec).unwrap();
        assert_eq!(design.column_names, vec!["const", "y.L1", "y.L3"]);
        assert_eq!(design.max_lag, 3);
        assert_eq!(design.n_rows(), 7);
        // row 0 is t = 3: lags pick up y[2] and y[0]
        assert_eq!(design.matrix[[0, 1]], 4.0);
        assert_eq!(design.matrix[[0, 2]], 0.0);
    }

    #[test]
    fn test_seasonal_dummies() {
        let spec = AdlSpec {
            ar: LagSpec::Order(0),
            seasonal: Some(4),
            ..Default::default()
        };
        let y: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let design = build_design(&y, &[], &spec).unwrap();
        assert_eq!(design.column_names, vec!["const", "s1", "s2", "s3"]);
        // t = 1 falls in season 1
        assert_eq!(design.matrix[[1, 1]], 1.0);
        assert_eq!(design.matrix[[1, 2]], 0.0);
        // t = 0 is the reference season
        assert_eq!(design.matrix[[0, 1]], 0.0);
    }

    #[test]
    fn test_seasonal_period_too_small() {
        let spec = AdlSpec {
            seasonal: Some(1),
            ..Default::default()
        };
        let y: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let err = build_design(&y, &[], &spec).unwrap_err();
        assert!(matches!(err, ArdlError::InvalidSpecification(_)));
    }

    #[test]
    fn test_unknown_dl_key() {
        let mut dl = HashMap::new();
        dl.insert("ghost".to_string(), LagSpec::Order(1));
        let spec = AdlSpec {
            dl,
            ..Default::default()
        };
        let err = build_design(&fib(), &[], &spec).unwrap_err();
        assert!(matches!(err, ArdlError::InvalidSpecification(_)));
    }

    #[test]
    fn test_missing_dl_key() {
        let exog = vec![ExogSeries::new("x", vec![1.0; 8])];
        let spec = AdlSpec::default();
        let err = build_design(&fib(), &exog, &spec).unwrap_err();
        assert!(matches!(err, ArdlError::InvalidSpecification(_)));
    }
}
