use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use crate::ic;
use crate::types::{ArdlError, Design, FittedModel, IcKind};

/// Least-squares solve of `X b = y` via Linfa.
///
/// Deterministic terms are explicit design columns, so the solver's own
/// intercept is disabled.
pub(crate) fn solve_ls(x: &Array2<f64>, y: &Array1<f64>) -> Result<Vec<f64>, ArdlError> {
    if x.ncols() == 0 {
        return Err(ArdlError::InvalidSpecification(
            "design has no regressor columns".to_string(),
        ));
    }
    if x.nrows() <= x.ncols() {
        return Err(ArdlError::InsufficientData {
            rows: x.nrows(),
            needed: x.ncols() + 1,
        });
    }

    let dataset = Dataset::new(x.clone(), y.clone());
    let fitted = LinearRegression::new()
        .with_intercept(false)
        .fit(&dataset)
        .map_err(|e| ArdlError::Linalg(format!("{:?}", e)))?;
    Ok(fitted.params().to_vec())
}

/// Fitted values, residuals, and residual sum of squares for `beta`.
pub(crate) fn residual_stats(
    x: &Array2<f64>,
    y: &Array1<f64>,
    beta: &[f64],
) -> (Vec<f64>, Vec<f64>, f64) {
    let fitted = x.dot(&Array1::from(beta.to_vec()));
    let mut residuals = Vec::with_capacity(y.len());
    let mut rss = 0.0;
    for (actual, predicted) in y.iter().zip(fitted.iter()) {
        let e = actual - predicted;
        residuals.push(e);
        rss += e * e;
    }
    (fitted.to_vec(), residuals, rss)
}

/// Fit an ARDL design by ordinary least squares.
///
/// Produces an immutable result with coefficients aligned to the design's
/// column names, residual diagnostics, and both information criteria.
///
/// # Errors
/// `InsufficientData` when the design has no spare degrees of freedom,
/// `Linalg` when the least-squares solve fails.
pub fn fit_design(design: &Design) -> Result<FittedModel, ArdlError> {
    let beta = solve_ls(&design.matrix, &design.response)?;
    let (fitted, residuals, rss) = residual_stats(&design.matrix, &design.response, &beta);

    let n = design.n_rows();
    let n_coeffs = beta.len();
    let loglik = ic::gaussian_loglik(rss, n);

    Ok(FittedModel {
        column_names: design.column_names.clone(),
        coeffs: beta,
        fitted,
        residuals,
        rss,
        sigma2: rss / n as f64,
        loglik,
        aic: ic::ic_score(IcKind::Aic, rss, n, n_coeffs),
        bic: ic::ic_score(IcKind::Bic, rss, n, n_coeffs),
        n_rows: n,
        df_resid: n - n_coeffs,
        sample_start: design.max_lag,
        ar_lags: design.ar_lags.clone(),
        dl_lags: design.dl_lags.clone(),
        trend: design.trend,
        seasonal: design.seasonal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::build_design;
    use crate::types::{AdlSpec, ExogSeries, LagSpec};
    use std::collections::HashMap;

    #[test]
    fn test_fit_recovers_exact_ar1() {
        // y_t = 3 + 0.5 y_{t-1}, exactly
        let mut y = vec![10.0];
        for t in 1..30 {
            y.push(3.0 + 0.5 * y[t - 1]);
        }
        let spec = AdlSpec {
            ar: LagSpec::Order(1),
            ..Default::default()
        };
        let design = build_design(&y, &[], &spec).unwrap();
        let fit = fit_design(&design).unwrap();

        assert_eq!(fit.column_names, vec!["const", "y.L1"]);
        assert!((fit.coeffs[0] - 3.0).abs() < 1e-6);
        assert!((fit.coeffs[1] - 0.5).abs() < 1e-6);
        assert!(fit.rss < 1e-10);
        assert_eq!(fit.n_rows, 29);
        assert_eq!(fit.df_resid, 27);
        assert_eq!(fit.sample_start, 1);
    }

    #[test]
    fn test_fibonacci_least_squares_line() {
        let y = vec![1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0];
        let spec = AdlSpec {
            ar: LagSpec::Order(1),
            ..Default::default()
        };
        let design = build_design(&y, &[], &spec).unwrap();
        let fit = fit_design(&design).unwrap();

        // fitted + residuals reconstruct the response
        for r in 0..fit.n_rows {
            assert!((fit.fitted[r] + fit.residuals[r] - design.response[r]).abs() < 1e-10);
        }
        // least-squares normal equations: residuals orthogonal to each column
        for c in 0..design.n_cols() {
            let dot: f64 = design
                .matrix
                .column(c)
                .iter()
                .zip(fit.residuals.iter())
                .map(|(x, e)| x * e)
                .sum();
            assert!(dot.abs() < 1e-6, "column {} not orthogonal: {}", c, dot);
        }
        // the Fibonacci recursion is close to y_t = phi * y_{t-1}
        assert!(fit.coeffs[1] > 1.3 && fit.coeffs[1] < 1.9);
    }

    #[test]
    fn test_fit_with_exog() {
        let n = 40;
        let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin() + 0.05 * i as f64).collect();
        let mut y = vec![5.0];
        for t in 1..n {
            y.push(2.0 + 0.6 * y[t - 1] + 1.5 * x[t] - 0.4 * x[t - 1]);
        }
        let exog = vec![ExogSeries::new("x", x)];
        let mut dl = HashMap::new();
        dl.insert("x".to_string(), LagSpec::Order(1));
        let spec = AdlSpec {
            ar: LagSpec::Order(1),
            dl,
            ..Default::default()
        };
        let design = build_design(&y, &exog, &spec).unwrap();
        let fit = fit_design(&design).unwrap();

        assert_eq!(fit.column_names, vec!["const", "y.L1", "x.L0", "x.L1"]);
        assert!((fit.coeffs[0] - 2.0).abs() < 1e-6);
        assert!((fit.coeffs[1] - 0.6).abs() < 1e-6);
        assert!((fit.coeffs[2] - 1.5).abs() < 1e-6);
        assert!((fit.coeffs[3] + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_underdetermined_fit_fails() {
        let y = vec![1.0, 2.0, 4.0, 7.0, 11.0, 16.0];
        let spec = AdlSpec {
            ar: LagSpec::Order(3),
            trend: crate::types::Trend::Linear,
            ..Default::default()
        };
        // 3 usable rows, 5 columns
        let design = build_design(&y, &[], &spec).unwrap();
        let err = fit_design(&design).unwrap_err();
        assert!(matches!(err, ArdlError::InsufficientData { .. }));
    }

    #[test]
    fn test_empty_design_fails() {
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let spec = AdlSpec {
            ar: LagSpec::Order(0),
            trend: crate::types::Trend::None,
            ..Default::default()
        };
        let design = build_design(&y, &[], &spec).unwrap();
        let err = fit_design(&design).unwrap_err();
        assert!(matches!(err, ArdlError::InvalidSpecification(_)));
    }
}
