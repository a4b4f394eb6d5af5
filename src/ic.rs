//! Gaussian log-likelihood and information criteria for model selection.

use crate::types::IcKind;

/// Gaussian log-likelihood at the OLS optimum.
///
/// `ll = -n/2 * (ln(2π) + ln(RSS/n) + 1)`. A perfect fit (RSS = 0) yields
/// `+inf`, so its criteria become `-inf` and it ranks first.
pub fn gaussian_loglik(rss: f64, n: usize) -> f64 {
    let n_f = n as f64;
    if rss <= 0.0 {
        return f64::INFINITY;
    }
    let ln_2pi = (2.0 * std::f64::consts::PI).ln();
    -0.5 * n_f * (ln_2pi + (rss / n_f).ln() + 1.0)
}

/// Akaike criterion: `2k - 2 ln(L)`, with `k` counting the residual
/// variance alongside the regression coefficients.
pub fn aic(loglik: f64, k: usize) -> f64 {
    2.0 * k as f64 - 2.0 * loglik
}

/// Bayesian criterion: `k ln(n) - 2 ln(L)`.
pub fn bic(loglik: f64, k: usize, n: usize) -> f64 {
    k as f64 * (n as f64).ln() - 2.0 * loglik
}

/// Score a fit by the requested criterion; smaller wins. `n_coeffs` counts
/// estimated regression coefficients, the variance parameter is added here.
pub fn ic_score(kind: IcKind, rss: f64, n: usize, n_coeffs: usize) -> f64 {
    let ll = gaussian_loglik(rss, n);
    let k = n_coeffs + 1;
    match kind {
        IcKind::Aic => aic(ll, k),
        IcKind::Bic => bic(ll, k, n),
    }
}
