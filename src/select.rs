use rayon::prelude::*;

use crate::data::validate_series;
use crate::design::build_resolved;
use crate::ic::ic_score;
use crate::ols::fit_design;
use crate::types::{ArdlError, Candidate, ExogSeries, SelectConfig, Selection};

/// Search lag orders for an ARDL model and rank them by information
/// criterion.
///
/// Non-global mode enumerates contiguous up-to orders `(p, q_1..q_M)`;
/// global mode enumerates arbitrary lag subsets up to the per-series maxima
/// and is bounded by `config.candidate_cap`. Candidates without enough
/// history for their deepest lag are enumerated but not scored. The sweep
/// runs in parallel; ranking is gather-then-sort, with exact score ties
/// going to the earlier-enumerated candidate.
///
/// # Errors
/// `SearchSpaceTooLarge` when the global enumeration exceeds the cap,
/// `NoViableCandidate` when nothing could be scored, and
/// `InvalidSpecification` for malformed configuration.
pub fn select_order(
    endog: &[f64],
    exog: &[ExogSeries],
    config: &SelectConfig,
) -> Result<Selection, ArdlError> {
    let n = validate_series(endog, exog)?;
    if config.max_dl.len() != exog.len() {
        return Err(ArdlError::InvalidSpecification(format!(
            "{} distributed-lag maxima supplied for {} exogenous series",
            config.max_dl.len(),
            exog.len()
        )));
    }
    if let Some(period) = config.seasonal {
        if period < 2 {
            return Err(ArdlError::InvalidSpecification(format!(
                "seasonal period must be at least 2, got {}",
                period
            )));
        }
    }

    let total = count_candidates(config)?;

    let scored: Vec<Option<Candidate>> = (0..total)
        .into_par_iter()
        .map(|index| score_candidate(endog, exog, config, n, index))
        .collect();

    let mut candidates: Vec<Candidate> = scored.into_iter().flatten().collect();
    if candidates.is_empty() {
        return Err(ArdlError::NoViableCandidate);
    }
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));

    let best = candidates[0].clone();
    let dl_lags: Vec<Vec<usize>> = best.dl_lags.iter().map(|(_, lags)| lags.clone()).collect();
    let design = build_resolved(
        endog,
        exog,
        &best.ar_lags,
        &dl_lags,
        config.trend,
        config.seasonal,
    )?;
    let model = fit_design(&design)?;

    Ok(Selection {
        candidates,
        best,
        model,
        n_enumerated: total,
    })
}

/// Closed-form candidate count, with the cap applied in global mode.
fn count_candidates(config: &SelectConfig) -> Result<usize, ArdlError> {
    if config.global {
        // Every radix is a power of two, so the count is 2^bits.
        let mut bits = config.max_ar;
        for &max_dl in &config.max_dl {
            bits += if config.causal { max_dl } else { max_dl + 1 };
        }
        if bits >= 127 {
            return Err(ArdlError::SearchSpaceTooLarge {
                candidates: u128::MAX,
                cap: config.candidate_cap,
            });
        }
        let count = 1u128 << bits;
        if count > config.candidate_cap as u128 {
            return Err(ArdlError::SearchSpaceTooLarge {
                candidates: count,
                cap: config.candidate_cap,
            });
        }
        Ok(count as usize)
    } else {
        let mut count = config.max_ar as u128 + 1;
        for &max_dl in &config.max_dl {
            count *= max_dl as u128 + 1;
        }
        usize::try_from(count).map_err(|_| ArdlError::SearchSpaceTooLarge {
            candidates: count,
            cap: usize::MAX,
        })
    }
}

/// Decode an enumeration index into expanded lag sets, ordered AR digit
/// outermost, then one digit per exogenous series in supplied order.
fn decode_candidate(config: &SelectConfig, index: usize) -> (Vec<usize>, Vec<Vec<usize>>) {
    let m = config.max_dl.len();
    let mut digits = vec![0usize; m + 1];
    let mut rem = index;
    for pos in (0..=m).rev() {
        let radix = radix_at(config, pos);
        digits[pos] = rem % radix;
        rem /= radix;
    }

    if config.global {
        let ar_lags = mask_to_lags(digits[0], 1);
        let dl_lags = (0..m)
            .map(|k| mask_to_lags(digits[k + 1], if config.causal { 1 } else { 0 }))
            .collect();
        (ar_lags, dl_lags)
    } else {
        let ar_lags = (1..=digits[0]).collect();
        let dl_lags = (0..m)
            .map(|k| {
                let start = if config.causal { 1 } else { 0 };
                (start..=digits[k + 1]).collect()
            })
            .collect();
        (ar_lags, dl_lags)
    }
}

fn radix_at(config: &SelectConfig, pos: usize) -> usize {
    if config.global {
        if pos == 0 {
            1 << config.max_ar
        } else {
            let max_dl = config.max_dl[pos - 1];
            1 << if config.causal { max_dl } else { max_dl + 1 }
        }
    } else if pos == 0 {
        config.max_ar + 1
    } else {
        config.max_dl[pos - 1] + 1
    }
}

/// Bit `b` of `mask` includes lag `b + smallest`.
fn mask_to_lags(mask: usize, smallest: usize) -> Vec<usize> {
    let mut lags = Vec::new();
    let mut bit = 0;
    let mut rem = mask;
    while rem != 0 {
        if rem & 1 == 1 {
            lags.push(bit + smallest);
        }
        rem >>= 1;
        bit += 1;
    }
    lags
}

/// Build, fit, and score one candidate; `None` marks a skipped candidate
/// (not enough history, or no spare degrees of freedom).
fn score_candidate(
    endog: &[f64],
    exog: &[ExogSeries],
    config: &SelectConfig,
    n: usize,
    index: usize,
) -> Option<Candidate> {
    let (ar_lags, dl_lags) = decode_candidate(config, index);

    let max_lag = ar_lags
        .iter()
        .chain(dl_lags.iter().flatten())
        .copied()
        .max()
        .unwrap_or(0);
    if max_lag + 1 >= n {
        return None;
    }

    let design = build_resolved(
        endog,
        exog,
        &ar_lags,
        &dl_lags,
        config.trend,
        config.seasonal,
    )
    .ok()?;
    if design.n_cols() == 0 || design.n_rows() <= design.n_cols() {
        return None;
    }

    let fit = fit_design(&design).ok()?;
    let score = ic_score(config.ic, fit.rss, fit.n_rows, fit.coeffs.len());
    if score.is_nan() {
        return None;
    }

    Some(Candidate {
        ar_lags,
        dl_lags: design.dl_lags,
        score,
        n_params: fit.coeffs.len(),
        index,
    })
}
