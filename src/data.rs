use crate::types::{ArdlError, ExogSeries};

/// Validate the endogenous and exogenous series and return the common length.
///
/// # Errors
/// Returns `ArdlError::EmptyInput` for an empty endogenous series,
/// `ArdlError::LengthMismatch` when an exogenous series differs in length,
/// and `ArdlError::InvalidSpecification` for non-finite values or duplicate
/// exogenous names.
pub fn validate_series(endog: &[f64], exog: &[ExogSeries]) -> Result<usize, ArdlError> {
    if endog.is_empty() {
        return Err(ArdlError::EmptyInput);
    }

    let n = endog.len();
    if endog.iter().any(|v| !v.is_finite()) {
        return Err(ArdlError::InvalidSpecification(
            "endogenous series contains non-finite values".to_string(),
        ));
    }

    for (idx, series) in exog.iter().enumerate() {
        if series.values.len() != n {
            return Err(ArdlError::LengthMismatch);
        }
        if series.values.iter().any(|v| !v.is_finite()) {
            return Err(ArdlError::InvalidSpecification(format!(
                "exogenous series '{}' contains non-finite values",
                series.name
            )));
        }
        if exog[..idx].iter().any(|prev| prev.name == series.name) {
            return Err(ArdlError::InvalidSpecification(format!(
                "duplicate exogenous series name '{}'",
                series.name
            )));
        }
    }

    Ok(n)
}

/// Usable sample window for a given maximum lag: `(start, n_rows)`.
///
/// Rows before `max_lag` lack the history for their lagged regressors and
/// are discarded. Fails when no usable window remains, i.e. when
/// `max_lag >= n - 1`.
pub fn usable_window(n: usize, max_lag: usize) -> Result<(usize, usize), ArdlError> {
    if max_lag + 1 >= n {
        return Err(ArdlError::InsufficientData {
            rows: n,
            needed: max_lag + 2,
        });
    }
    Ok((max_lag, n - max_lag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty() {
        let result = validate_series(&[], &[]);
        assert!(matches!(result, Err(ArdlError::EmptyInput)));
    }

    #[test]
    fn test_validate_length_mismatch() {
        let exog = vec![ExogSeries::new("x", vec![1.0, 2.0])];
        let result = validate_series(&[1.0, 2.0, 3.0], &exog);
        assert!(matches!(result, Err(ArdlError::LengthMismatch)));
    }

    #[test]
    fn test_validate_non_finite_endog() {
        let result = validate_series(&[1.0, f64::NAN], &[]);
        assert!(matches!(result, Err(ArdlError::InvalidSpecification(_))));
    }

    #[test]
    fn test_validate_non_finite_exog() {
        let exog = vec![ExogSeries::new("x", vec![1.0, f64::INFINITY])];
        let result = validate_series(&[1.0, 2.0], &exog);
        assert!(matches!(result, Err(ArdlError::InvalidSpecification(_))));
    }

    #[test]
    fn test_validate_duplicate_names() {
        let exog = vec![
            ExogSeries::new("x", vec![1.0, 2.0]),
            ExogSeries::new("x", vec![3.0, 4.0]),
        ];
        let result = validate_series(&[1.0, 2.0], &exog);
        assert!(matches!(result, Err(ArdlError::InvalidSpecification(_))));
    }

    #[test]
    fn test_validate_success() {
        let exog = vec![
            ExogSeries::new("a", vec![1.0, 2.0, 3.0]),
            ExogSeries::new("b", vec![4.0, 5.0, 6.0]),
        ];
        assert_eq!(validate_series(&[7.0, 8.0, 9.0], &exog).unwrap(), 3);
    }

    #[test]
    fn test_usable_window() {
        let (start, rows) = usable_window(10, 3).unwrap();
        assert_eq!(start, 3);
        assert_eq!(rows, 7);

        let (start, rows) = usable_window(5, 0).unwrap();
        assert_eq!(start, 0);
        assert_eq!(rows, 5);
    }

    #[test]
    fn test_usable_window_insufficient() {
        // max_lag == n - 1 leaves no usable rows
        let result = usable_window(5, 4);
        assert!(matches!(result, Err(ArdlError::InsufficientData { .. })));
        let result = usable_window(5, 10);
        assert!(matches!(result, Err(ArdlError::InsufficientData { .. })));
        let result = usable_window(1, 0);
        assert!(matches!(result, Err(ArdlError::InsufficientData { .. })));
    }
}
