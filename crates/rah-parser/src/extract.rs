//! Feature vector extractor.
//!
//! Slices exactly `kind.arity()` tokens out of a record and coerces them to
//! `f64`. Tokens past the slice are never looked at, so extra trailing
//! fields on a line cannot leak into a vector.

use rah_types::{DatasetError, FeatureKind, FeatureVector};

/// Extract a `kind` feature vector from `tokens[start..start + arity]`.
///
/// # Errors
///
/// - [`DatasetError::InsufficientTokens`] when fewer than `arity` tokens
///   remain from `start`.
/// - [`DatasetError::InvalidFeatureValue`] when a token is not a number.
///
/// # Example
///
/// ```
/// use rah_parser::extract::extract;
/// use rah_types::FeatureKind;
///
/// let line = "a b 1 2 3 4 5 6 7 8 9 trailing";
/// let tokens: Vec<&str> = line.split_whitespace().collect();
/// let scan = extract(&tokens, 2, FeatureKind::ObservationScan).unwrap();
/// assert_eq!(scan.len(), 9);
/// assert_eq!(scan[8], 9.0);
/// ```
pub fn extract<S: AsRef<str>>(
    tokens: &[S],
    start: usize,
    kind: FeatureKind,
) -> Result<FeatureVector, DatasetError> {
    let needed = kind.arity();
    let available = tokens.len().saturating_sub(start);
    if available < needed {
        return Err(DatasetError::InsufficientTokens {
            kind,
            start,
            needed,
            available,
        });
    }

    let values = tokens[start..start + needed]
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let raw = token.as_ref();
            raw.parse::<f64>().map_err(|_| DatasetError::InvalidFeatureValue {
                kind,
                index,
                value: raw.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    FeatureVector::from_values(kind, values).ok_or(DatasetError::InsufficientTokens {
        kind,
        start,
        needed,
        available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i}.5")).collect()
    }

    #[test]
    fn extracts_exactly_arity_ignoring_trailing_tokens() {
        let tokens = numbered(4 + 32 + 7);
        let fv = extract(&tokens, 4, FeatureKind::Object).unwrap();
        assert_eq!(fv.len(), 32);
        assert_eq!(fv[0], 4.5);
        assert_eq!(fv[31], 35.5);
    }

    #[test]
    fn short_input_is_insufficient_tokens() {
        let tokens = numbered(7 + 10);
        let err = extract(&tokens, 7, FeatureKind::Relation).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InsufficientTokens { needed: 11, available: 10, start: 7, .. }
        ));
    }

    #[test]
    fn start_past_end_is_insufficient_tokens() {
        let tokens = numbered(3);
        assert!(matches!(
            extract(&tokens, 10, FeatureKind::ObservationScan),
            Err(DatasetError::InsufficientTokens { available: 0, .. })
        ));
    }

    #[test]
    fn non_numeric_token_is_reported_with_its_index() {
        let mut tokens = numbered(9);
        tokens[4] = "n/a".to_string();
        let err = extract(&tokens, 0, FeatureKind::ObservationScan).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidFeatureValue { index: 4, ref value, .. } if value == "n/a"
        ));
    }

    #[test]
    fn values_round_trip_through_display() {
        let tokens = ["0.1", "-2.5e-3", "17", "1e10", "0", "3.14159", "0.000001", "42.0", "7"];
        let fv = extract(&tokens, 0, FeatureKind::ObservationScan).unwrap();
        for v in fv.values() {
            let repr = v.to_string();
            assert_eq!(repr.parse::<f64>().unwrap().to_string(), repr);
        }
    }
}
