//! Validation helpers for DTOs.

use indexmap::IndexMap;
use validator::ValidationError;

use crate::state::score::structural_error;

/// Validates that a score mapping names at least one player and no blank names.
///
/// # Examples
///
/// ```ignore
/// validate_score_map(&[("Winz".into(), 0)].into()) // Ok
/// validate_score_map(&IndexMap::new())            // Err - no players
/// validate_score_map(&[(" ".into(), 0)].into())    // Err - blank name
/// ```
pub fn validate_score_map(scores: &IndexMap<String, i64>) -> Result<(), ValidationError> {
    match structural_error(scores.keys().map(String::as_str)) {
        None => Ok(()),
        Some(problem) => {
            let mut err = ValidationError::new(problem.code());
            err.message = Some(problem.message().into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_score_map_valid() {
        let scores: IndexMap<String, i64> = [("Winz".into(), 5), ("Finn".into(), -5)].into();
        assert!(validate_score_map(&scores).is_ok());
    }

    #[test]
    fn test_validate_score_map_empty() {
        let err = validate_score_map(&IndexMap::new()).unwrap_err();
        assert_eq!(err.code, "scores_empty");
    }

    #[test]
    fn test_validate_score_map_blank_name() {
        let scores: IndexMap<String, i64> = [("  ".into(), 0)].into();
        let err = validate_score_map(&scores).unwrap_err();
        assert_eq!(err.code, "player_name_blank");
    }
}
