//! Team context parsing.
//!
//! Team-scoped pages embed `<script type="application/json" id="team-identifier">` holding a JSON
//! array. A single element selects that team; an empty array means the page is not team scoped.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a team identifier payload is rejected.
pub enum TeamIdentifierError {
    /// The payload is not valid JSON.
    #[error("failed to parse team identifier value: {0}")]
    Parse(String),
    /// The payload is JSON but not an array.
    #[error("team identifier value is not an array")]
    NotAnArray,
}

/// Parses the team identifier script payload.
///
/// # Errors
///
/// Returns [`TeamIdentifierError`] when `raw` is not a JSON array.
pub fn parse_team_identifier(raw: &str) -> Result<Option<String>, TeamIdentifierError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| TeamIdentifierError::Parse(err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(TeamIdentifierError::NotAnArray);
    };

    match items.as_slice() {
        [Value::String(id)] => Ok(Some(id.clone())),
        [other] => Ok(Some(other.to_string())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn single_element_selects_team() {
        assert_eq!(
            parse_team_identifier(r#"["2f9c"]"#),
            Ok(Some("2f9c".to_string()))
        );
        assert_eq!(parse_team_identifier("[42]"), Ok(Some("42".to_string())));
    }

    #[test]
    fn empty_or_many_elements_mean_no_team() {
        assert_eq!(parse_team_identifier("[]"), Ok(None));
        assert_eq!(parse_team_identifier(r#"["a","b"]"#), Ok(None));
    }

    #[test]
    fn non_arrays_and_garbage_are_errors() {
        assert_eq!(
            parse_team_identifier(r#"{"id":"a"}"#),
            Err(TeamIdentifierError::NotAnArray)
        );
        assert!(matches!(
            parse_team_identifier("not json"),
            Err(TeamIdentifierError::Parse(_))
        ));
    }
}
