//! CLI input validation functions.
//!
//! Used by clap's `value_parser` attribute to reject bad input at parse time.

/// Validate an issue ID argument.
///
/// IDs are looked up verbatim, so only surrounding whitespace is trimmed.
/// Empty IDs and IDs containing whitespace or control characters are
/// rejected; anything else may exist in the database.
pub fn validate_issue_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Issue ID cannot be empty".to_string());
    }

    if let Some(pos) = s
        .chars()
        .position(|c| c.is_whitespace() || c.is_control())
    {
        return Err(format!(
            "Issue ID contains whitespace or a control character at position {pos}"
        ));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("proj-abc", "proj-abc")]
    #[case("  proj-abc  ", "proj-abc")]
    #[case("bd-1.2", "bd-1.2")]
    fn test_validate_issue_id_accepts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_issue_id(input), Ok(expected.to_string()));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::inner_space("proj abc")]
    #[case::control("proj\u{7}abc")]
    fn test_validate_issue_id_rejects(#[case] input: &str) {
        assert!(validate_issue_id(input).is_err());
    }
}
