//! Rule ID validation shared by scaffolding front ends.
//!
//! Pure checks only — prompting and presentation belong to the caller.

pub const RULE_ID_MAX_LENGTH: usize = 64;

/// Prefixes reserved for built-in rules; user-defined IDs must not use
/// them.
const RESERVED_PREFIXES: &[&str] = &["FG_R"];

/// Why a candidate rule ID was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleIdError {
    #[error("rule ID must not be empty")]
    Empty,

    #[error("rule ID exceeds max length of {RULE_ID_MAX_LENGTH} characters")]
    TooLong,

    #[error("rule ID must start with a letter")]
    MustStartWithLetter,

    #[error("rule ID must only contain letters, numbers, dashes (-), or underscores (_)")]
    InvalidCharacter,

    #[error("rule ID has reserved prefix '{0}'")]
    ReservedPrefix(&'static str),

    #[error("rule with ID {0} already exists in this project")]
    DuplicateId(String),

    #[error("rule with directory {0} already exists in this project")]
    DuplicateDir(String),
}

/// Validates a candidate rule ID against the naming rules and against the
/// IDs and rule directories already present in the project.
pub fn validate_rule_id(
    rule_id: &str,
    existing_ids: &[String],
    existing_dirs: &[String],
) -> Result<(), RuleIdError> {
    if rule_id.is_empty() {
        return Err(RuleIdError::Empty);
    }
    if rule_id.len() > RULE_ID_MAX_LENGTH {
        return Err(RuleIdError::TooLong);
    }
    if !rule_id
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
    {
        return Err(RuleIdError::MustStartWithLetter);
    }
    if !rule_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RuleIdError::InvalidCharacter);
    }
    for &prefix in RESERVED_PREFIXES {
        if rule_id.starts_with(prefix) {
            return Err(RuleIdError::ReservedPrefix(prefix));
        }
    }
    if let Some(existing) = existing_ids.iter().find(|id| *id == rule_id) {
        return Err(RuleIdError::DuplicateId(existing.clone()));
    }
    if let Some(existing) = existing_dirs.iter().find(|dir| *dir == rule_id) {
        return Err(RuleIdError::DuplicateDir(existing.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_ids() {
        for id in ["ACMECORP_001", "a", "Rule-1_b", "X123"] {
            assert_eq!(validate_rule_id(id, &[], &[]), Ok(()), "{id}");
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        let long = "A".repeat(RULE_ID_MAX_LENGTH + 1);
        let cases = [
            ("", RuleIdError::Empty),
            (long.as_str(), RuleIdError::TooLong),
            ("1RULE", RuleIdError::MustStartWithLetter),
            ("_RULE", RuleIdError::MustStartWithLetter),
            ("RULE 1", RuleIdError::InvalidCharacter),
            ("RULE.1", RuleIdError::InvalidCharacter),
            ("FG_R001", RuleIdError::ReservedPrefix("FG_R")),
        ];
        for (id, expected) in cases {
            assert_eq!(validate_rule_id(id, &[], &[]), Err(expected), "{id:?}");
        }
    }

    #[test]
    fn max_length_id_is_accepted() {
        let id = "A".repeat(RULE_ID_MAX_LENGTH);
        assert_eq!(validate_rule_id(&id, &[], &[]), Ok(()));
    }

    #[test]
    fn rejects_duplicates() {
        let ids = vec!["TAKEN_ID".to_string()];
        let dirs = vec!["TAKEN_DIR".to_string()];

        assert_eq!(
            validate_rule_id("TAKEN_ID", &ids, &dirs),
            Err(RuleIdError::DuplicateId("TAKEN_ID".into()))
        );
        assert_eq!(
            validate_rule_id("TAKEN_DIR", &ids, &dirs),
            Err(RuleIdError::DuplicateDir("TAKEN_DIR".into()))
        );
        assert_eq!(validate_rule_id("FRESH_ID", &ids, &dirs), Ok(()));
    }
}
