use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{NclError, NclResult};

/// An element identifier.
///
/// Identifiers follow an NCName-like grammar: a letter or underscore,
/// followed by letters, digits, `_`, `.` or `-`. The `#` and `:` characters
/// are reserved (`#` separates an import alias from the target id).
/// Surrounding whitespace is trimmed before validation.
///
/// Identifiers are totally ordered by their text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap())
}

impl Identifier {
    /// Validate and normalize an identifier.
    pub fn new(value: &str) -> NclResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NclError::InvalidIdentifier {
                value: value.to_string(),
                reason: "identifiers must not be empty".to_string(),
            });
        }
        if !identifier_regex().is_match(trimmed) {
            return Err(NclError::InvalidIdentifier {
                value: value.to_string(),
                reason: "identifiers start with a letter or '_' and contain only letters, digits, '_', '.' or '-'"
                    .to_string(),
            });
        }
        Ok(Identifier(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Split an `alias#id` reference value into its alias and id parts.
pub fn split_alias(value: &str) -> (Option<&str>, &str) {
    match value.split_once('#') {
        Some((alias, id)) => (Some(alias), id),
        None => (None, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(Identifier::new("rgTV").is_ok());
        assert!(Identifier::new("_private").is_ok());
        assert!(Identifier::new("media.video-1").is_ok());
    }

    #[test]
    fn test_identifier_is_trimmed() {
        let id = Identifier::new("  dTV \n").unwrap();
        assert_eq!(id.as_str(), "dTV");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(matches!(
            Identifier::new(""),
            Err(NclError::InvalidIdentifier { .. })
        ));
        assert!(Identifier::new("   ").is_err());
        assert!(Identifier::new("1region").is_err());
        assert!(Identifier::new("base#rg1").is_err());
        assert!(Identifier::new("has space").is_err());
        assert!(Identifier::new("ns:name").is_err());
    }

    #[test]
    fn test_identifiers_order_lexicographically() {
        let a = Identifier::new("alpha").unwrap();
        let b = Identifier::new("beta").unwrap();
        assert!(a < b);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_split_alias() {
        assert_eq!(split_alias("base#rg1"), (Some("base"), "rg1"));
        assert_eq!(split_alias("rg1"), (None, "rg1"));
    }

    proptest! {
        #[test]
        fn prop_grammar_conforming_ids_are_accepted(value in "[A-Za-z_][A-Za-z0-9_.-]{0,24}") {
            let id = Identifier::new(&value).unwrap();
            prop_assert_eq!(id.as_str(), value.as_str());
        }

        #[test]
        fn prop_reserved_characters_are_rejected(
            head in "[A-Za-z_][a-z]{0,6}",
            tail in "[a-z]{0,6}",
            reserved in "[#:]",
        ) {
            let value = format!("{head}{reserved}{tail}");
            prop_assert!(Identifier::new(&value).is_err());
        }
    }
}
