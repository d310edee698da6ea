//! Shared primitive types used across the skills matrix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role profile identifier ("123", "125", ...).
pub type RoleId = String;

/// Employee identifier.
pub type EmployeeId = String;

/// A normalized skill title.
///
/// Titles are the join key between the catalog, role requirements and
/// employee records. Every store keys by `SkillKey`, so "React", " react "
/// and "REACT" all address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SkillKey(String);

impl SkillKey {
    pub fn new(title: &str) -> Self {
        Self(normalize_title(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SkillKey {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for SkillKey {
    fn from(title: String) -> Self {
        Self::new(&title)
    }
}

impl From<SkillKey> for String {
    fn from(key: SkillKey) -> Self {
        key.0
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim, collapse inner whitespace, lowercase.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_normalize_case_and_whitespace() {
        assert_eq!(SkillKey::new("  Machine   Learning "), SkillKey::new("machine learning"));
        assert_eq!(SkillKey::new("TypeScript").as_str(), "typescript");
    }

    #[test]
    fn deserialized_keys_are_normalized() {
        let key: SkillKey = serde_json::from_str("\" Amazon  Web Services \"").unwrap();
        assert_eq!(key.as_str(), "amazon web services");
    }
}
