//! Opaque caller-defined user identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A caller-defined user identifier, numeric or textual.
///
/// Storage never interprets the value; it is carried verbatim in the
/// record and handed back on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uid {
    /// Numeric identity (e.g. an auto-increment database id).
    Number(i64),
    /// Textual identity (e.g. a UUID or username).
    Text(String),
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Uid {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Uid {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Uid {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_forms_serialize_distinctly() {
        assert_eq!(serde_json::to_string(&Uid::from(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&Uid::from("u-42")).unwrap(), "\"u-42\"");
    }

    #[test]
    fn untagged_deserialization_picks_the_right_variant() {
        let n: Uid = serde_json::from_str("42").unwrap();
        assert_eq!(n, Uid::Number(42));
        let s: Uid = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(s, Uid::Text("42".to_string()));
    }
}
