//! Schema-wide validation settings

use serde::{Deserialize, Serialize};

/// What to do with input keys no field reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Drop unknown keys silently
    #[default]
    Ignore,
    /// Reject the record, one error per unknown key
    Forbid,
}

/// Settings applied to every field of a schema.
///
/// Fixed when the schema is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Handling of undeclared input keys.
    pub extra: ExtraPolicy,
    /// Treat every field as strict.
    pub strict: bool,
    /// Trim surrounding whitespace from string input before coercion,
    /// including list elements and dict values. Nested records follow
    /// their own schema config.
    pub strip_whitespace: bool,
}

impl SchemaConfig {
    /// Config with coercion disabled for every field.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Config rejecting undeclared input keys.
    pub fn forbid_extra() -> Self {
        Self {
            extra: ExtraPolicy::Forbid,
            ..Self::default()
        }
    }

    pub fn with_strip_whitespace(mut self) -> Self {
        self.strip_whitespace = true;
        self
    }

    pub fn with_extra(mut self, extra: ExtraPolicy) -> Self {
        self.extra = extra;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_is_lenient() {
        let config = SchemaConfig::default();
        assert_eq!(config.extra, ExtraPolicy::Ignore);
        assert!(!config.strict);
        assert!(!config.strip_whitespace);
    }

    #[test]
    fn test_named_constructors() {
        assert!(SchemaConfig::strict().strict);
        assert_eq!(SchemaConfig::forbid_extra().extra, ExtraPolicy::Forbid);
        assert!(SchemaConfig::strict().with_strip_whitespace().strip_whitespace);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: SchemaConfig = serde_json::from_str(r#"{"extra": "forbid"}"#).unwrap();
        assert_eq!(config.extra, ExtraPolicy::Forbid);
        assert!(!config.strict);
    }
}
