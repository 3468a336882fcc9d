//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::{GraphError, Result};

/// Options fixed when an [`Engine`](crate::Engine) is built.
///
/// ```
/// use graphpack::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "references": false }"#).unwrap();
/// assert!(!config.references);
/// assert_eq!(config.max_depth, 512);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Track shared and cyclic objects with back-references.
    pub references: bool,
    /// Nesting bound for encode, decode and copy.
    pub max_depth: usize,
    /// Preserve sharing inside deep copies.
    pub copy_references: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            references: true,
            max_depth: DEFAULT_MAX_DEPTH,
            copy_references: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| GraphError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(GraphError::Config("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = EngineConfig::from_json(r#"{ "max_depth": 0 }"#).unwrap_err();
        assert!(matches!(err, GraphError::Config(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EngineConfig::from_json(r#"{ "refs": true }"#).is_err());
    }
}
