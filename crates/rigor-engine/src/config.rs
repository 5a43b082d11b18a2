//! Engine configuration, loaded from the `[discipline]` table of `rigor.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::runtime::discipline::{Enforced, Passthrough};
use crate::runtime::Discipline;

/// Which discipline a runtime applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every declaration rule and runtime check is applied
    Enforced,
    /// Declarations are accepted as written and nothing is checked at run time
    Passthrough,
}

impl Mode {
    /// The discipline implementing this mode
    pub fn discipline(self) -> &'static dyn Discipline {
        static ENFORCED: Enforced = Enforced;
        static PASSTHROUGH: Passthrough = Passthrough;
        match self {
            Mode::Enforced => &ENFORCED,
            Mode::Passthrough => &PASSTHROUGH,
        }
    }
}

impl Default for Mode {
    /// `Enforced` when built with the `enforce` feature
    fn default() -> Self {
        if cfg!(feature = "enforce") {
            Mode::Enforced
        } else {
            Mode::Passthrough
        }
    }
}

/// `[discipline]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DisciplineConfig {
    /// Discipline mode
    pub mode: Mode,

    /// Reject friend references that name nothing declared
    pub strict_friends: bool,
}

impl Default for DisciplineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            strict_friends: true,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Discipline settings
    #[serde(default)]
    pub discipline: DisciplineConfig,
}

impl EngineConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with the given mode and default settings otherwise
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            discipline: DisciplineConfig {
                mode,
                ..DisciplineConfig::default()
            },
        }
    }

    /// Enforced configuration
    pub fn enforced() -> Self {
        Self::with_mode(Mode::Enforced)
    }

    /// Passthrough configuration
    pub fn passthrough() -> Self {
        Self::with_mode(Mode::Passthrough)
    }

    /// Toggle strict friend resolution
    pub fn strict_friends(mut self, strict: bool) -> Self {
        self.discipline.strict_friends = strict;
        self
    }

    /// Discipline mode
    pub fn mode(&self) -> Mode {
        self.discipline.mode
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::new();
        assert_eq!(config.mode(), Mode::default());
        assert!(config.discipline.strict_friends);
    }

    #[test]
    fn test_parse_full_table() {
        let config = EngineConfig::from_toml_str(
            r#"
            [discipline]
            mode = "passthrough"
            strict-friends = false
            "#,
        )
        .unwrap();
        assert_eq!(config.mode(), Mode::Passthrough);
        assert!(!config.discipline.strict_friends);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = EngineConfig::from_toml_str("[discipline]\nmode = \"enforced\"\n").unwrap();
        assert_eq!(config.mode(), Mode::Enforced);
        assert!(config.discipline.strict_friends);

        let empty = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }

    #[test]
    fn test_invalid_mode() {
        let err = EngineConfig::from_toml_str("[discipline]\nmode = \"lenient\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = EngineConfig::passthrough().strict_friends(false);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_mode_selects_discipline() {
        assert_eq!(Mode::Enforced.discipline().mode(), Mode::Enforced);
        assert_eq!(Mode::Passthrough.discipline().mode(), Mode::Passthrough);
    }
}
