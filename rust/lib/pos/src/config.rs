//! Cart engine configuration.
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! defaults below.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PosError;

/// Tunables for the item cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosConfig {
    /// Upper bound for a discount percentage typed on the numpad.
    pub discount_limit: f64,

    /// How long a pressed digit/action key stays highlighted, in milliseconds.
    pub flash_ms: u64,

    /// Line descriptions longer than this are truncated with an ellipsis.
    pub description_limit: usize,

    /// Decimal places used when formatting amounts.
    pub precision: usize,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            discount_limit: 100.0,
            flash_ms: 100,
            description_limit: 45,
            precision: 2,
        }
    }
}

impl PosConfig {
    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, PosError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config from a TOML string.
    pub fn parse(content: &str) -> Result<Self, PosError> {
        let config: PosConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn flash_delay(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    fn validate(&self) -> Result<(), PosError> {
        if !self.discount_limit.is_finite() || self.discount_limit < 0.0 {
            return Err(PosError::Config(format!(
                "discount_limit must be a non-negative number, got {}",
                self.discount_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = PosConfig::default();
        assert_eq!(c.discount_limit, 100.0);
        assert_eq!(c.flash_delay(), Duration::from_millis(100));
        assert_eq!(c.description_limit, 45);
        assert_eq!(c.precision, 2);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = PosConfig::parse("flash_ms = 250\n").unwrap();
        assert_eq!(c.flash_ms, 250);
        assert_eq!(c.discount_limit, 100.0);
    }

    #[test]
    fn rejects_negative_discount_limit() {
        let err = PosConfig::parse("discount_limit = -1.0").unwrap_err();
        assert!(matches!(err, PosError::Config(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = PosConfig::parse("flash_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, PosError::Config(_)));
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = PosConfig::load(&dir.path().join("pos.toml")).unwrap();
        assert_eq!(c, PosConfig::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pos.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "discount_limit = 50.0").unwrap();
        writeln!(f, "description_limit = 20").unwrap();

        let c = PosConfig::load(&path).unwrap();
        assert_eq!(c.discount_limit, 50.0);
        assert_eq!(c.description_limit, 20);
        assert_eq!(c.flash_ms, 100);
    }
}
