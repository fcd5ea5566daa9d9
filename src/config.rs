use std::{fs, path::Path};

use serde::Deserialize;

use crate::{Result, model::Position};

/// Canvas behavior configuration.
///
/// Everything here has a sensible default; hosts typically construct the
/// store with `CanvasConfig::default()` and only reach for a TOML file when
/// embedding the canvas in a larger product.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// offset applied to a duplicated node's position, on both axes
    pub duplicate_offset: f64,
    /// maximum number of history snapshots kept; unbounded when absent
    pub history_limit: Option<usize>,
    /// initial position of the seeded start node
    pub start_position: Position,
    /// initial position of the seeded end node
    pub end_position: Position,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            duplicate_offset: 100.0,
            history_limit: None,
            start_position: Position::new(50.0, 200.0),
            end_position: Position::new(1000.0, 200.0),
        }
    }
}

impl CanvasConfig {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<CanvasConfig>(toml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.duplicate_offset, 100.0);
        assert!(config.history_limit.is_none());
        assert_eq!(config.start_position, Position::new(50.0, 200.0));
        assert_eq!(config.end_position, Position::new(1000.0, 200.0));
    }

    #[test]
    fn test_load_from_str() {
        let toml_str = r#"
            duplicate_offset = 50.0
            history_limit = 32

            [start_position]
            x = 0.0
            y = 100.0
        "#;
        let config = CanvasConfig::load_from_str(toml_str).unwrap();
        assert_eq!(config.duplicate_offset, 50.0);
        assert_eq!(config.history_limit, Some(32));
        assert_eq!(config.start_position, Position::new(0.0, 100.0));
        // unset sections fall back to defaults
        assert_eq!(config.end_position, Position::new(1000.0, 200.0));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        assert!(CanvasConfig::load_from_str("duplicate_offset = \"wide\"").is_err());
    }
}
