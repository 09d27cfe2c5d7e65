// ============================================================================
// Editor Configuration
// ============================================================================

use crate::error::{EditorError, EditorResult};
use crate::scale::GraphScales;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable that may point to a YAML config file
pub const CONFIG_ENV_VAR: &str = "EQGRAPH_CONFIG";

/// Graph and interaction settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Graph width in pixels
    pub width_px: f64,

    /// Graph height in pixels
    pub height_px: f64,

    /// Distance between curve samples in pixels
    pub sample_step_px: f64,

    /// Minimum time between two propagated updates during a drag
    pub throttle_ms: u64,

    /// The gain axis spans [-gain_range_db, +gain_range_db]
    pub gain_range_db: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width_px: 800.0,
            height_px: 400.0,
            sample_step_px: 2.0,
            throttle_ms: 50,
            gain_range_db: 25.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a YAML document. Missing keys take their default.
    pub fn from_yaml_str(text: &str) -> EditorResult<Self> {
        let config: EditorConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: &Path) -> EditorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EditorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Load the file named by [`CONFIG_ENV_VAR`], or the defaults when it is unset.
    pub fn from_env() -> EditorResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::debug!("loading editor config from {:?}", path);
                Self::load(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> EditorResult<()> {
        let positive = [
            ("width_px", self.width_px),
            ("height_px", self.height_px),
            ("sample_step_px", self.sample_step_px),
            ("gain_range_db", self.gain_range_db),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EditorError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Frequency and gain axes for a graph of this size.
    pub fn scales(&self) -> GraphScales {
        GraphScales::new(self.width_px, self.height_px, self.gain_range_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Scale;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.sample_step_px, 2.0);
        assert_eq!(config.throttle_interval(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = EditorConfig::from_yaml_str("width_px: 1200\nthrottle_ms: 20\n").unwrap();
        assert_eq!(config.width_px, 1200.0);
        assert_eq!(config.throttle_ms, 20);
        assert_eq!(config.height_px, 400.0);
        assert_eq!(config.gain_range_db, 25.0);
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let err = EditorConfig::from_yaml_str("height_px: 0\n").unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig(_)));
        assert!(err.to_string().contains("height_px"));

        let err = EditorConfig::from_yaml_str("sample_step_px: -2\n").unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = EditorConfig::from_yaml_str("width_px: [1, 2").unwrap_err();
        assert!(matches!(err, EditorError::ConfigParse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width_px: 640\nheight_px: 320\ngain_range_db: 12").unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.width_px, 640.0);

        let scales = config.scales();
        assert_eq!(scales.freq.range(), (0.0, 640.0));
        assert_eq!(scales.gain.forward(12.0), 0.0);
        assert_eq!(scales.gain.forward(-12.0), 320.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EditorConfig::load(Path::new("/nonexistent/eqgraph.yaml")).unwrap_err();
        match err {
            EditorError::ConfigRead { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/eqgraph.yaml"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
