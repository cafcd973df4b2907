use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::DEFAULT_REFERENCE_IPD_MM;
use crate::discord::{DiscordThresholds, ACTIVITY_THRESHOLD, HYPERACTIVITY_THRESHOLD};
use crate::error::{Error, Result};

/// Caller-tunable engine settings.
///
/// Missing fields in a JSON file take their defaults, so `{}` is a valid
/// configuration.
///
/// # Usage
///
/// ```ignore
/// let config = EngineConfig::builder()
///     .reference_ipd_mm(61.0)
///     .hyperactivity_threshold(0.7)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Physical eye-centre distance the detection is scaled to, in mm.
    pub reference_ipd_mm: f64,
    /// Zone score a zone must exceed to count as active.
    pub activity_threshold: f64,
    /// Zone score a zone must exceed to count as hyperactive.
    pub hyperactivity_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_ipd_mm: DEFAULT_REFERENCE_IPD_MM,
            activity_threshold: ACTIVITY_THRESHOLD,
            hyperactivity_threshold: HYPERACTIVITY_THRESHOLD,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.reference_ipd_mm.is_finite() || self.reference_ipd_mm <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "reference_ipd_mm must be a positive number, got {}",
                self.reference_ipd_mm
            )));
        }
        self.discord_thresholds().map(|_| ())
    }

    pub fn discord_thresholds(&self) -> Result<DiscordThresholds> {
        DiscordThresholds::new(self.activity_threshold, self.hyperactivity_threshold)
    }
}

/// Builder for an [`EngineConfig`], validated on `build`.
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn reference_ipd_mm(mut self, mm: f64) -> Self {
        self.config.reference_ipd_mm = mm;
        self
    }

    pub fn activity_threshold(mut self, threshold: f64) -> Self {
        self.config.activity_threshold = threshold;
        self
    }

    pub fn hyperactivity_threshold(mut self, threshold: f64) -> Self {
        self.config.hyperactivity_threshold = threshold;
        self
    }

    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.reference_ipd_mm, 63.0);
        assert_eq!(c.activity_threshold, 0.15);
        assert_eq!(c.hyperactivity_threshold, 0.65);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = EngineConfig::from_json_str(r#"{"reference_ipd_mm": 60.5}"#).unwrap();
        assert_eq!(c.reference_ipd_mm, 60.5);
        assert_eq!(c.hyperactivity_threshold, 0.65);
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn builder_validates() {
        assert!(EngineConfig::builder().reference_ipd_mm(0.0).build().is_err());
        assert!(EngineConfig::builder().reference_ipd_mm(f64::NAN).build().is_err());
        assert!(EngineConfig::builder()
            .activity_threshold(0.7)
            .hyperactivity_threshold(0.6)
            .build()
            .is_err());
        assert!(EngineConfig::builder().hyperactivity_threshold(1.2).build().is_err());

        let c = EngineConfig::builder()
            .activity_threshold(0.1)
            .hyperactivity_threshold(0.8)
            .build()
            .unwrap();
        assert_eq!(c.discord_thresholds().unwrap().hyperactivity(), 0.8);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{"activity_threshold": -0.1}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn save_and_load() {
        let path =
            std::env::temp_dir().join(format!("fas-face-config-{}.json", std::process::id()));
        let c = EngineConfig::builder().reference_ipd_mm(64.2).build().unwrap();
        c.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, c);
    }
}
