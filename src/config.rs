//! Engine Configuration
//!
//! Tunables for the chart pipeline, loaded from JSON with environment
//! overrides. Every field has a default, so a partial JSON file (or none at
//! all) is valid.
//!
//! Environment:
//! - `BAZI_CONFIG`: path to a JSON config file
//! - `BAZI_GEO_DATA`: path to a city geo dataset (overrides the embedded one)
//! - `BAZI_DEFAULT_LONGITUDE`: fallback longitude for unresolved locations

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longitude used when a location cannot be resolved (Beijing)
    pub default_longitude: f64,

    /// Latitude reported alongside the default longitude
    pub default_latitude: f64,

    /// Meridian of the civil time zone (UTC+8)
    pub reference_longitude: f64,

    /// External geo dataset; the embedded dataset is used when absent
    pub geo_data_path: Option<PathBuf>,

    /// Earliest accepted birth year
    pub min_request_year: i32,

    /// Annual pillars are only produced inside this range
    pub liu_nian_min_year: i32,
    pub liu_nian_max_year: i32,

    /// Annual pillars are sampled on this day, safely after 立春
    pub liu_nian_sample_month: u32,
    pub liu_nian_sample_day: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_longitude: 116.4,
            default_latitude: 39.9,
            reference_longitude: 120.0,
            geo_data_path: None,
            min_request_year: 1900,
            liu_nian_min_year: 1901,
            liu_nian_max_year: 2100,
            liu_nian_sample_month: 7,
            liu_nian_sample_day: 1,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {:?}", path))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse engine config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (environment-shaped)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup("BAZI_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(path) = lookup("BAZI_GEO_DATA") {
            config.geo_data_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup("BAZI_DEFAULT_LONGITUDE") {
            config.default_longitude = raw
                .trim()
                .parse()
                .with_context(|| format!("BAZI_DEFAULT_LONGITUDE is not a number: {}", raw))?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(-180.0..=180.0).contains(&self.default_longitude) {
            anyhow::bail!("default_longitude {} outside [-180, 180]", self.default_longitude);
        }
        if self.liu_nian_min_year > self.liu_nian_max_year {
            anyhow::bail!(
                "liu_nian_min_year {} exceeds liu_nian_max_year {}",
                self.liu_nian_min_year,
                self.liu_nian_max_year
            );
        }
        if chrono::NaiveDate::from_ymd_opt(2001, self.liu_nian_sample_month, self.liu_nian_sample_day)
            .is_none()
        {
            anyhow::bail!(
                "invalid liu nian sample day {}-{}",
                self.liu_nian_sample_month,
                self.liu_nian_sample_day
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_relative_eq!(config.default_longitude, 116.4);
        assert_relative_eq!(config.reference_longitude, 120.0);
        assert_eq!(config.liu_nian_min_year, 1901);
        assert_eq!(config.liu_nian_max_year, 2100);
        assert!(config.geo_data_path.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"default_longitude": 121.47}"#).unwrap();
        assert_relative_eq!(config.default_longitude, 121.47);
        assert_eq!(config.liu_nian_sample_month, 7);
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("BAZI_GEO_DATA", "/tmp/geo.json"),
            ("BAZI_DEFAULT_LONGITUDE", "113.26"),
        ]))
        .unwrap();
        assert_eq!(config.geo_data_path, Some(PathBuf::from("/tmp/geo.json")));
        assert_relative_eq!(config.default_longitude, 113.26);
    }

    #[test]
    fn test_bad_longitude_env_is_rejected() {
        let result = EngineConfig::from_lookup(lookup_from(&[("BAZI_DEFAULT_LONGITUDE", "east")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("bazi_config_{}.json", std::process::id()));
        fs::write(&path, r#"{"liu_nian_min_year": 1950, "liu_nian_max_year": 2050}"#).unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.liu_nian_min_year, 1950);
        assert_eq!(config.liu_nian_max_year, 2050);

        fs::write(&path, r#"{"liu_nian_min_year": 2050, "liu_nian_max_year": 1950}"#).unwrap();
        assert!(EngineConfig::load(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(EngineConfig::load(Path::new("/nonexistent/bazi.json")).is_err());
    }
}
