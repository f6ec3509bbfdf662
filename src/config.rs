// src/config.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::PrepError;

/// Weights used to fold engagement signals into a single `successes` count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub engagement_weight: f64,
    pub click_weight: f64,
    pub conversion_weight: f64,
}

impl Weights {
    pub fn new(
        engagement_weight: f64,
        click_weight: f64,
        conversion_weight: f64,
    ) -> Result<Self, PrepError> {
        let weights = Self {
            engagement_weight,
            click_weight,
            conversion_weight,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Every weight must be finite and `>= 0`.
    pub fn validate(&self) -> Result<(), PrepError> {
        for (name, value) in [
            ("engagement_weight", self.engagement_weight),
            ("click_weight", self.click_weight),
            ("conversion_weight", self.conversion_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PrepError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Settings for a full preparation run.
///
/// ```yaml
/// weights:
///   engagement_weight: 1
///   click_weight: 2
///   conversion_weight: 10
/// reference_date: 2024-01-05   # optional, defaults to today
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    pub weights: Weights,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl PrepConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: PrepConfig = serde_yaml::from_str(text).context("parsing prep config YAML")?;
        cfg.weights.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))
    }

    /// The configured reference date, or today's local date.
    pub fn reference_date_or_today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
