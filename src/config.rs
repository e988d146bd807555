use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FusionError;
use crate::model::modality::{Modality, modality_order};

pub const DEFAULT_TEXT_WEIGHT: f64 = 0.6;
pub const DEFAULT_IMAGE_WEIGHT: f64 = 0.4;
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.10;
pub const DEFAULT_TIE_EPSILON: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Weights(#[from] FusionError),

    #[error("gap threshold must be finite and non-negative, got {0}")]
    GapThreshold(f64),

    #[error("tie epsilon must be finite and non-negative, got {0}")]
    TieEpsilon(f64),
}

/// Per-modality fusion weights. Defaults to text 0.6, image 0.4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalityWeights {
    pub text: f64,
    pub image: f64,
}

impl Default for ModalityWeights {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_WEIGHT,
            image: DEFAULT_IMAGE_WEIGHT,
        }
    }
}

impl ModalityWeights {
    pub fn get(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Text => self.text,
            Modality::Image => self.image,
        }
    }

    pub fn set(&mut self, modality: Modality, weight: f64) {
        match modality {
            Modality::Text => self.text = weight,
            Modality::Image => self.image = weight,
        }
    }

    pub fn validate(&self) -> Result<(), FusionError> {
        let mut sum = 0.0;
        for &modality in modality_order() {
            let w = self.get(modality);
            if !w.is_finite() {
                return Err(FusionError::WeightConfigurationError(format!(
                    "{modality} weight is not finite"
                )));
            }
            if w < 0.0 {
                return Err(FusionError::WeightConfigurationError(format!(
                    "{modality} weight is negative ({w})"
                )));
            }
            sum += w;
        }
        if sum <= 0.0 {
            return Err(FusionError::WeightConfigurationError(
                "weights sum to zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Weights of the present modalities rescaled to sum to 1. A single
    /// present modality gets exactly 1.0.
    pub fn renormalized(
        &self,
        present: &[Modality],
    ) -> Result<BTreeMap<Modality, f64>, FusionError> {
        self.validate()?;
        if present.is_empty() {
            return Err(FusionError::NoModalitiesAvailable);
        }
        let sum: f64 = present.iter().map(|&m| self.get(m)).sum();
        if sum <= 0.0 {
            let names = present
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(FusionError::WeightConfigurationError(format!(
                "weights of present modalities ({names}) sum to zero"
            )));
        }
        if present.len() == 1 {
            return Ok(BTreeMap::from([(present[0], 1.0)]));
        }
        Ok(present
            .iter()
            .map(|&m| (m, self.get(m) / sum))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub weights: ModalityWeights,
    /// Pairs whose relative probability gap is at or below this are close.
    pub gap_threshold: f64,
    /// Fused scores closer than this are treated as tied.
    pub tie_epsilon: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: ModalityWeights::default(),
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            tie_epsilon: DEFAULT_TIE_EPSILON,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if !self.gap_threshold.is_finite() || self.gap_threshold < 0.0 {
            return Err(ConfigError::GapThreshold(self.gap_threshold));
        }
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ConfigError::TieEpsilon(self.tie_epsilon));
        }
        Ok(())
    }

    /// Same checks as [`FusionConfig::validate`], reported as a fusion error.
    pub fn validate_for_fusion(&self) -> Result<(), FusionError> {
        self.validate().map_err(|err| match err {
            ConfigError::Weights(err) => err,
            other => FusionError::InvalidConfiguration(other.to_string()),
        })
    }
}

pub fn load_config(path: &Path) -> Result<FusionConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: FusionConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
