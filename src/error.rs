use thiserror::Error;

use crate::model::modality::Modality;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    #[error("invalid {modality} input: {reason}")]
    InvalidInput { modality: Modality, reason: String },

    #[error("no modalities available for fusion")]
    NoModalitiesAvailable,

    #[error("weight configuration error: {0}")]
    WeightConfigurationError(String),

    #[error("invalid fusion configuration: {0}")]
    InvalidConfiguration(String),
}

impl FusionError {
    pub fn invalid(modality: Modality, reason: impl Into<String>) -> Self {
        FusionError::InvalidInput {
            modality,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FusionError::InvalidInput { .. } => "invalid_input",
            FusionError::NoModalitiesAvailable => "no_modalities_available",
            FusionError::WeightConfigurationError(_) => "weight_configuration_error",
            FusionError::InvalidConfiguration(_) => "invalid_configuration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("label catalog is empty")]
    Empty,

    #[error("label catalog entry {0} has an empty id")]
    EmptyId(usize),

    #[error("label catalog has duplicate id {0:?}")]
    DuplicateId(String),
}
