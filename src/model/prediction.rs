use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::label::LabelId;
use crate::model::modality::Modality;

/// Raw (label, probability) pair as reported by an upstream classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelProbability {
    pub label: String,
    pub probability: f64,
}

impl LabelProbability {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Output of one classifier, sorted by descending probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub model: String,
    pub predictions: Vec<LabelProbability>,
}

impl ModelPrediction {
    pub fn new(model: impl Into<String>, predictions: Vec<LabelProbability>) -> Self {
        Self {
            model: model.into(),
            predictions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default)]
    pub modalities: BTreeMap<Modality, Vec<ModelPrediction>>,
}

impl FusionRequest {
    pub fn with_model(mut self, modality: Modality, prediction: ModelPrediction) -> Self {
        self.modalities.entry(modality).or_default().push(prediction);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub label: LabelId,
    pub probability: f64,
}

/// Validated top-3 of one model: distinct known labels, probabilities in
/// [0, 1], non-increasing by rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Top3(pub(crate) [RankedPrediction; 3]);

impl Top3 {
    pub fn entries(&self) -> &[RankedPrediction; 3] {
        &self.0
    }

    pub fn probabilities(&self) -> [f64; 3] {
        [self.0[0].probability, self.0[1].probability, self.0[2].probability]
    }
}
