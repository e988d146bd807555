use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::label::{LabelCatalog, LabelId};
use crate::model::modality::Modality;
use crate::model::prediction::Top3;
use crate::model::preset::ModelPreset;
use crate::model::scores::{FusedScoreMap, GapPolicy, ModalityScoreMap, ModelScoreMap, PairGaps};
use crate::pipeline::stage4_fusion::{FusionOutcome, RankedLabel};

const TOP_PREDICTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub label: LabelId,
    pub name: String,
    /// The fused score, not a probability.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelTrail {
    pub modality: Modality,
    pub model: String,
    pub top3: Top3,
    pub initial: ModelScoreMap,
    pub adjusted: ModelScoreMap,
    pub adjustment: GapPolicy,
    pub gaps: PairGaps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedInput {
    pub modality: Modality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub diagnosis: Diagnosis,
    pub top_predictions: Vec<RankedLabel>,
    pub ranking: Vec<RankedLabel>,
    pub combined_scores: FusedScoreMap,
    pub modality_scores: BTreeMap<Modality, ModalityScoreMap>,
    pub model_scores: Vec<ModelTrail>,
    pub weights_used: BTreeMap<Modality, f64>,
    pub top_modality: Modality,
    pub excluded: Vec<ExcludedInput>,
}

#[derive(Debug, Clone)]
pub struct AssemblyInputs<'a> {
    pub request_id: Option<&'a str>,
    pub preset: Option<&'a ModelPreset>,
    pub catalog: &'a LabelCatalog,
    pub models: &'a [ModelTrail],
    pub modalities: &'a BTreeMap<Modality, ModalityScoreMap>,
    pub outcome: &'a FusionOutcome,
    pub excluded: &'a [ExcludedInput],
}

pub fn assemble_result(inputs: &AssemblyInputs<'_>) -> FusionResult {
    let outcome = inputs.outcome;
    let winner = &outcome.winner;

    FusionResult {
        id: inputs.request_id.map(str::to_string),
        preset: inputs.preset.map(|p| p.name.to_string()),
        diagnosis: Diagnosis {
            label: winner.label.clone(),
            name: inputs.catalog.display_name(&winner.label).to_string(),
            confidence: winner.score,
        },
        top_predictions: outcome
            .ranking
            .iter()
            .take(TOP_PREDICTIONS)
            .cloned()
            .collect(),
        ranking: outcome.ranking.clone(),
        combined_scores: outcome.fused.clone(),
        modality_scores: inputs.modalities.clone(),
        model_scores: inputs.models.to_vec(),
        weights_used: outcome.weights_used.clone(),
        top_modality: outcome.top_modality,
        excluded: inputs.excluded.to_vec(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_assemble.rs"]
mod tests;
