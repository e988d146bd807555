pub mod stage1_rank;
pub mod stage2_gap;
pub mod stage3_modality;
pub mod stage4_fusion;
pub mod stage5_assemble;

use std::collections::BTreeMap;

use crate::config::FusionConfig;
use crate::error::FusionError;
use crate::model::label::LabelCatalog;
use crate::model::modality::Modality;
use crate::model::prediction::{FusionRequest, ModelPrediction};
use crate::model::preset::{ModelPreset, find_preset};
use crate::model::scores::ModalityScoreMap;

use stage1_rank::{score_ranks, validate_top3};
use stage2_gap::adjust_gaps;
use stage3_modality::aggregate_modality;
use stage4_fusion::fuse_modalities;
use stage5_assemble::{AssemblyInputs, ExcludedInput, FusionResult, ModelTrail, assemble_result};

/// One request of a batch together with what fusion made of it.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub index: usize,
    pub id: Option<String>,
    pub outcome: Result<FusionResult, FusionError>,
}

/// Fuses every request independently; a failed request does not stop the
/// batch.
pub fn fuse_batch(
    requests: &[FusionRequest],
    catalog: &LabelCatalog,
    config: &FusionConfig,
) -> Vec<BatchEntry> {
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let outcome = fuse(request, catalog, config);
            if let Err(err) = &outcome {
                tracing::warn!(index, id = ?request.id, "request not fused: {err}");
            }
            BatchEntry {
                index,
                id: request.id.clone(),
                outcome,
            }
        })
        .collect()
}

/// Fuses the per-model predictions of one request into a ranked diagnosis.
///
/// Invalid models and modalities are excluded and reported in the result.
/// The request fails with the modality's `InvalidInput` when it supplied a
/// single modality and that one is unusable, and with
/// `NoModalitiesAvailable` when nothing usable remains otherwise.
pub fn fuse(
    request: &FusionRequest,
    catalog: &LabelCatalog,
    config: &FusionConfig,
) -> Result<FusionResult, FusionError> {
    config.validate_for_fusion()?;

    let supplied = request.modalities.len();
    if supplied == 0 {
        return Err(FusionError::NoModalitiesAvailable);
    }

    let preset = match request.preset.as_deref() {
        Some(id) => Some(find_preset(id).ok_or_else(|| id.to_string())),
        None => None,
    };

    let mut trails: Vec<ModelTrail> = Vec::new();
    let mut excluded: Vec<ExcludedInput> = Vec::new();
    let mut modality_scores: BTreeMap<Modality, ModalityScoreMap> = BTreeMap::new();
    let mut first_error: Option<FusionError> = None;

    for (&modality, models) in &request.modalities {
        let start = trails.len();
        let mut modality_error: Option<FusionError> = None;

        if models.is_empty() {
            modality_error = Some(FusionError::invalid(modality, "no model predictions"));
        }
        for prediction in models {
            let scored = match &preset {
                Some(Err(unknown)) => Err(FusionError::invalid(
                    modality,
                    format!("unknown preset {unknown:?}"),
                )),
                Some(Ok(p)) => score_model(modality, prediction, catalog, config, Some(*p)),
                None => score_model(modality, prediction, catalog, config, None),
            };
            match scored {
                Ok(trail) => trails.push(trail),
                Err(err) => {
                    tracing::warn!(%modality, model = %prediction.model, "excluding model: {err}");
                    excluded.push(ExcludedInput {
                        modality,
                        model: Some(prediction.model.clone()),
                        reason: err.to_string(),
                    });
                    modality_error.get_or_insert(err);
                }
            }
        }

        let valid = &trails[start..];
        if valid.is_empty() {
            tracing::warn!(%modality, "excluding modality: no valid model output");
            if models.is_empty() {
                excluded.push(ExcludedInput {
                    modality,
                    model: None,
                    reason: "no model predictions".to_string(),
                });
            }
            if let Some(err) = modality_error {
                first_error.get_or_insert(err);
            }
            continue;
        }
        modality_scores.insert(modality, aggregate_modality(valid.iter().map(|t| &t.adjusted)));
    }

    if modality_scores.is_empty() {
        return Err(match (supplied, first_error) {
            (1, Some(err)) => err,
            _ => FusionError::NoModalitiesAvailable,
        });
    }

    let outcome = fuse_modalities(&modality_scores, &config.weights, config.tie_epsilon)?;

    Ok(assemble_result(&AssemblyInputs {
        request_id: request.id.as_deref(),
        preset: preset.and_then(Result::ok),
        catalog,
        models: &trails,
        modalities: &modality_scores,
        outcome: &outcome,
        excluded: &excluded,
    }))
}

fn score_model(
    modality: Modality,
    prediction: &ModelPrediction,
    catalog: &LabelCatalog,
    config: &FusionConfig,
    preset: Option<&ModelPreset>,
) -> Result<ModelTrail, FusionError> {
    if let Some(p) = preset {
        if !p.accepts(modality, &prediction.model) {
            return Err(FusionError::invalid(
                modality,
                format!("model {:?} is not part of preset {}", prediction.model, p.id),
            ));
        }
    }

    let top3 = validate_top3(modality, &prediction.predictions, catalog)?;
    let initial = score_ranks(&top3);
    let adjustment = adjust_gaps(&top3, &initial, config.gap_threshold);

    tracing::debug!(
        %modality,
        model = %prediction.model,
        adjustment = %adjustment.policy.describe(),
        "model scored"
    );

    Ok(ModelTrail {
        modality,
        model: prediction.model.clone(),
        top3,
        initial,
        adjusted: adjustment.scores,
        adjustment: adjustment.policy,
        gaps: adjustment.gaps,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/fuse.rs"]
mod tests;
