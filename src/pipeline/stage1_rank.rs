use crate::error::FusionError;
use crate::model::label::LabelCatalog;
use crate::model::modality::Modality;
use crate::model::points::Points;
use crate::model::prediction::{LabelProbability, RankedPrediction, Top3};
use crate::model::scores::{ModelScoreMap, ScoredLabel};

const RANK_POINTS: [Points; 3] = [Points::whole(3), Points::whole(2), Points::whole(1)];

/// Checks one model's output and keeps its first three entries.
pub fn validate_top3(
    modality: Modality,
    predictions: &[LabelProbability],
    catalog: &LabelCatalog,
) -> Result<Top3, FusionError> {
    if predictions.len() < 3 {
        return Err(FusionError::invalid(
            modality,
            format!("expected at least 3 predictions, got {}", predictions.len()),
        ));
    }

    let mut ranked = Vec::with_capacity(3);
    for (rank, entry) in predictions.iter().take(3).enumerate() {
        let p = entry.probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(FusionError::invalid(
                modality,
                format!("rank {} probability {} is outside [0, 1]", rank + 1, p),
            ));
        }
        let label = catalog.resolve(&entry.label).ok_or_else(|| {
            FusionError::invalid(modality, format!("unknown label {:?}", entry.label))
        })?;
        if ranked.iter().any(|r: &RankedPrediction| r.label == label) {
            return Err(FusionError::invalid(
                modality,
                format!("duplicate label {} in top-3", label),
            ));
        }
        if let Some(prev) = ranked.last() {
            if p > prev.probability {
                return Err(FusionError::invalid(
                    modality,
                    format!("top-3 not sorted: rank {} exceeds rank {}", rank + 1, rank),
                ));
            }
        }
        ranked.push(RankedPrediction {
            label,
            probability: p,
        });
    }

    let [first, second, third]: [RankedPrediction; 3] = ranked
        .try_into()
        .map_err(|_| FusionError::invalid(modality, "top-3 truncated"))?;
    Ok(Top3([first, second, third]))
}

/// Rank 1 gets 3 points, rank 2 gets 2, rank 3 gets 1.
pub fn score_ranks(top3: &Top3) -> ModelScoreMap {
    let e = top3.entries();
    ModelScoreMap([
        ScoredLabel {
            label: e[0].label.clone(),
            points: RANK_POINTS[0],
        },
        ScoredLabel {
            label: e[1].label.clone(),
            points: RANK_POINTS[1],
        },
        ScoredLabel {
            label: e[2].label.clone(),
            points: RANK_POINTS[2],
        },
    ])
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_rank.rs"]
mod tests;
