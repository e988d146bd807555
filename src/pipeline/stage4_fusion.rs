use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::ModalityWeights;
use crate::error::FusionError;
use crate::model::label::LabelId;
use crate::model::modality::Modality;
use crate::model::points::Points;
use crate::model::scores::{FusedScoreMap, ModalityScoreMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLabel {
    pub label: LabelId,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    pub winner: RankedLabel,
    pub fused: FusedScoreMap,
    /// Every fused label in decision order.
    pub ranking: Vec<RankedLabel>,
    pub weights_used: BTreeMap<Modality, f64>,
    pub top_modality: Modality,
}

struct Candidate<'a> {
    label: &'a LabelId,
    score: f64,
    top_points: Points,
}

/// Weighted cross-modal combination of modality score maps.
///
/// Absent modalities drop out and the remaining weights are rescaled to
/// sum to 1. Labels missing from a modality count 0 there.
///
/// Ordering contract: higher fused score first; scores within
/// `tie_epsilon` are tied and resolved by the higher points in the top
/// modality (largest weight, text on equal weights), then by the
/// lexicographically smaller label id.
pub fn fuse_modalities(
    modalities: &BTreeMap<Modality, ModalityScoreMap>,
    weights: &ModalityWeights,
    tie_epsilon: f64,
) -> Result<FusionOutcome, FusionError> {
    let present = modalities
        .iter()
        .filter(|(_, scores)| !scores.is_empty())
        .map(|(&m, _)| m)
        .collect::<Vec<_>>();
    let weights_used = weights.renormalized(&present)?;

    let mut top_modality = present[0];
    for &m in &present[1..] {
        if weights_used[&m] > weights_used[&top_modality] {
            top_modality = m;
        }
    }

    let labels = present
        .iter()
        .flat_map(|m| modalities[m].labels())
        .collect::<BTreeSet<_>>();

    let mut fused = BTreeMap::new();
    for &label in &labels {
        let score = present
            .iter()
            .map(|m| weights_used[m] * modalities[m].get(label).as_f64())
            .sum::<f64>();
        fused.insert(label.clone(), score);
    }

    let top_scores = &modalities[&top_modality];
    let mut candidates = labels
        .iter()
        .map(|&label| Candidate {
            label,
            score: fused[label],
            top_points: top_scores.get(label),
        })
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| compare_candidates(a, b, tie_epsilon));

    let ranking = candidates
        .iter()
        .map(|c| RankedLabel {
            label: c.label.clone(),
            score: c.score,
        })
        .collect::<Vec<_>>();
    let winner = ranking
        .first()
        .cloned()
        .ok_or(FusionError::NoModalitiesAvailable)?;

    tracing::debug!(
        label = %winner.label,
        score = winner.score,
        top_modality = %top_modality,
        "fused diagnosis selected"
    );

    Ok(FusionOutcome {
        winner,
        fused: FusedScoreMap(fused),
        ranking,
        weights_used,
        top_modality,
    })
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>, tie_epsilon: f64) -> Ordering {
    if (a.score - b.score).abs() > tie_epsilon {
        return b.score.total_cmp(&a.score);
    }
    b.top_points
        .cmp(&a.top_points)
        .then_with(|| a.label.cmp(b.label))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_fusion.rs"]
mod tests;
