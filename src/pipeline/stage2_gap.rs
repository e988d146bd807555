use serde::Serialize;

use crate::model::points::Points;
use crate::model::prediction::Top3;
use crate::model::scores::{GapPolicy, ModelScoreMap, PairGaps, RANK_PAIRS, TOP3_TOTAL};

// Absorbs float error so a gap equal to the threshold in decimal counts as close.
const GAP_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAdjustment {
    pub scores: ModelScoreMap,
    pub policy: GapPolicy,
    pub gaps: PairGaps,
}

/// `|a - b|` over the mean of `a` and `b`. Two zero probabilities have gap 0.
pub fn relative_gap(a: f64, b: f64) -> f64 {
    let mean = (a + b) / 2.0;
    if mean <= 0.0 {
        return 0.0;
    }
    (a - b).abs() / mean
}

pub fn pair_gaps(top3: &Top3) -> PairGaps {
    let p = top3.probabilities();
    RANK_PAIRS.map(|(i, j)| relative_gap(p[i], p[j]))
}

/// Flattens points among labels whose probabilities are indistinguishable.
///
/// - all three pairs close: every label gets 2
/// - one pair close: that pair shares its points evenly, the third label is kept
/// - two pairs close: the closer pair is split as in the one-pair case; on
///   equal gaps the pair with better ranks wins
/// - no pair close: points unchanged
///
/// The total stays at 6 in every case.
pub fn adjust_gaps(top3: &Top3, initial: &ModelScoreMap, threshold: f64) -> GapAdjustment {
    let gaps = pair_gaps(top3);
    let close = gaps.map(|g| g <= threshold + GAP_TOLERANCE);
    let n_close = close.iter().filter(|&&c| c).count();

    let mut scores = initial.clone();
    let policy = match n_close {
        0 => GapPolicy::Untouched,
        3 => {
            let share = Points::from_halves(TOP3_TOTAL.halves() / 3);
            for entry in scores.0.iter_mut() {
                entry.points = share;
            }
            GapPolicy::Flattened
        }
        _ => {
            let mut chosen: Option<usize> = None;
            for (pair, &is_close) in close.iter().enumerate() {
                if !is_close {
                    continue;
                }
                match chosen {
                    Some(best) if gaps[pair] >= gaps[best] => {}
                    _ => chosen = Some(pair),
                }
            }
            match chosen.and_then(|pair| split_pair(&mut scores, pair)) {
                Some(ranks) => GapPolicy::PairSplit { ranks },
                None => GapPolicy::Untouched,
            }
        }
    };

    debug_assert_eq!(scores.total(), TOP3_TOTAL);
    tracing::trace!(?gaps, ?policy, "gap adjustment");

    GapAdjustment {
        scores,
        policy,
        gaps,
    }
}

fn split_pair(scores: &mut ModelScoreMap, pair: usize) -> Option<[u8; 2]> {
    let (i, j) = RANK_PAIRS[pair];
    let share = Points::split_even(scores.0[i].points, scores.0[j].points)?;
    scores.0[i].points = share;
    scores.0[j].points = share;
    Some([i as u8 + 1, j as u8 + 1])
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_gap.rs"]
mod tests;
