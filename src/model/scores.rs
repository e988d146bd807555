use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::label::LabelId;
use crate::model::points::Points;

/// Points a model's top-3 always distribute, before and after adjustment.
pub const TOP3_TOTAL: Points = Points::whole(6);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredLabel {
    pub label: LabelId,
    pub points: Points,
}

/// Points of one model's top-3, in rank order. Labels outside the top-3
/// score zero for that model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelScoreMap(pub(crate) [ScoredLabel; 3]);

impl ModelScoreMap {
    pub fn entries(&self) -> &[ScoredLabel; 3] {
        &self.0
    }

    pub fn get(&self, label: &LabelId) -> Points {
        self.0
            .iter()
            .find(|s| &s.label == label)
            .map(|s| s.points)
            .unwrap_or(Points::ZERO)
    }

    pub fn points(&self) -> [Points; 3] {
        [self.0[0].points, self.0[1].points, self.0[2].points]
    }

    pub fn total(&self) -> Points {
        self.0.iter().map(|s| s.points).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModalityScoreMap(pub(crate) BTreeMap<LabelId, Points>);

impl ModalityScoreMap {
    pub fn get(&self, label: &LabelId) -> Points {
        self.0.get(label).copied().unwrap_or(Points::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LabelId, Points)> {
        self.0.iter().map(|(l, p)| (l, *p))
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelId> {
        self.0.keys()
    }

    pub fn total(&self) -> Points {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&ModelScoreMap> for ModalityScoreMap {
    fn from(model: &ModelScoreMap) -> Self {
        Self(
            model
                .entries()
                .iter()
                .map(|s| (s.label.clone(), s.points))
                .collect(),
        )
    }
}

impl FromIterator<(LabelId, Points)> for ModalityScoreMap {
    fn from_iter<I: IntoIterator<Item = (LabelId, Points)>>(iter: I) -> Self {
        let mut map = BTreeMap::new();
        for (label, points) in iter {
            *map.entry(label).or_insert(Points::ZERO) += points;
        }
        Self(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FusedScoreMap(pub(crate) BTreeMap<LabelId, f64>);

impl FusedScoreMap {
    pub fn get(&self, label: &LabelId) -> f64 {
        self.0.get(label).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LabelId, f64)> {
        self.0.iter().map(|(l, s)| (l, *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Relative gaps of the pairs (1,2), (1,3), (2,3).
pub type PairGaps = [f64; 3];

pub const RANK_PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum GapPolicy {
    Untouched,
    /// The two ranks (1-based) whose points were pooled and split.
    PairSplit { ranks: [u8; 2] },
    Flattened,
}

impl GapPolicy {
    pub fn describe(self) -> String {
        match self {
            GapPolicy::Untouched => "no close pair, points kept".to_string(),
            GapPolicy::PairSplit { ranks } => {
                format!("ranks {}-{} close, points split evenly", ranks[0], ranks[1])
            }
            GapPolicy::Flattened => "all pairs close, points flattened".to_string(),
        }
    }
}
