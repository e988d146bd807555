use crate::model::scores::{ModalityScoreMap, ModelScoreMap};

/// Unweighted sum of the score maps of every model serving one modality.
/// With a single model the result equals that model's map.
pub fn aggregate_modality<'a, I>(models: I) -> ModalityScoreMap
where
    I: IntoIterator<Item = &'a ModelScoreMap>,
{
    models
        .into_iter()
        .flat_map(|m| m.entries().iter().map(|s| (s.label.clone(), s.points)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_modality.rs"]
mod tests;
