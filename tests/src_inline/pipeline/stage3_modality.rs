use super::*;
use crate::model::label::{LabelCatalog, LabelId};
use crate::model::points::Points;
use crate::model::scores::ScoredLabel;

fn label(id: &str) -> LabelId {
    LabelCatalog::builtin().resolve(id).unwrap()
}

fn model_map(entries: [(&str, u32); 3]) -> ModelScoreMap {
    ModelScoreMap(entries.map(|(id, halves)| ScoredLabel {
        label: label(id),
        points: Points::from_halves(halves),
    }))
}

#[test]
fn test_single_model_is_identity() {
    let model = model_map([("Lao", 6), ("Hen", 4), ("COPD", 2)]);
    let modality = aggregate_modality([&model]);
    assert_eq!(modality, ModalityScoreMap::from(&model));
    assert_eq!(modality.len(), 3);
    assert_eq!(modality.get(&label("Lao")), Points::whole(3));
}

#[test]
fn test_two_models_sum_over_label_union() {
    let first = model_map([("Lao", 5), ("Hen", 5), ("COPD", 2)]);
    let second = model_map([("Hen", 6), ("Covid", 4), ("Lao", 2)]);
    let modality = aggregate_modality([&first, &second]);

    assert_eq!(modality.len(), 4);
    assert_eq!(modality.get(&label("Hen")), Points::from_halves(11));
    assert_eq!(modality.get(&label("Lao")), Points::from_halves(7));
    assert_eq!(modality.get(&label("COPD")), Points::whole(1));
    assert_eq!(modality.get(&label("Covid")), Points::whole(2));
    assert_eq!(modality.get(&label("Uphoi")), Points::ZERO);
    assert_eq!(modality.total(), Points::whole(12));
}

#[test]
fn test_no_models_gives_empty_map() {
    let modality = aggregate_modality(std::iter::empty());
    assert!(modality.is_empty());
}
