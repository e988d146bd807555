use super::*;
use crate::config::{DEFAULT_GAP_THRESHOLD, ModalityWeights};
use crate::model::prediction::LabelProbability;
use crate::model::preset::find_preset;
use crate::pipeline::stage1_rank::{score_ranks, validate_top3};
use crate::pipeline::stage2_gap::adjust_gaps;
use crate::pipeline::stage3_modality::aggregate_modality;
use crate::pipeline::stage4_fusion::fuse_modalities;

fn trail(modality: Modality, model: &str, items: [(&str, f64); 3]) -> ModelTrail {
    let catalog = LabelCatalog::builtin();
    let predictions = items
        .iter()
        .map(|(l, p)| LabelProbability::new(*l, *p))
        .collect::<Vec<_>>();
    let top3 = validate_top3(modality, &predictions, &catalog).unwrap();
    let initial = score_ranks(&top3);
    let adjustment = adjust_gaps(&top3, &initial, DEFAULT_GAP_THRESHOLD);
    ModelTrail {
        modality,
        model: model.to_string(),
        top3,
        initial,
        adjusted: adjustment.scores,
        adjustment: adjustment.policy,
        gaps: adjustment.gaps,
    }
}

#[test]
fn test_assemble_packages_full_trail() {
    let catalog = LabelCatalog::builtin();
    let models = vec![
        trail(Modality::Text, "SBERT", [("Lao", 0.5), ("Viemphoi", 0.49), ("COPD", 0.01)]),
        trail(Modality::Image, "ResNet", [("Viemphoi", 0.8), ("Lao", 0.15), ("Hen", 0.05)]),
    ];
    let modalities = BTreeMap::from([
        (Modality::Text, aggregate_modality([&models[0].adjusted])),
        (Modality::Image, aggregate_modality([&models[1].adjusted])),
    ]);
    let outcome = fuse_modalities(&modalities, &ModalityWeights::default(), 1e-9).unwrap();
    let excluded = vec![ExcludedInput {
        modality: Modality::Image,
        model: Some("ViT".to_string()),
        reason: "unknown label".to_string(),
    }];

    let result = assemble_result(&AssemblyInputs {
        request_id: Some("case-7"),
        preset: find_preset("resnet_sbert"),
        catalog: &catalog,
        models: &models,
        modalities: &modalities,
        outcome: &outcome,
        excluded: &excluded,
    });

    // Viemphoi: 0.6*2.5 + 0.4*3 = 2.7, Lao: 0.6*2.5 + 0.4*2 = 2.3
    assert_eq!(result.id.as_deref(), Some("case-7"));
    assert_eq!(result.preset.as_deref(), Some("ResNet + SBERT"));
    assert_eq!(result.diagnosis.label.as_str(), "Viemphoi");
    assert_eq!(result.diagnosis.name, "Pneumonia");
    assert!((result.diagnosis.confidence - 2.7).abs() < 1e-9);
    assert_eq!(result.top_predictions.len(), 3);
    assert_eq!(result.ranking.len(), 4);
    assert_eq!(result.model_scores.len(), 2);
    assert_eq!(result.modality_scores.len(), 2);
    assert_eq!(result.weights_used[&Modality::Text], 0.6);
    assert_eq!(result.excluded, excluded);
    assert_eq!(result.combined_scores, outcome.fused);
}

#[test]
fn test_result_serializes_score_trail() {
    let catalog = LabelCatalog::builtin();
    let models = vec![trail(
        Modality::Text,
        "FastText",
        [("Lao", 0.5), ("Viemphoi", 0.49), ("COPD", 0.01)],
    )];
    let modalities = BTreeMap::from([(Modality::Text, aggregate_modality([&models[0].adjusted]))]);
    let outcome = fuse_modalities(&modalities, &ModalityWeights::default(), 1e-9).unwrap();
    let result = assemble_result(&AssemblyInputs {
        request_id: None,
        preset: None,
        catalog: &catalog,
        models: &models,
        modalities: &modalities,
        outcome: &outcome,
        excluded: &[],
    });

    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["diagnosis"]["label"], "Lao");
    assert_eq!(json["weights_used"]["text"], 1.0);
    assert_eq!(json["modality_scores"]["text"]["Lao"], 2.5);
    assert_eq!(json["model_scores"][0]["adjustment"]["policy"], "pair_split");
    assert_eq!(json["model_scores"][0]["initial"][0]["points"], 3.0);
    assert_eq!(json["model_scores"][0]["adjusted"][1]["points"], 2.5);
    assert_eq!(json["model_scores"][0]["top3"][1]["label"], "Viemphoi");
}
