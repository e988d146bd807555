use super::*;

fn preds(items: &[(&str, f64)]) -> Vec<LabelProbability> {
    items
        .iter()
        .map(|(l, p)| LabelProbability::new(*l, *p))
        .collect()
}

#[test]
fn test_rank_points_are_3_2_1() {
    let catalog = LabelCatalog::builtin();
    let top3 = validate_top3(
        Modality::Text,
        &preds(&[("Lao", 0.8), ("Viemphoi", 0.15), ("COPD", 0.05)]),
        &catalog,
    )
    .unwrap();
    let scores = score_ranks(&top3);

    assert_eq!(
        scores.points(),
        [Points::whole(3), Points::whole(2), Points::whole(1)]
    );
    assert_eq!(scores.entries()[0].label.as_str(), "Lao");
    assert_eq!(scores.total(), Points::whole(6));
    assert_eq!(scores.get(&catalog.resolve("Hen").unwrap()), Points::ZERO);
}

#[test]
fn test_only_first_three_consumed() {
    let catalog = LabelCatalog::builtin();
    let top3 = validate_top3(
        Modality::Image,
        &preds(&[
            ("Lao", 0.5),
            ("Viemphoi", 0.2),
            ("COPD", 0.1),
            ("Hen", 0.1),
            ("Lao", 0.1),
        ]),
        &catalog,
    )
    .unwrap();
    assert_eq!(top3.probabilities(), [0.5, 0.2, 0.1]);
}

#[test]
fn test_fewer_than_three_entries_rejected() {
    let catalog = LabelCatalog::builtin();
    let err = validate_top3(
        Modality::Text,
        &preds(&[("Lao", 0.6), ("COPD", 0.4)]),
        &catalog,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FusionError::InvalidInput {
            modality: Modality::Text,
            ..
        }
    ));
}

#[test]
fn test_duplicate_label_rejected() {
    let catalog = LabelCatalog::builtin();
    let err = validate_top3(
        Modality::Image,
        &preds(&[("Lao", 0.6), ("COPD", 0.2), ("Lao", 0.1)]),
        &catalog,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate label Lao"));
}

#[test]
fn test_unknown_label_rejected() {
    let catalog = LabelCatalog::builtin();
    let err = validate_top3(
        Modality::Text,
        &preds(&[("Lao", 0.6), ("Measles", 0.2), ("COPD", 0.1)]),
        &catalog,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown label"));
}

#[test]
fn test_probability_out_of_range_rejected() {
    let catalog = LabelCatalog::builtin();
    for bad in [1.5, -0.1, f64::NAN] {
        let result = validate_top3(
            Modality::Text,
            &preds(&[("Lao", bad), ("Hen", 0.2), ("COPD", 0.1)]),
            &catalog,
        );
        assert!(result.is_err(), "probability {bad} accepted");
    }
}

#[test]
fn test_unsorted_top3_rejected() {
    let catalog = LabelCatalog::builtin();
    let err = validate_top3(
        Modality::Text,
        &preds(&[("Lao", 0.2), ("Hen", 0.5), ("COPD", 0.1)]),
        &catalog,
    )
    .unwrap_err();
    assert!(err.to_string().contains("not sorted"));
}

#[test]
fn test_numeric_class_indices_accepted() {
    let catalog = LabelCatalog::builtin();
    let top3 = validate_top3(
        Modality::Image,
        &preds(&[("10", 0.7), ("4", 0.2), ("0", 0.1)]),
        &catalog,
    )
    .unwrap();
    let labels = top3
        .entries()
        .iter()
        .map(|e| e.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Viemphoi", "Lao", "Binhthuong"]);
}
