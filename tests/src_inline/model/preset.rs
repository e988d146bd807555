use super::*;

#[test]
fn test_find_preset_ignores_case() {
    let preset = find_preset(" ResNet_SBERT ").unwrap();
    assert_eq!(preset.name, "ResNet + SBERT");
    assert!(find_preset("vgg_bert").is_none());
}

#[test]
fn test_preset_accepts_only_its_models() {
    let preset = find_preset("densenet169_sbert").unwrap();
    assert!(preset.accepts(Modality::Text, "sbert"));
    assert!(preset.accepts(Modality::Image, "DenseNet169"));
    assert!(!preset.accepts(Modality::Image, "DenseNet121"));
    assert!(!preset.accepts(Modality::Text, "DenseNet169"));
}

#[test]
fn test_every_preset_pairs_both_modalities() {
    for preset in builtin_presets() {
        assert!(!preset.models_for(Modality::Text).is_empty());
        assert!(!preset.models_for(Modality::Image).is_empty());
    }
}
