use crate::model::modality::Modality;

#[derive(Debug, Clone, Copy)]
pub struct ModelPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub text_models: &'static [&'static str],
    pub image_models: &'static [&'static str],
}

const TEXT_ENCODERS: &[&str] = &["SBERT"];

const BUILTIN_PRESETS: &[ModelPreset] = &[
    ModelPreset {
        id: "resnet_sbert",
        name: "ResNet + SBERT",
        text_models: TEXT_ENCODERS,
        image_models: &["ResNet"],
    },
    ModelPreset {
        id: "mobilenet_sbert",
        name: "MobileNet + SBERT",
        text_models: TEXT_ENCODERS,
        image_models: &["MobileNet"],
    },
    ModelPreset {
        id: "densenet121_sbert",
        name: "DenseNet121 + SBERT",
        text_models: TEXT_ENCODERS,
        image_models: &["DenseNet121"],
    },
    ModelPreset {
        id: "densenet169_sbert",
        name: "DenseNet169 + SBERT",
        text_models: TEXT_ENCODERS,
        image_models: &["DenseNet169"],
    },
];

/// Stand-alone classifiers served per modality.
pub const TEXT_MODELS: &[&str] = &["FastText", "Electra", "DistillBERT"];
pub const IMAGE_MODELS: &[&str] = &["ViT", "LeNet", "MobileNet", "DenseNet121", "DenseNet169"];

pub fn builtin_presets() -> &'static [ModelPreset] {
    BUILTIN_PRESETS
}

pub fn find_preset(id: &str) -> Option<&'static ModelPreset> {
    let id = id.trim();
    BUILTIN_PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
}

impl ModelPreset {
    pub fn models_for(&self, modality: Modality) -> &'static [&'static str] {
        match modality {
            Modality::Text => self.text_models,
            Modality::Image => self.image_models,
        }
    }

    pub fn accepts(&self, modality: Modality, model: &str) -> bool {
        self.models_for(modality)
            .iter()
            .any(|m| m.eq_ignore_ascii_case(model.trim()))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/preset.rs"]
mod tests;
