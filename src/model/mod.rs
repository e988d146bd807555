pub mod label;
pub mod modality;
pub mod points;
pub mod prediction;
pub mod preset;
pub mod scores;

pub use label::{LabelCatalog, LabelEntry, LabelId};
pub use modality::Modality;
pub use points::Points;
pub use prediction::{FusionRequest, LabelProbability, ModelPrediction, RankedPrediction, Top3};
pub use scores::{FusedScoreMap, GapPolicy, ModalityScoreMap, ModelScoreMap, ScoredLabel};
