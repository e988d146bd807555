//! Multi-model diagnosis score fusion.
//!
//! Each classifier's top-3 labels are turned into 3/2/1 points, near-ties
//! are flattened by a relative probability-gap rule, models of the same
//! modality are summed, and modalities are combined with explicit weights
//! into one ranked diagnosis with a full score trail.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use config::{FusionConfig, ModalityWeights};
pub use error::FusionError;
pub use model::{
    FusionRequest, LabelCatalog, LabelId, LabelProbability, Modality, ModelPrediction, Points,
};
pub use pipeline::fuse;
pub use pipeline::stage5_assemble::{Diagnosis, FusionResult};
