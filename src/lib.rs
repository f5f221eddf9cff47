//! Penguin ML - предсказание массы тела пингвина (Palmer Penguins)

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod preprocessing;
pub mod split;
pub mod training;
pub mod types;

pub use artifact::ModelArtifact;
pub use error::{Error, Result};
pub use models::RidgeRegressor;
pub use preprocessing::FeatureTransformer;
pub use training::{train_gated, TrainingOutcome};
pub use types::{FeatureRecord, LabeledRecord, Metrics};
