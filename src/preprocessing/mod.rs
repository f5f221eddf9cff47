//! Модуль предобработки данных

pub mod transformer;

pub use transformer::FeatureTransformer;
