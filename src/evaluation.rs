//! Метрики качества на отложенной выборке

use crate::artifact::ModelArtifact;
use crate::error::{Error, Result};
use crate::types::{FeatureRecord, LabeledRecord, Metrics};

pub fn rmse(predictions: &[f64], targets: &[f64]) -> f64 {
    let n = targets.len() as f64;
    let mse = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f64>()
        / n;
    mse.sqrt()
}

pub fn mae(predictions: &[f64], targets: &[f64]) -> f64 {
    predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / targets.len() as f64
}

/// Коэффициент детерминации 1 - SS_res/SS_tot. `None`, когда все целевые
/// значения одинаковы и SS_tot равен нулю.
pub fn r2(predictions: &[f64], targets: &[f64]) -> Option<f64> {
    let n = targets.len() as f64;
    let mean = targets.iter().sum::<f64>() / n;
    let ss_tot = targets.iter().map(|t| (t - mean) * (t - mean)).sum::<f64>();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f64>();
    Some(1.0 - ss_res / ss_tot)
}

/// Применяет артефакт к размеченной выборке и считает метрики заново,
/// ничего не кэшируя и не меняя в артефакте.
pub fn evaluate(artifact: &ModelArtifact, records: &[LabeledRecord]) -> Result<Metrics> {
    if records.is_empty() {
        return Err(Error::InsufficientData(
            "evaluation dataset is empty".to_string(),
        ));
    }

    let features: Vec<FeatureRecord> = records.iter().map(|r| r.features.clone()).collect();
    let targets: Vec<f64> = records.iter().map(|r| r.body_mass_g).collect();
    let predictions = artifact.predict(&features);

    Ok(Metrics {
        rmse: rmse(&predictions, &targets),
        mae: mae(&predictions, &targets),
        r2: r2(&predictions, &targets),
    })
}
