//! Обучение с воротами качества

use ndarray::Array1;

use crate::artifact::ModelArtifact;
use crate::error::Result;
use crate::evaluation::rmse;
use crate::models::RidgeRegressor;
use crate::preprocessing::FeatureTransformer;
use crate::split::k_folds;
use crate::types::{FeatureRecord, LabeledRecord};

/// Регуляризация регрессора, общая для фолдов и финальной модели.
pub const RIDGE_ALPHA: f64 = 1.0;

/// Итог обучения. Отказ по порогу — ожидаемый деловой исход, а не ошибка:
/// артефакт не создается и ничего не записывается.
#[derive(Debug)]
pub enum TrainingOutcome {
    Accepted {
        artifact: ModelArtifact,
        mean_rmse: f64,
    },
    Rejected {
        mean_rmse: f64,
        threshold: f64,
    },
}

fn fit_pair(records: &[LabeledRecord]) -> Result<(FeatureTransformer, RidgeRegressor)> {
    let features: Vec<FeatureRecord> = records.iter().map(|r| r.features.clone()).collect();
    let targets = Array1::from_iter(records.iter().map(|r| r.body_mass_g));

    let transformer = FeatureTransformer::fit(&features)?;
    let matrix = transformer.transform(&features);
    let regressor = RidgeRegressor::fit(&matrix, &targets, RIDGE_ALPHA)?;
    Ok((transformer, regressor))
}

/// Кросс-валидация по k фолдам, затем ворота качества: средний RMSE строго
/// выше порога отклоняет прогон. При приемке трансформер и регрессор
/// переобучаются на всей обучающей выборке — кросс-валидация только
/// оценивает обобщение, боевая модель использует весь сигнал.
pub fn train_gated(
    records: &[LabeledRecord],
    k: usize,
    threshold: f64,
    seed: u64,
) -> Result<TrainingOutcome> {
    let folds = k_folds(records.len(), k, seed)?;

    let mut fold_rmses = Vec::with_capacity(k);
    for held in 0..folds.len() {
        let train: Vec<LabeledRecord> = folds
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != held)
            .flat_map(|(_, fold)| fold.iter().map(|&idx| records[idx].clone()))
            .collect();
        let (transformer, regressor) = fit_pair(&train)?;

        let features: Vec<FeatureRecord> = folds[held]
            .iter()
            .map(|&idx| records[idx].features.clone())
            .collect();
        let targets: Vec<f64> = folds[held].iter().map(|&idx| records[idx].body_mass_g).collect();
        let predictions = regressor.predict(&transformer.transform(&features)).to_vec();

        let fold_rmse = rmse(&predictions, &targets);
        tracing::info!("fold {}: RMSE {:.1} g", held + 1, fold_rmse);
        fold_rmses.push(fold_rmse);
    }

    let mean_rmse = fold_rmses.iter().sum::<f64>() / fold_rmses.len() as f64;
    tracing::info!("CV RMSE mean ({k}-fold): {:.1} g", mean_rmse);

    if mean_rmse > threshold {
        return Ok(TrainingOutcome::Rejected {
            mean_rmse,
            threshold,
        });
    }

    tracing::info!("Training final model on the full training set");
    let (transformer, regressor) = fit_pair(records)?;
    let artifact = ModelArtifact::new(transformer, regressor)?;
    Ok(TrainingOutcome::Accepted {
        artifact,
        mean_rmse,
    })
}
