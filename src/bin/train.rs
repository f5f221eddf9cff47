//! Обучение модели с воротами качества

use std::path::Path;

use anyhow::Result;

use penguin_ml::dataset;
use penguin_ml::training::{train_gated, TrainingOutcome};

/// Порог приемки по среднему RMSE кросс-валидации, граммы.
const MAX_RMSE_THRESHOLD: f64 = 500.0;
const K_FOLDS: usize = 5;
const SEED: u64 = 42;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: train <path_to_train_csv> <model_output_path>");
        std::process::exit(1);
    }
    let train_path = Path::new(&args[1]);
    let model_path = Path::new(&args[2]);

    tracing::info!("Reading training data from {}", train_path.display());
    let records = dataset::load_labeled_csv(train_path)?;
    tracing::info!("Loaded {} labeled record(s)", records.len());

    tracing::info!("Running {K_FOLDS}-fold cross-validation");
    match train_gated(&records, K_FOLDS, MAX_RMSE_THRESHOLD, SEED)? {
        TrainingOutcome::Rejected {
            mean_rmse,
            threshold,
        } => {
            // отказ по порогу — штатный исход, артефакт не пишется,
            // процесс завершается успешно
            tracing::warn!(
                "Mean CV RMSE too high ({mean_rmse:.0} g > {threshold:.0} g), \
                 check the data or the model. Training will not continue."
            );
        }
        TrainingOutcome::Accepted { artifact, mean_rmse } => {
            tracing::info!("Quality gate passed, mean CV RMSE {mean_rmse:.0} g");
            if let Some(parent) = model_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            artifact.save(model_path)?;
            tracing::info!("Model saved to {}", model_path.display());
        }
    }
    Ok(())
}
