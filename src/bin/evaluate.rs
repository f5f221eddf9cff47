//! Оценка сохраненной модели на тестовой выборке

use std::path::Path;

use anyhow::Result;

use penguin_ml::dataset;
use penguin_ml::evaluation::evaluate;
use penguin_ml::ModelArtifact;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: evaluate <path_to_model> <path_to_test_csv>");
        std::process::exit(1);
    }
    let model_path = Path::new(&args[1]);
    let test_path = Path::new(&args[2]);

    tracing::info!("Loading model from {}", model_path.display());
    let artifact = ModelArtifact::load(model_path)?;

    tracing::info!("Reading test data from {}", test_path.display());
    let records = dataset::load_labeled_csv(test_path)?;

    tracing::info!("Evaluating model on test data");
    let metrics = evaluate(&artifact, &records)?;
    tracing::info!("Test RMSE : {:.0} g", metrics.rmse);
    tracing::info!("Test MAE  : {:.0} g", metrics.mae);
    match metrics.r2 {
        Some(r2) => tracing::info!("Test R2   : {r2:.3}"),
        None => tracing::warn!("Test R2 undefined: all test targets are identical"),
    }
    Ok(())
}
