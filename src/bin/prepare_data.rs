//! Разбиение исходного CSV на обучающую и тестовую части

use std::path::Path;

use anyhow::{Context, Result};

use penguin_ml::dataset;
use penguin_ml::split::stratified_split;

const TEST_FRACTION: f64 = 0.2;
const SEED: u64 = 42;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: prepare_data <path_to_csv>");
        std::process::exit(1);
    }
    let csv_path = Path::new(&args[1]);
    let stem = csv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("invalid input file name")?;

    tracing::info!("Reading data from {}", csv_path.display());
    let records = dataset::load_labeled_csv(csv_path)?;
    tracing::info!("Loaded {} labeled record(s)", records.len());

    tracing::info!("Splitting data into train and test");
    let (train, test) = stratified_split(&records, TEST_FRACTION, SEED)?;

    std::fs::create_dir_all("data/train")?;
    std::fs::create_dir_all("data/test")?;
    let train_path = format!("data/train/{stem}_train.csv");
    let test_path = format!("data/test/{stem}_test.csv");
    dataset::write_labeled_csv(Path::new(&train_path), &train)?;
    dataset::write_labeled_csv(Path::new(&test_path), &test)?;

    tracing::info!("Training data saved to {train_path}");
    tracing::info!("Test data saved to {test_path}");
    Ok(())
}
