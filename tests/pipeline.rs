//! Сквозные сценарии: разбиение, ворота качества, персистентность, сервинг

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use penguin_ml::dataset;
use penguin_ml::evaluation::evaluate;
use penguin_ml::split::stratified_split;
use penguin_ml::training::{train_gated, TrainingOutcome};
use penguin_ml::types::{round2, FeatureRecord, LabeledRecord};
use penguin_ml::ModelArtifact;

const SPECIES: [&str; 3] = ["Adelie", "Gentoo", "Chinstrap"];
const ISLANDS: [&str; 3] = ["Torgersen", "Biscoe", "Dream"];

fn features(i: usize) -> FeatureRecord {
    FeatureRecord {
        species: Some(SPECIES[i % 3].to_string()),
        island: Some(ISLANDS[i % 3].to_string()),
        sex: Some(if i % 2 == 0 { "male" } else { "female" }.to_string()),
        bill_length_mm: Some(38.0 + (i % 11) as f64),
        bill_depth_mm: Some(15.0 + (i % 6) as f64 * 0.7),
        flipper_length_mm: Some(180.0 + (i % 13) as f64 * 3.0),
    }
}

/// Масса почти линейна по признакам: кросс-валидация проходит любой
/// разумный порог.
fn predictable_dataset(n: usize) -> Vec<LabeledRecord> {
    (0..n)
        .map(|i| {
            let f = features(i);
            let mass = 18.0 * f.flipper_length_mm.unwrap()
                + 25.0 * f.bill_length_mm.unwrap()
                + (i % 5) as f64 * 4.0;
            LabeledRecord {
                features: f,
                body_mass_g: mass,
            }
        })
        .collect()
}

/// Масса не зависит от признаков: средний RMSE кросс-валидации заведомо
/// выше порога в 500 г.
fn noisy_dataset(n: usize) -> Vec<LabeledRecord> {
    let mut rng = StdRng::seed_from_u64(99);
    (0..n)
        .map(|i| LabeledRecord {
            features: features(i),
            body_mass_g: rng.gen_range(3000.0..6000.0),
        })
        .collect()
}

#[test]
fn rejected_gate_leaves_no_artifact_behind() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");

    let outcome = train_gated(&noisy_dataset(60), 5, 500.0, 42).unwrap();
    match outcome {
        TrainingOutcome::Rejected {
            mean_rmse,
            threshold,
        } => {
            assert!(mean_rmse > threshold);
        }
        TrainingOutcome::Accepted { .. } => panic!("noise must not pass the gate"),
    }
    // артефакт сохраняется только при приемке
    assert!(!model_path.exists());
}

#[test]
fn accepted_gate_produces_loadable_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");

    let outcome = train_gated(&predictable_dataset(60), 5, 10_000.0, 42).unwrap();
    let artifact = match outcome {
        TrainingOutcome::Accepted { artifact, .. } => artifact,
        TrainingOutcome::Rejected { mean_rmse, .. } => {
            panic!("linear data rejected with RMSE {mean_rmse}")
        }
    };
    artifact.save(&model_path).unwrap();

    let loaded = ModelArtifact::load(&model_path).unwrap();
    let batch: Vec<FeatureRecord> = (0..5).map(features).collect();
    let before = artifact.predict(&batch);
    let after = loaded.predict(&batch);
    for (b, a) in before.iter().zip(&after) {
        assert!((b - a).abs() <= 1e-9 * b.abs().max(1.0));
    }
}

#[test]
fn serving_batch_returns_rounded_value_per_record() {
    let outcome = train_gated(&predictable_dataset(45), 5, 10_000.0, 42).unwrap();
    let artifact = match outcome {
        TrainingOutcome::Accepted { artifact, .. } => artifact,
        TrainingOutcome::Rejected { .. } => panic!("expected acceptance"),
    };

    // батч из 3 записей -> ровно 3 числа с 2 знаками, в порядке входа
    let batch: Vec<FeatureRecord> = (0..3).map(features).collect();
    let predictions: Vec<f64> = artifact.predict(&batch).into_iter().map(round2).collect();
    assert_eq!(predictions.len(), 3);
    for p in &predictions {
        assert!(((p * 100.0).round() - p * 100.0).abs() < 1e-9);
    }
}

#[test]
fn unseen_category_is_served_without_error() {
    let outcome = train_gated(&predictable_dataset(45), 5, 10_000.0, 42).unwrap();
    let artifact = match outcome {
        TrainingOutcome::Accepted { artifact, .. } => artifact,
        TrainingOutcome::Rejected { .. } => panic!("expected acceptance"),
    };

    let mut record = features(0);
    record.species = Some("Emperor".to_string());
    record.sex = None;
    let predictions = artifact.predict(&[record]);
    assert_eq!(predictions.len(), 1);
    assert!(predictions[0].is_finite());
}

#[test]
fn two_tier_pipeline_from_csv_to_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("penguins.csv");
    let model_path = dir.path().join("model.json");

    dataset::write_labeled_csv(&csv_path, &predictable_dataset(90)).unwrap();
    let records = dataset::load_labeled_csv(&csv_path).unwrap();
    assert_eq!(records.len(), 90);

    // честная отложенная выборка отдельно от кросс-валидации
    let (train, test) = stratified_split(&records, 0.2, 42).unwrap();
    let outcome = train_gated(&train, 5, 10_000.0, 42).unwrap();
    let artifact = match outcome {
        TrainingOutcome::Accepted { artifact, .. } => artifact,
        TrainingOutcome::Rejected { .. } => panic!("expected acceptance"),
    };
    artifact.save(&model_path).unwrap();

    let loaded = ModelArtifact::load(&model_path).unwrap();
    let metrics = evaluate(&loaded, &test).unwrap();
    assert!(metrics.rmse.is_finite());
    assert!(metrics.mae <= metrics.rmse + 1e-9);
    let r2 = metrics.r2.expect("test targets vary");
    assert!(r2 > 0.9, "linear data should be well explained, got {r2}");
}
