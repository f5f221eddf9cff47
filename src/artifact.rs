//! Артефакт модели: неизменяемый пакет трансформации и регрессора

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RidgeRegressor;
use crate::preprocessing::FeatureTransformer;
use crate::types::{FeatureRecord, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};

/// Ожидаемая схема входных записей, пишется в артефакт для проверки
/// совместимости при загрузке.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub n_features: usize,
}

/// Единица сохранения и сервинга: обученный трансформер, обученный
/// регрессор и метаданные схемы. Создается один раз на успешный прогон
/// обучения и после этого не мутируется, поэтому загруженный артефакт
/// можно разделять между потоками без блокировок.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    transformer: FeatureTransformer,
    regressor: RidgeRegressor,
    schema: SchemaMetadata,
}

impl ModelArtifact {
    /// Собирает артефакт из обученных частей, проверяя согласованность
    /// ширины признакового пространства.
    pub fn new(transformer: FeatureTransformer, regressor: RidgeRegressor) -> Result<Self> {
        if transformer.n_features() != regressor.n_features() {
            return Err(Error::Numeric(format!(
                "transformer produces {} features but regressor expects {}",
                transformer.n_features(),
                regressor.n_features()
            )));
        }
        let schema = SchemaMetadata {
            numeric_columns: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            n_features: transformer.n_features(),
        };
        Ok(Self {
            transformer,
            regressor,
            schema,
        })
    }

    /// Трансформация и предсказание одним вызовом: на N записей ровно
    /// N предсказаний, в порядке входа.
    pub fn predict(&self, records: &[FeatureRecord]) -> Vec<f64> {
        let matrix = self.transformer.transform(records);
        self.regressor.predict(&matrix).to_vec()
    }

    /// Сохраняет артефакт одним JSON файлом.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Загружает артефакт и проверяет его внутреннюю согласованность.
    /// Нечитаемый или несогласованный файл — `CorruptArtifactError`,
    /// деградации до модели по умолчанию нет.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::CorruptArtifact(format!("{}: {e}", path.display())))?;
        let artifact: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::CorruptArtifact(format!("{}: {e}", path.display())))?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        if self.schema.numeric_columns != NUMERIC_COLUMNS
            || self.schema.categorical_columns != CATEGORICAL_COLUMNS
        {
            return Err(Error::CorruptArtifact(
                "artifact schema does not match expected columns".to_string(),
            ));
        }
        if !self.transformer.matches_declared_columns() {
            return Err(Error::CorruptArtifact(
                "transformer statistics do not cover the declared columns".to_string(),
            ));
        }
        if self.transformer.n_features() != self.schema.n_features
            || self.regressor.n_features() != self.schema.n_features
        {
            return Err(Error::CorruptArtifact(format!(
                "feature width mismatch: transformer {}, regressor {}, schema {}",
                self.transformer.n_features(),
                self.regressor.n_features(),
                self.schema.n_features
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabeledRecord;
    use ndarray::Array1;
    use std::io::Write;

    fn labeled(species: &str, bill: f64, mass: f64) -> LabeledRecord {
        LabeledRecord {
            features: FeatureRecord {
                species: Some(species.to_string()),
                island: Some("Biscoe".to_string()),
                sex: Some("male".to_string()),
                bill_length_mm: Some(bill),
                bill_depth_mm: Some(17.0 + bill / 10.0),
                flipper_length_mm: Some(180.0 + bill),
            },
            body_mass_g: mass,
        }
    }

    fn fitted_artifact() -> ModelArtifact {
        let data = vec![
            labeled("Adelie", 39.0, 3700.0),
            labeled("Adelie", 41.0, 3900.0),
            labeled("Gentoo", 47.0, 5000.0),
            labeled("Gentoo", 49.0, 5200.0),
            labeled("Chinstrap", 46.0, 3800.0),
            labeled("Chinstrap", 50.0, 3950.0),
        ];
        let features: Vec<FeatureRecord> = data.iter().map(|r| r.features.clone()).collect();
        let targets = Array1::from_iter(data.iter().map(|r| r.body_mass_g));

        let transformer = FeatureTransformer::fit(&features).unwrap();
        let matrix = transformer.transform(&features);
        let regressor = RidgeRegressor::fit(&matrix, &targets, 1.0).unwrap();
        ModelArtifact::new(transformer, regressor).unwrap()
    }

    #[test]
    fn predictions_match_input_length_and_order() {
        let artifact = fitted_artifact();
        let batch: Vec<FeatureRecord> = (0..3)
            .map(|i| labeled("Adelie", 38.0 + i as f64, 0.0).features)
            .collect();
        let preds = artifact.predict(&batch);
        assert_eq!(preds.len(), 3);
    }

    #[test]
    fn save_load_round_trip_preserves_predictions() {
        let artifact = fitted_artifact();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        artifact.save(&path).unwrap();
        let loaded = ModelArtifact::load(&path).unwrap();

        let batch = vec![labeled("Gentoo", 48.0, 0.0).features];
        let before = artifact.predict(&batch);
        let after = loaded.predict(&batch);
        assert!((before[0] - after[0]).abs() < 1e-9 * before[0].abs().max(1.0));
    }

    #[test]
    fn unreadable_file_is_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"not a model").unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)));
    }

    #[test]
    fn mismatched_feature_width_is_corrupt_artifact() {
        let artifact = fitted_artifact();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        // портим записанную ширину признаков
        let mut value = serde_json::to_value(&artifact).unwrap();
        value["schema"]["n_features"] = serde_json::json!(999);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)));
    }

    #[test]
    fn surplus_numeric_statistics_are_corrupt_artifact() {
        let artifact = fitted_artifact();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        // дублируем статистики числовых колонок: трансформер перестает
        // соответствовать объявленной схеме и не должен пройти загрузку
        let mut value = serde_json::to_value(&artifact).unwrap();
        let numeric = value["transformer"]["numeric"].as_array().unwrap().clone();
        let doubled: Vec<_> = numeric.iter().chain(numeric.iter()).cloned().collect();
        value["transformer"]["numeric"] = serde_json::Value::Array(doubled);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)));
    }

    #[test]
    fn missing_file_is_corrupt_artifact() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, Error::CorruptArtifact(_)));
    }
}
