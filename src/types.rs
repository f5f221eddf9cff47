//! Типы данных конвейера

use serde::{Deserialize, Serialize};

/// Числовые колонки в объявленном порядке.
pub const NUMERIC_COLUMNS: [&str; 3] = ["bill_length_mm", "bill_depth_mm", "flipper_length_mm"];

/// Категориальные колонки в объявленном порядке.
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["species", "island", "sex"];

/// Целевая колонка.
pub const TARGET_COLUMN: &str = "body_mass_g";

/// Одно наблюдение без целевой переменной. Пропуски допустимы и
/// поглощаются импутацией при трансформации.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub species: Option<String>,
    pub island: Option<String>,
    pub sex: Option<String>,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
}

impl FeatureRecord {
    /// Значение числовой колонки по индексу из `NUMERIC_COLUMNS`.
    pub fn numeric(&self, idx: usize) -> Option<f64> {
        match idx {
            0 => self.bill_length_mm,
            1 => self.bill_depth_mm,
            2 => self.flipper_length_mm,
            _ => None,
        }
    }

    /// Значение категориальной колонки по индексу из `CATEGORICAL_COLUMNS`.
    pub fn categorical(&self, idx: usize) -> Option<&str> {
        match idx {
            0 => self.species.as_deref(),
            1 => self.island.as_deref(),
            2 => self.sex.as_deref(),
            _ => None,
        }
    }
}

/// Наблюдение с известной массой тела. Записи без целевой переменной
/// отбрасываются при загрузке, до любой обработки.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    #[serde(flatten)]
    pub features: FeatureRecord,
    pub body_mass_g: f64,
}

/// Метрики качества на отложенной выборке. `r2` равен `None`, когда все
/// целевые значения одинаковы и коэффициент детерминации не определен.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: Option<f64>,
}

/// Ответ сервиса предсказаний: по одному значению на входную запись,
/// в исходном порядке, с округлением до 2 знаков.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<f64>,
}

/// Округление предсказанной массы до 2 знаков для ответа сервиса.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
