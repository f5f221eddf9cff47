//! Трансформация признаков: импутация, масштабирование, one-hot кодирование

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{FeatureRecord, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};

/// Статистики числовой колонки, выученные на обучающей выборке.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NumericStats {
    /// Медиана наблюдаемых значений, значение импутации.
    median: f64,
    /// Среднее импутированной колонки.
    mean: f64,
    /// Стандартное отклонение импутированной колонки (по населению).
    std: f64,
}

/// Статистики категориальной колонки.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CategoricalStats {
    /// Мода наблюдаемых значений, значение импутации.
    mode: String,
    /// Словарь известных категорий, лексикографический порядок.
    vocabulary: Vec<String>,
}

/// Выученная трансформация признаков. Статистики замораживаются после `fit`
/// и никогда не пересчитываются по данным, увиденным позже.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransformer {
    numeric: Vec<NumericStats>,
    categorical: Vec<CategoricalStats>,
}

fn median_of(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

impl FeatureTransformer {
    /// Вычисляет статистики импутации и кодирования по обучающей выборке.
    /// Колонка без единого наблюдаемого значения — `SchemaError`.
    pub fn fit(records: &[FeatureRecord]) -> Result<Self> {
        let mut numeric = Vec::with_capacity(NUMERIC_COLUMNS.len());
        for (idx, name) in NUMERIC_COLUMNS.iter().enumerate() {
            let mut observed: Vec<f64> = records.iter().filter_map(|r| r.numeric(idx)).collect();
            if observed.is_empty() {
                return Err(Error::Schema(format!(
                    "numeric column '{name}' has no observed values"
                )));
            }
            observed.sort_by(|a, b| a.total_cmp(b));
            let median = median_of(&observed);

            // среднее и отклонение считаются по уже импутированной колонке
            let imputed: Vec<f64> = records
                .iter()
                .map(|r| r.numeric(idx).unwrap_or(median))
                .collect();
            let n = imputed.len() as f64;
            let mean = imputed.iter().sum::<f64>() / n;
            let variance = imputed.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            numeric.push(NumericStats { median, mean, std });
        }

        let mut categorical = Vec::with_capacity(CATEGORICAL_COLUMNS.len());
        for (idx, name) in CATEGORICAL_COLUMNS.iter().enumerate() {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for rec in records {
                if let Some(value) = rec.categorical(idx) {
                    *counts.entry(value).or_insert(0) += 1;
                }
            }
            if counts.is_empty() {
                return Err(Error::Schema(format!(
                    "categorical column '{name}' has no observed values"
                )));
            }

            // BTreeMap итерируется лексикографически, при равенстве частот
            // мода определяется однозначно
            let mut mode = "";
            let mut best = 0usize;
            for (&value, &count) in &counts {
                if count > best {
                    best = count;
                    mode = value;
                }
            }
            let vocabulary: Vec<String> = counts.keys().map(|v| v.to_string()).collect();

            categorical.push(CategoricalStats {
                mode: mode.to_string(),
                vocabulary,
            });
        }

        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// Ширина выходной матрицы: числовые колонки плюс one-hot блоки.
    /// Считается по выученному состоянию, а не по объявленной схеме,
    /// чтобы расхождение было видно при проверке артефакта.
    pub fn n_features(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.vocabulary.len()).sum::<usize>()
    }

    /// Совпадает ли число выученных колонок с объявленной схемой.
    pub fn matches_declared_columns(&self) -> bool {
        self.numeric.len() == NUMERIC_COLUMNS.len()
            && self.categorical.len() == CATEGORICAL_COLUMNS.len()
    }

    /// Применяет замороженные статистики к любой выборке. Пропуски
    /// импутируются, неизвестная категория дает нулевой блок, ошибкой
    /// не является.
    pub fn transform(&self, records: &[FeatureRecord]) -> Array2<f64> {
        let n_features = self.n_features();
        let mut matrix = Array2::zeros((records.len(), n_features));

        for (row, rec) in records.iter().enumerate() {
            // числовые: импутация медианой, затем стандартизация
            for (idx, stats) in self.numeric.iter().enumerate() {
                let value = rec.numeric(idx).unwrap_or(stats.median);
                matrix[[row, idx]] = if stats.std == 0.0 {
                    0.0
                } else {
                    (value - stats.mean) / stats.std
                };
            }

            // категориальные: импутация модой, затем one-hot по словарю
            let mut offset = self.numeric.len();
            for (idx, stats) in self.categorical.iter().enumerate() {
                let value = rec.categorical(idx).unwrap_or(&stats.mode);
                if let Ok(pos) = stats.vocabulary.binary_search_by(|v| v.as_str().cmp(value)) {
                    matrix[[row, offset + pos]] = 1.0;
                }
                offset += stats.vocabulary.len();
            }
        }

        matrix
    }
}
