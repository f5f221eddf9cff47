//! Гребневая регрессия на нормальных уравнениях

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Обученный линейный регрессор с L2-регуляризацией. Параметры
/// сериализуются в составе артефакта и после обучения не меняются.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegressor {
    alpha: f64,
    weights: Array1<f64>,
    bias: f64,
}

impl RidgeRegressor {
    /// Решает (X^T X + αI) w = X^T y и центрирует смещение по средним.
    pub fn fit(X: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Self> {
        let n_samples = X.nrows();
        let n_features = X.ncols();
        if n_samples == 0 || n_features == 0 {
            return Err(Error::InsufficientData(
                "empty design matrix".to_string(),
            ));
        }
        if y.len() != n_samples {
            return Err(Error::Numeric(format!(
                "target length {} does not match {} rows",
                y.len(),
                n_samples
            )));
        }

        // центрирование, чтобы смещение не искажало веса
        let y_mean = y.sum() / n_samples as f64;
        let x_mean = X.sum_axis(ndarray::Axis(0)) / n_samples as f64;
        let xc = X - &x_mean;
        let yc = y - y_mean;

        let mut xtx = xc.t().dot(&xc);
        for i in 0..n_features {
            xtx[[i, i]] += alpha;
        }
        let xty = xc.t().dot(&yc);

        let weights = solve_linear_system(&xtx, &xty)?;
        let bias = y_mean - x_mean.dot(&weights);

        Ok(Self {
            alpha,
            weights,
            bias,
        })
    }

    /// Количество признаков, на котором обучен регрессор.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn predict(&self, X: &Array2<f64>) -> Array1<f64> {
        X.dot(&self.weights) + self.bias
    }
}

/// Метод Гаусса с частичным выбором главного элемента.
fn solve_linear_system(A: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = A.nrows();
    let mut augmented = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            augmented[[i, j]] = A[[i, j]];
        }
        augmented[[i, n]] = b[i];
    }

    // прямой ход
    for i in 0..n {
        let mut max_row = i;
        let mut max_val = augmented[[i, i]].abs();
        for k in (i + 1)..n {
            if augmented[[k, i]].abs() > max_val {
                max_val = augmented[[k, i]].abs();
                max_row = k;
            }
        }
        if max_row != i {
            for j in 0..=n {
                augmented.swap([i, j], [max_row, j]);
            }
        }

        let pivot = augmented[[i, i]];
        if pivot.abs() < 1e-10 {
            return Err(Error::Numeric("singular normal equations".to_string()));
        }
        for k in (i + 1)..n {
            let factor = augmented[[k, i]] / pivot;
            for j in i..=n {
                augmented[[k, j]] -= factor * augmented[[i, j]];
            }
        }
    }

    // обратный ход
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = augmented[[i, n]];
        for j in (i + 1)..n {
            sum -= augmented[[i, j]] * x[j];
        }
        x[i] = sum / augmented[[i, i]];
    }
    Ok(x)
}
