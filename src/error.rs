//! Ошибки библиотеки

use thiserror::Error;

/// Фатальные ошибки конвейера. Отказ по порогу качества ошибкой не является,
/// он возвращается как `TrainingOutcome::Rejected`.
#[derive(Debug, Error)]
pub enum Error {
    /// Отсутствует обязательная колонка или из нее нечему обучаться.
    #[error("schema error: {0}")]
    Schema(String),

    /// Страта слишком мала для разбиения.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Артефакт не читается или несогласован внутри себя.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// Численный сбой (вырожденная система и т.п.).
    #[error("numeric error: {0}")]
    Numeric(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
