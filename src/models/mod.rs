//! ML модели

pub mod ridge;

pub use ridge::RidgeRegressor;
