//! Нагрузка на CPU/FPU матричными операциями с плавающей точкой

pub mod error;
pub mod matrix;
pub mod stressor;
pub mod utils;

// Реэкспорт основных типов для удобства
pub use error::{ConfigError, ConfigResult};
pub use matrix::{Matrix, MatrixMethod};
pub use stressor::{ExitStatus, MatrixConfig, MatrixStressor, RunBudget, RunControl, Sink, StopFlag};
