//! Ошибки конфигурации стрессора

use crate::matrix::MatrixMethod;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("illegal postfix {suffix:?} in {input:?}")]
    InvalidSuffix { input: String, suffix: String },
    #[error("value {value} is out of range for {option}, allowed: {min} .. {max}")]
    OutOfRange {
        option: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("invalid matrix-size limits {min} .. {max}")]
    InvalidLimits { min: u64, max: u64 },
    #[error("matrix-method must be one of: {}", valid_method_names())]
    UnknownMethod(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn valid_method_names() -> String {
    MatrixMethod::names().collect::<Vec<_>>().join(" ")
}
