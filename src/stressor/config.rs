//! Настройки стрессора: размер матриц и выбранный метод

use crate::error::{ConfigError, ConfigResult};
use crate::matrix::MatrixMethod;
use crate::utils::parse_byte_size;
use log::warn;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

pub const MIN_MATRIX_SIZE: u64 = 16;
pub const MAX_MATRIX_SIZE: u64 = 4096;
pub const DEFAULT_MATRIX_SIZE: usize = 128;

/// Допустимый диапазон размерности
///
/// Всегда `1 <= min <= max <= MAX_MATRIX_SIZE`: у матрицы есть хотя бы
/// элемент [0][0], а `n * n` не переполняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSizeLimits")]
pub struct SizeLimits {
    min: u64,
    max: u64,
}

#[derive(Deserialize)]
struct RawSizeLimits {
    min: u64,
    max: u64,
}

impl TryFrom<RawSizeLimits> for SizeLimits {
    type Error = ConfigError;

    fn try_from(raw: RawSizeLimits) -> ConfigResult<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl SizeLimits {
    pub fn new(min: u64, max: u64) -> ConfigResult<Self> {
        if min == 0 || min > max || max > MAX_MATRIX_SIZE {
            return Err(ConfigError::InvalidLimits { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn check(&self, value: u64) -> ConfigResult<()> {
        if value < self.min || value > self.max {
            return Err(ConfigError::OutOfRange {
                option: "matrix-size",
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: MIN_MATRIX_SIZE,
            max: MAX_MATRIX_SIZE,
        }
    }
}

/// Политика размера, если размер не задан явно
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    #[default]
    Default,
    Maximize,
    Minimize,
}

/// Настройки одного стрессора
///
/// При десериализации явный размер проверяется так же, как в `set_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrixConfig")]
pub struct MatrixConfig {
    /// Явно заданный размер, `None` значит размер по умолчанию
    size: Option<usize>,
    limits: SizeLimits,
    policy: SizePolicy,
    method: MatrixMethod,
}

#[derive(Deserialize)]
struct RawMatrixConfig {
    size: Option<u64>,
    limits: SizeLimits,
    policy: SizePolicy,
    method: MatrixMethod,
}

impl TryFrom<RawMatrixConfig> for MatrixConfig {
    type Error = ConfigError;

    fn try_from(raw: RawMatrixConfig) -> ConfigResult<Self> {
        let mut config = Self::with_limits(raw.limits);
        if let Some(size) = raw.size {
            config.set_checked_size(size)?;
        }
        config.policy = raw.policy;
        config.method = raw.method;
        Ok(config)
    }
}

impl MatrixConfig {
    pub fn new() -> Self {
        Self::with_limits(SizeLimits::default())
    }

    /// Конфигурация с границами размера, заданными обвязкой
    pub fn with_limits(limits: SizeLimits) -> Self {
        Self {
            size: None,
            limits,
            policy: SizePolicy::Default,
            method: MatrixMethod::All,
        }
    }

    /// Задает размерность из строки вида "256" или "1k"
    ///
    /// При ошибке прежние значения не меняются.
    pub fn set_size(&mut self, spec: &str) -> ConfigResult<()> {
        self.set_checked_size(parse_byte_size(spec)?)
    }

    fn set_checked_size(&mut self, size: u64) -> ConfigResult<()> {
        self.limits.check(size)?;
        let size = usize::try_from(size).map_err(|_| ConfigError::OutOfRange {
            option: "matrix-size",
            value: size,
            min: self.limits.min,
            max: self.limits.max,
        })?;
        self.size = Some(size);
        Ok(())
    }

    /// Выбирает метод по имени; список допустимых имен уходит в stderr
    pub fn set_method(&mut self, name: &str) -> ConfigResult<()> {
        self.select_method(name, &mut io::stderr())
    }

    /// То же, что [`set_method`](Self::set_method), но с явным потоком диагностики
    pub fn select_method<W: Write + ?Sized>(&mut self, name: &str, diag: &mut W) -> ConfigResult<()> {
        match name.parse::<MatrixMethod>() {
            Ok(method) => {
                self.method = method;
                Ok(())
            }
            Err(err) => {
                // ошибка записи в поток диагностики игнорируется
                let _ = writeln!(diag, "{err}");
                Err(err)
            }
        }
    }

    pub fn set_policy(&mut self, policy: SizePolicy) {
        self.policy = policy;
    }

    /// Размерность для прогона: явная, по политике или по умолчанию
    pub fn effective_size(&self) -> usize {
        if let Some(size) = self.size {
            if self.policy != SizePolicy::Default {
                warn!(
                    "matrix-size задан явно ({}), политика {:?} игнорируется",
                    size, self.policy
                );
            }
            return size;
        }
        match self.policy {
            SizePolicy::Default => DEFAULT_MATRIX_SIZE,
            SizePolicy::Maximize => self.limits.max as usize,
            SizePolicy::Minimize => self.limits.min as usize,
        }
    }

    pub fn method(&self) -> MatrixMethod {
        self.method
    }

    /// Явный размер или размер по умолчанию
    pub fn size(&self) -> usize {
        self.size.unwrap_or(DEFAULT_MATRIX_SIZE)
    }

    pub fn explicit_size(&self) -> bool {
        self.size.is_some()
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self::new()
    }
}
