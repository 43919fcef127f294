//! Вспомогательные функции и утилиты

use crate::error::{ConfigError, ConfigResult};
use std::time::{Duration, Instant};

/// Измеряет время выполнения функции
pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Множители для суффиксов размеров: b, k, m, g
const BYTE_SCALES: [(char, u64); 4] = [
    ('b', 1),
    ('k', 1 << 10),
    ('m', 1 << 20),
    ('g', 1 << 30),
];

/// Разбирает число с необязательным суффиксом размера ("64", "2k", "1M")
///
/// Суффикс один символ, регистр не важен. Ведущие пробелы пропускаются.
pub fn parse_byte_size(text: &str) -> ConfigResult<u64> {
    let trimmed = text.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, rest) = trimmed.split_at(digits_end);

    let value: u64 = digits
        .parse()
        .map_err(|_| ConfigError::InvalidNumber(text.to_string()))?;

    if rest.is_empty() {
        return Ok(value);
    }

    let mut chars = rest.chars();
    let scale = match (chars.next(), chars.next()) {
        (Some(c), None) => BYTE_SCALES
            .iter()
            .find(|(suffix, _)| *suffix == c.to_ascii_lowercase())
            .map(|&(_, scale)| scale),
        _ => None,
    };
    let scale = scale.ok_or_else(|| ConfigError::InvalidSuffix {
        input: text.to_string(),
        suffix: rest.to_string(),
    })?;

    value
        .checked_mul(scale)
        .ok_or_else(|| ConfigError::InvalidNumber(text.to_string()))
}
