//! 온도 입력 버퍼. 부호와 부호 없는 크기 문자열을 표시 단위 그대로 보관한다.

use std::fmt;
use std::ops::RangeInclusive;

use crate::config::UnitSystem;
use crate::units::{convert_temperature, TemperatureUnit};

/// 섭씨 입력 허용 범위.
pub const METRIC_TEMPERATURE_RANGE: RangeInclusive<f64> = -273.0..=2500.0;
/// 화씨 입력 허용 범위. 절대영도 부근을 하한으로 둔다.
pub const IMPERIAL_TEMPERATURE_RANGE: RangeInclusive<f64> = -459.4..=4532.0;

pub fn temperature_range(unit_system: UnitSystem) -> RangeInclusive<f64> {
    match unit_system {
        UnitSystem::Metric => METRIC_TEMPERATURE_RANGE,
        UnitSystem::Imperial => IMPERIAL_TEMPERATURE_RANGE,
    }
}

/// 온도 입력 편집 동작.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureKey {
    /// 0~9
    Digit(u8),
    DecimalPoint,
    ToggleSign,
    Backspace,
    Clear,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemperatureInputError {
    #[error("잘못된 숫자 키: {0}")]
    InvalidDigit(u8),
    #[error("온도에 쓸 수 없는 문자: {0:?}")]
    InvalidCharacter(char),
    #[error("소수점은 한 번만 입력할 수 있습니다")]
    DuplicateDecimalPoint,
    #[error("{value}{unit} 는 허용 범위({min}{unit} ~ {max}{unit})를 벗어났습니다")]
    OutOfRange {
        value: f64,
        min: f64,
        max: f64,
        unit: &'static str,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemperatureEdit {
    negative: bool,
    magnitude: String,
}

impl TemperatureEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// 표시 단위 값으로 버퍼를 채운다. 소수점 아래는 최대 4자리.
    pub fn from_value(value: f64) -> Self {
        let magnitude = format_magnitude(value.abs());
        Self {
            negative: value < 0.0 && magnitude != "0",
            magnitude,
        }
    }

    /// 문자열을 한 글자씩 입력한 결과. 맨 앞의 `-` 는 부호로 본다.
    pub fn parse(text: &str) -> Result<Self, TemperatureInputError> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let mut edit = Self {
            negative,
            magnitude: String::new(),
        };
        for c in digits.chars() {
            let key = match c {
                '.' => TemperatureKey::DecimalPoint,
                d if d.is_ascii_digit() => TemperatureKey::Digit(d as u8 - b'0'),
                other => return Err(TemperatureInputError::InvalidCharacter(other)),
            };
            edit = edit.apply(key)?;
        }
        Ok(edit)
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> &str {
        &self.magnitude
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// 편집 키를 적용한 새 버퍼를 만든다. 원래 버퍼는 그대로 둔다.
    pub fn apply(&self, key: TemperatureKey) -> Result<Self, TemperatureInputError> {
        let mut next = self.clone();
        match key {
            TemperatureKey::Digit(d) if d <= 9 => next.magnitude.push(char::from(b'0' + d)),
            TemperatureKey::Digit(d) => return Err(TemperatureInputError::InvalidDigit(d)),
            TemperatureKey::DecimalPoint => {
                if next.magnitude.contains('.') {
                    return Err(TemperatureInputError::DuplicateDecimalPoint);
                }
                next.magnitude.push('.');
            }
            TemperatureKey::ToggleSign => next.negative = !next.negative,
            TemperatureKey::Backspace => {
                if next.magnitude.pop().is_none() {
                    next.negative = false;
                }
            }
            TemperatureKey::Clear => next = Self::default(),
        }
        Ok(next)
    }

    /// 표시 단위 값. 숫자가 없으면 None.
    pub fn value(&self) -> Option<f64> {
        if self.magnitude.is_empty() || self.magnitude == "." {
            return None;
        }
        let m: f64 = self.magnitude.parse().ok()?;
        Some(if self.negative && m != 0.0 { -m } else { m })
    }

    /// 범위를 확인한 뒤 섭씨 소수 6자리 문자열로 바꾼다. 값이 없으면 빈 문자열.
    pub fn to_canonical_text(&self, unit_system: UnitSystem) -> Result<String, TemperatureInputError> {
        let Some(value) = self.value() else {
            return Ok(String::new());
        };
        let range = temperature_range(unit_system);
        let unit = unit_system.temperature_unit();
        if !range.contains(&value) {
            return Err(TemperatureInputError::OutOfRange {
                value,
                min: *range.start(),
                max: *range.end(),
                unit: unit.symbol(),
            });
        }
        let celsius = convert_temperature(value, unit, TemperatureUnit::Celsius);
        Ok(format!("{celsius:.6}"))
    }
}

impl fmt::Display for TemperatureEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.magnitude)
    }
}

fn format_magnitude(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}
