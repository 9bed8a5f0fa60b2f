use crate::units::*;

/// 변환 가능한 물리량 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    Temperature,
    Length,
}

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
    /// 서로 다른 물리량 사이의 변환 요청
    #[error("{from} 에서 {to} 로 변환할 수 없습니다")]
    IncompatibleUnits { from: String, to: String },
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열 예시는 `C`, `°F`, `mm`, `in` 등을 사용할 수 있다.
pub fn convert(
    kind: QuantityKind,
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    match kind {
        QuantityKind::Temperature => {
            let from = parse_temperature_unit(from_unit_str)?;
            let to = parse_temperature_unit(to_unit_str)?;
            Ok(convert_temperature(value, from, to))
        }
        QuantityKind::Length => {
            let from = parse_length_unit(from_unit_str)?;
            let to = parse_length_unit(to_unit_str)?;
            Ok(convert_length(value, from, to))
        }
    }
}

/// 입력 단위 문자열로 물리량 종류를 추정한다.
pub fn infer_kind(unit_str: &str) -> Result<QuantityKind, ConversionError> {
    if parse_temperature_unit(unit_str).is_ok() {
        return Ok(QuantityKind::Temperature);
    }
    if parse_length_unit(unit_str).is_ok() {
        return Ok(QuantityKind::Length);
    }
    Err(ConversionError::UnknownUnit(unit_str.to_string()))
}

/// 물리량 종류를 추정해 변환한다. 양쪽 단위의 물리량이 다르면 오류.
pub fn convert_auto(value: f64, from_unit_str: &str, to_unit_str: &str) -> Result<f64, ConversionError> {
    let from_kind = infer_kind(from_unit_str)?;
    let to_kind = infer_kind(to_unit_str)?;
    if from_kind != to_kind {
        return Err(ConversionError::IncompatibleUnits {
            from: from_unit_str.to_string(),
            to: to_unit_str.to_string(),
        });
    }
    convert(from_kind, value, from_unit_str, to_unit_str)
}

fn parse_temperature_unit(s: &str) -> Result<TemperatureUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "c" | "celsius" | "°c" => Ok(TemperatureUnit::Celsius),
        "f" | "fahrenheit" | "°f" => Ok(TemperatureUnit::Fahrenheit),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

fn parse_length_unit(s: &str) -> Result<LengthUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "mm" | "millimeter" | "millimetre" => Ok(LengthUnit::Millimeter),
        "in" | "inch" | "inches" | "\"" => Ok(LengthUnit::Inch),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}
