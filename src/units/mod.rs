//! 단위 정의 및 변환 모듈 모음.
//! 내부 기준 단위는 길이=mm, 온도=°C 이며 표시/입력 경계에서만 변환한다.

pub mod length;
pub mod temperature;

pub use length::{convert_length, inches_to_mm, mm_to_inches, LengthUnit, MM_PER_INCH};
pub use temperature::{
    celsius_to_fahrenheit, convert_temperature, fahrenheit_to_celsius, TemperatureUnit,
};
