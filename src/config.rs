use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use toml::{Table, Value};

use crate::calculation::DEFAULT_REFERENCE_TEMP_C;
use crate::units::{LengthUnit, TemperatureUnit};

/// 설정 파일 기본 경로.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

/// 기준 온도 허용 범위 (°C, 정수).
pub const REFERENCE_TEMP_RANGE_C: RangeInclusive<i64> = -273..=2500;

/// 기준 온도를 정수 °C 로 반올림한다. 유한하지 않거나 범위를 벗어나면 오류.
pub fn normalize_reference_temp(temp_c: f64) -> Result<i64, SettingsError> {
    let rounded = temp_c.round();
    let min = *REFERENCE_TEMP_RANGE_C.start() as f64;
    let max = *REFERENCE_TEMP_RANGE_C.end() as f64;
    if !rounded.is_finite() || rounded < min || rounded > max {
        return Err(SettingsError::InvalidReferenceTemp(temp_c));
    }
    Ok(rounded as i64)
}

/// 입력/표시 단위계. 내부 값은 항상 mm / °C 이다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSystem {
    /// mm / °C
    #[default]
    Metric,
    /// in / °F
    Imperial,
}

impl UnitSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "METRIC",
            UnitSystem::Imperial => "IMPERIAL",
        }
    }

    pub fn length_unit(self) -> LengthUnit {
        match self {
            UnitSystem::Metric => LengthUnit::Millimeter,
            UnitSystem::Imperial => LengthUnit::Inch,
        }
    }

    pub fn temperature_unit(self) -> TemperatureUnit {
        match self {
            UnitSystem::Metric => TemperatureUnit::Celsius,
            UnitSystem::Imperial => TemperatureUnit::Fahrenheit,
        }
    }
}

/// 화면 테마. 계산에는 쓰이지 않는다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppTheme {
    #[default]
    System,
    Light,
    Dark,
    HighContrast,
}

impl AppTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            AppTheme::System => "SYSTEM",
            AppTheme::Light => "LIGHT",
            AppTheme::Dark => "DARK",
            AppTheme::HighContrast => "HIGH_CONTRAST",
        }
    }
}

/// 강조 색상. 계산에는 쓰이지 않는다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppAccent {
    #[default]
    Blue,
    Orange,
    Green,
    Red,
    Purple,
}

impl AppAccent {
    pub fn as_str(self) -> &'static str {
        match self {
            AppAccent::Blue => "BLUE",
            AppAccent::Orange => "ORANGE",
            AppAccent::Green => "GREEN",
            AppAccent::Red => "RED",
            AppAccent::Purple => "PURPLE",
        }
    }
}

/// 저장소 키.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    UnitSystem,
    Theme,
    Accent,
    ReferenceTempC,
    CalculationCount,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::UnitSystem => "unit_system",
            SettingKey::Theme => "theme",
            SettingKey::Accent => "accent",
            SettingKey::ReferenceTempC => "reference_temp_c",
            SettingKey::CalculationCount => "calculation_count",
        }
    }
}

/// 애플리케이션 설정 레코드.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub unit_system: UnitSystem,
    pub theme: AppTheme,
    pub accent: AppAccent,
    /// 항상 섭씨
    pub reference_temp_c: f64,
    pub calculation_count: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::default(),
            theme: AppTheme::default(),
            accent: AppAccent::default(),
            reference_temp_c: DEFAULT_REFERENCE_TEMP_C,
            calculation_count: 0,
        }
    }
}

impl Settings {
    /// 저장소에서 읽은 키-값 테이블을 설정으로 해석한다.
    ///
    /// 키가 없거나 값이 잘못되었으면 해당 항목만 기본값을 쓴다.
    pub fn from_table(table: &Table) -> Self {
        let defaults = Settings::default();
        Self {
            unit_system: decode_variant(table, SettingKey::UnitSystem)
                .unwrap_or(defaults.unit_system),
            theme: decode_variant(table, SettingKey::Theme).unwrap_or(defaults.theme),
            accent: decode_variant(table, SettingKey::Accent).unwrap_or(defaults.accent),
            reference_temp_c: match table.get(SettingKey::ReferenceTempC.as_str()) {
                Some(Value::Integer(i)) if REFERENCE_TEMP_RANGE_C.contains(i) => *i as f64,
                Some(Value::Float(f)) => normalize_reference_temp(*f)
                    .map(|degrees| degrees as f64)
                    .unwrap_or(defaults.reference_temp_c),
                _ => defaults.reference_temp_c,
            },
            calculation_count: match table.get(SettingKey::CalculationCount.as_str()) {
                Some(Value::Integer(i)) if *i >= 0 => *i as u64,
                _ => defaults.calculation_count,
            },
        }
    }
}

fn decode_variant<T: DeserializeOwned>(table: &Table, key: SettingKey) -> Option<T> {
    table.get(key.as_str())?.clone().try_into().ok()
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("기준 온도는 -273°C ~ 2500°C 범위여야 합니다: {0}")]
    InvalidReferenceTemp(f64),
}

/// 설정 영속화 저장소. 키 단위 덮어쓰기와 전체 로드만 지원한다.
pub trait SettingsBackend: Send + Sync {
    /// 저장된 모든 키를 읽는다. 저장된 것이 없으면 빈 테이블.
    fn load_all(&self) -> Result<Table, SettingsError>;

    /// 키 하나를 저장한다.
    fn upsert(&self, key: SettingKey, value: Value) -> Result<(), SettingsError>;
}

/// TOML 파일 하나에 모든 설정 키를 저장한다.
#[derive(Debug)]
pub struct TomlFileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TomlFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<Table, SettingsError> {
        if !self.path.exists() {
            return Ok(Table::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl SettingsBackend for TomlFileBackend {
    fn load_all(&self) -> Result<Table, SettingsError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_table()
    }

    fn upsert(&self, key: SettingKey, value: Value) -> Result<(), SettingsError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut table = self.read_table()?;
        table.insert(key.as_str().to_string(), value);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&table)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// 메모리에만 보관하는 저장소. 테스트와 임시 세션용.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    table: Mutex<Table>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: Table) -> Self {
        Self {
            table: Mutex::new(table),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// true 로 두면 이후 모든 쓰기가 실패한다.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Table {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load_all(&self) -> Result<Table, SettingsError> {
        Ok(self.snapshot())
    }

    fn upsert(&self, key: SettingKey, value: Value) -> Result<(), SettingsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SettingsError::Io(std::io::Error::other(
                "memory backend write disabled",
            )));
        }
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.as_str().to_string(), value);
        Ok(())
    }
}
