//! 영속 설정 저장소.
//!
//! 모든 setter 는 메모리 값을 즉시 바꾸고 구독자에게 알린 뒤, 저장 요청을
//! 큐에 넣는다. 실제 쓰기는 [`PersistenceWorker`] 가 백그라운드에서 처리하며
//! 실패는 로그로만 남긴다.

use std::sync::Arc;

use tokio::sync::mpsc;
use toml::Value;
use tracing::{debug, warn};

use crate::config::{
    normalize_reference_temp, AppAccent, AppTheme, SettingKey, Settings, SettingsBackend,
    SettingsError, UnitSystem,
};
use crate::observable::Observable;
use crate::units::{celsius_to_fahrenheit, fahrenheit_to_celsius, mm_to_inches};

#[derive(Debug)]
struct PendingWrite {
    key: SettingKey,
    value: Value,
}

pub struct SettingsStore {
    unit_system: Observable<UnitSystem>,
    theme: Observable<AppTheme>,
    accent: Observable<AppAccent>,
    reference_temp_c: Observable<f64>,
    calculation_count: Observable<u64>,
    backend: Arc<dyn SettingsBackend>,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// 저장 요청 큐를 비우며 백엔드에 쓰는 작업자.
///
/// 모든 [`SettingsStore`] 가 drop 되면 남은 요청을 처리한 뒤 종료한다.
pub struct PersistenceWorker {
    backend: Arc<dyn SettingsBackend>,
    rx: mpsc::UnboundedReceiver<PendingWrite>,
}

impl PersistenceWorker {
    pub async fn run(mut self) {
        while let Some(write) = self.rx.recv().await {
            let key = write.key;
            let backend = Arc::clone(&self.backend);
            let outcome =
                tokio::task::spawn_blocking(move || backend.upsert(write.key, write.value)).await;
            match outcome {
                Ok(Ok(())) => debug!(key = key.as_str(), "setting persisted"),
                Ok(Err(err)) => warn!(key = key.as_str(), %err, "failed to persist setting"),
                Err(err) => warn!(key = key.as_str(), %err, "settings write task failed"),
            }
        }
        debug!("persistence worker stopped");
    }
}

impl SettingsStore {
    /// 기본값으로 시작하는 저장소와 그 저장 작업자를 만든다.
    ///
    /// 작업자를 실행하기 전까지의 쓰기는 큐에 쌓인다.
    pub fn new(backend: Arc<dyn SettingsBackend>) -> (Self, PersistenceWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let defaults = Settings::default();
        let store = Self {
            unit_system: Observable::new(defaults.unit_system),
            theme: Observable::new(defaults.theme),
            accent: Observable::new(defaults.accent),
            reference_temp_c: Observable::new(defaults.reference_temp_c),
            calculation_count: Observable::new(defaults.calculation_count),
            backend: Arc::clone(&backend),
            writes: tx,
        };
        (store, PersistenceWorker { backend, rx })
    }

    /// 저장소에서 설정을 읽어 메모리에 반영한다. 실패하면 기본값을 유지한다.
    pub async fn load(&self) {
        let backend = Arc::clone(&self.backend);
        match tokio::task::spawn_blocking(move || backend.load_all()).await {
            Ok(Ok(table)) => self.apply(Settings::from_table(&table)),
            Ok(Err(err)) => warn!(%err, "failed to load settings, keeping defaults"),
            Err(err) => warn!(%err, "settings load task failed, keeping defaults"),
        }
    }

    fn apply(&self, settings: Settings) {
        self.unit_system.set_if_changed(settings.unit_system);
        self.theme.set_if_changed(settings.theme);
        self.accent.set_if_changed(settings.accent);
        self.reference_temp_c
            .set_if_changed(settings.reference_temp_c);
        self.calculation_count
            .set_if_changed(settings.calculation_count);
        debug!(?settings, "settings loaded");
    }

    /// 현재 메모리 값의 스냅샷.
    pub fn snapshot(&self) -> Settings {
        Settings {
            unit_system: self.unit_system.get(),
            theme: self.theme.get(),
            accent: self.accent.get(),
            reference_temp_c: self.reference_temp_c.get(),
            calculation_count: self.calculation_count.get(),
        }
    }

    pub fn unit_system(&self) -> &Observable<UnitSystem> {
        &self.unit_system
    }

    pub fn theme(&self) -> &Observable<AppTheme> {
        &self.theme
    }

    pub fn accent(&self) -> &Observable<AppAccent> {
        &self.accent
    }

    pub fn reference_temp_c(&self) -> &Observable<f64> {
        &self.reference_temp_c
    }

    pub fn calculation_count(&self) -> &Observable<u64> {
        &self.calculation_count
    }

    pub fn set_unit_system(&self, system: UnitSystem) {
        self.unit_system.set_if_changed(system);
        self.persist(SettingKey::UnitSystem, Value::String(system.as_str().into()));
    }

    pub fn set_theme(&self, theme: AppTheme) {
        self.theme.set_if_changed(theme);
        self.persist(SettingKey::Theme, Value::String(theme.as_str().into()));
    }

    pub fn set_accent(&self, accent: AppAccent) {
        self.accent.set_if_changed(accent);
        self.persist(SettingKey::Accent, Value::String(accent.as_str().into()));
    }

    /// 기준 온도(°C)를 정수로 반올림해 바꾼다. 메모리와 저장소에 같은 값이 들어간다.
    ///
    /// 유한하지 않거나 -273~2500°C 를 벗어나면 아무것도 바꾸지 않고 오류를 돌려준다.
    pub fn set_reference_temp_c(&self, temp_c: f64) -> Result<(), SettingsError> {
        let degrees = normalize_reference_temp(temp_c)?;
        self.reference_temp_c.set_if_changed(degrees as f64);
        self.persist(SettingKey::ReferenceTempC, Value::Integer(degrees));
        Ok(())
    }

    /// 계산 횟수를 1 올리고 새 값을 돌려준다.
    pub fn increment_calculation_count(&self) -> u64 {
        let mut new_count = 0;
        self.calculation_count.update(|count| {
            *count = count.saturating_add(1);
            new_count = *count;
        });
        self.persist(
            SettingKey::CalculationCount,
            Value::Integer(i64::try_from(new_count).unwrap_or(i64::MAX)),
        );
        new_count
    }

    fn persist(&self, key: SettingKey, value: Value) {
        if self.writes.send(PendingWrite { key, value }).is_err() {
            warn!(
                key = key.as_str(),
                "persistence worker stopped, change kept in memory only"
            );
        }
    }

    // 표시용 헬퍼. 값을 바꾸지 않는다.

    /// 현재 단위계로 입력된 온도를 °C 로 환산한다.
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self.unit_system.get() {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => fahrenheit_to_celsius(value),
        }
    }

    /// 정수부만 남긴(버림) 온도 문자열. 예: `20°C`, `68°F`.
    pub fn display_temperature(&self, temp_c: f64) -> String {
        match self.unit_system.get() {
            UnitSystem::Metric => format!("{}°C", temp_c.trunc() as i64),
            UnitSystem::Imperial => {
                format!("{}°F", celsius_to_fahrenheit(temp_c).trunc() as i64)
            }
        }
    }

    pub fn display_reference_temperature(&self) -> String {
        self.display_temperature(self.reference_temp_c.get())
    }

    /// mm 는 소수 3자리, 인치는 소수 4자리.
    pub fn display_length(&self, mm: f64) -> String {
        match self.unit_system.get() {
            UnitSystem::Metric => format!("{mm:.3} mm"),
            UnitSystem::Imperial => format!("{:.4} in", mm_to_inches(mm)),
        }
    }

    pub fn display_input_size_hint(&self) -> &'static str {
        match self.unit_system.get() {
            UnitSystem::Metric => "Enter Size (mm)",
            UnitSystem::Imperial => "Enter Size (in)",
        }
    }

    pub fn display_temperature_label(&self) -> &'static str {
        match self.unit_system.get() {
            UnitSystem::Metric => "Temperature (°C)",
            UnitSystem::Imperial => "Temperature (°F)",
        }
    }
}
