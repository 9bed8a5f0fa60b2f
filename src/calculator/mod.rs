//! 계산기 화면 상태.
//!
//! 입력 문자열, 선택 재질, 온도 편집 버퍼와 최신 계산 결과를 관찰 가능한 값으로
//! 보관하고, 입력이나 단위계/기준 온도가 바뀔 때마다 다시 계산한다.

pub mod temperature_input;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::calculation::{calculate_corrected_size, CalculationResult};
use crate::config::UnitSystem;
use crate::material_db::{CatalogLoadError, Material, MaterialCatalog};
use crate::observable::Observable;
use crate::settings_store::SettingsStore;
use crate::units::{convert_temperature, inches_to_mm, TemperatureUnit};

pub use temperature_input::{
    temperature_range, TemperatureEdit, TemperatureInputError, TemperatureKey,
    IMPERIAL_TEMPERATURE_RANGE, METRIC_TEMPERATURE_RANGE,
};

pub struct CalculatorState {
    settings: Arc<SettingsStore>,
    materials: Observable<Arc<MaterialCatalog>>,
    measured_size_text: Observable<String>,
    /// 항상 섭씨, 소수 6자리
    measured_temp_text: Observable<String>,
    /// 현재 단위계 기준 편집 버퍼
    temperature_edit: Observable<TemperatureEdit>,
    selected_material: Observable<Option<Material>>,
    calculation_result: Observable<Option<CalculationResult>>,
}

impl CalculatorState {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self {
            settings,
            materials: Observable::new(Arc::new(MaterialCatalog::empty())),
            measured_size_text: Observable::default(),
            measured_temp_text: Observable::default(),
            temperature_edit: Observable::default(),
            selected_material: Observable::new(None),
            calculation_result: Observable::new(None),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn materials(&self) -> &Observable<Arc<MaterialCatalog>> {
        &self.materials
    }

    pub fn measured_size_text(&self) -> &Observable<String> {
        &self.measured_size_text
    }

    pub fn measured_temp_text(&self) -> &Observable<String> {
        &self.measured_temp_text
    }

    pub fn temperature_edit(&self) -> &Observable<TemperatureEdit> {
        &self.temperature_edit
    }

    pub fn selected_material(&self) -> &Observable<Option<Material>> {
        &self.selected_material
    }

    pub fn calculation_result(&self) -> &Observable<Option<CalculationResult>> {
        &self.calculation_result
    }

    /// 재질 카탈로그를 백그라운드에서 로드한다.
    ///
    /// 실패하면 빈 카탈로그를 쓴다. 재질이 하나라도 있으면 첫 재질을 선택하고
    /// 다시 계산한다.
    pub async fn load_materials<F>(&self, loader: F)
    where
        F: FnOnce() -> Result<MaterialCatalog, CatalogLoadError> + Send + 'static,
    {
        let catalog = match tokio::task::spawn_blocking(loader).await {
            Ok(Ok(catalog)) => catalog,
            Ok(Err(err)) => {
                warn!(%err, "material catalog unavailable");
                MaterialCatalog::empty()
            }
            Err(err) => {
                warn!(%err, "material catalog load task failed");
                MaterialCatalog::empty()
            }
        };
        debug!(count = catalog.len(), "material catalog loaded");
        let first = catalog.first().cloned();
        self.materials.set(Arc::new(catalog));
        if let Some(material) = first {
            self.selected_material.set(Some(material));
            self.recompute();
        }
    }

    pub fn on_measured_size_changed(&self, text: impl Into<String>) {
        self.measured_size_text.set(text.into());
        self.recompute();
    }

    /// 섭씨 문자열을 그대로 받는다. 편집 버퍼는 현재 단위계로 다시 맞춘다.
    pub fn on_measured_temp_changed(&self, text: impl Into<String>) {
        self.measured_temp_text.set(text.into());
        self.sync_temperature_edit();
        self.recompute();
    }

    pub fn on_material_selected(&self, material: Material) {
        debug!(material = %material.name, "material selected");
        self.selected_material.set(Some(material));
        self.recompute();
    }

    /// 카탈로그에서 이름으로 찾아 선택한다. 없으면 false.
    pub fn select_material(&self, name: &str) -> bool {
        let found = self.materials.with(|catalog| catalog.find(name).cloned());
        match found {
            Some(material) => {
                self.on_material_selected(material);
                true
            }
            None => false,
        }
    }

    /// 편집 키 하나를 적용한다.
    ///
    /// 범위를 벗어나거나 형식이 틀리면 오류를 돌려주고 아무 상태도 바꾸지 않는다.
    pub fn edit_temperature(&self, key: TemperatureKey) -> Result<(), TemperatureInputError> {
        let candidate = self.temperature_edit.with(|edit| edit.apply(key))?;
        self.commit_temperature_edit(candidate)
    }

    /// 현재 단위계 기준 온도 문자열 전체를 입력한다. 버퍼를 통째로 바꾼다.
    pub fn enter_temperature(&self, text: &str) -> Result<(), TemperatureInputError> {
        let candidate = TemperatureEdit::parse(text)?;
        self.commit_temperature_edit(candidate)
    }

    fn commit_temperature_edit(&self, candidate: TemperatureEdit) -> Result<(), TemperatureInputError> {
        let unit_system = self.settings.unit_system().get();
        let canonical = candidate.to_canonical_text(unit_system)?;
        self.temperature_edit.set_if_changed(candidate);
        self.measured_temp_text.set(canonical);
        self.recompute();
        Ok(())
    }

    /// 단위계가 바뀌었을 때 호출한다. 편집 버퍼를 새 단위로 바꾸고 다시 계산한다.
    pub fn on_unit_system_changed(&self) {
        self.sync_temperature_edit();
        self.recompute();
    }

    pub fn on_reference_temp_changed(&self) {
        self.recompute();
    }

    /// 단위계와 기준 온도 변경을 따라가는 future.
    ///
    /// 구독은 이 함수를 호출하는 시점에 이뤄지므로, 반환된 future 를 spawn 하기 전의
    /// 변경도 놓치지 않는다.
    pub fn follow_settings(self: &Arc<Self>) -> impl Future<Output = ()> + Send + 'static {
        let mut unit_rx = self.settings.unit_system().subscribe();
        let mut reference_rx = self.settings.reference_temp_c().subscribe();
        let state = Arc::clone(self);
        async move {
            loop {
                tokio::select! {
                    changed = unit_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        state.on_unit_system_changed();
                    }
                    changed = reference_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        state.on_reference_temp_changed();
                    }
                }
            }
        }
    }

    fn sync_temperature_edit(&self) {
        let unit = self.settings.unit_system().get().temperature_unit();
        let edit = self
            .measured_temp_text
            .with(|text| parse_input_number(text))
            .map(|celsius| {
                TemperatureEdit::from_value(convert_temperature(
                    celsius,
                    TemperatureUnit::Celsius,
                    unit,
                ))
            })
            .unwrap_or_default();
        self.temperature_edit.set_if_changed(edit);
    }

    fn recompute(&self) {
        let size = self.measured_size_text.with(|text| parse_input_number(text));
        let temp_c = self.measured_temp_text.with(|text| parse_input_number(text));
        let material = self.selected_material.get();

        let (Some(size), Some(temp_c), Some(material)) = (size, temp_c, material) else {
            self.calculation_result.set_if_changed(None);
            return;
        };

        let size_mm = match self.settings.unit_system().get() {
            UnitSystem::Imperial => inches_to_mm(size),
            UnitSystem::Metric => size,
        };
        let reference_temp_c = self.settings.reference_temp_c().get();
        let result = calculate_corrected_size(size_mm, material.alpha, temp_c, reference_temp_c);
        debug!(
            material = %material.name,
            size_mm,
            temp_c,
            reference_temp_c,
            corrected = result.corrected_size,
            "recomputed"
        );
        self.calculation_result.set(Some(result));
        self.settings.increment_calculation_count();
    }
}

/// 입력 문자열을 숫자로 해석한다. 비었거나 숫자가 아니거나 유한하지 않으면 None.
fn parse_input_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::parse_input_number;

    #[test]
    fn parse_input_number_rejects_blank_and_non_finite() {
        assert_eq!(parse_input_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_input_number(""), None);
        assert_eq!(parse_input_number("abc"), None);
        assert_eq!(parse_input_number("inf"), None);
        assert_eq!(parse_input_number("NaN"), None);
    }
}
