//! 선팽창 보정 계산. 입력은 항상 mm / °C 기준이다.

/// 기준 온도 기본값 (°C).
pub const DEFAULT_REFERENCE_TEMP_C: f64 = 20.0;

/// 보정 계산 결과. 입력이 바뀌면 통째로 새로 만든다.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    /// 기준 온도에서의 보정 치수 (mm)
    pub corrected_size: f64,
    /// 보정 치수 - 측정 치수 (mm)
    pub expansion_amount: f64,
    /// 계산식에 값을 대입한 문자열
    pub breakdown: String,
}

/// 측정 온도의 치수를 기준 온도의 치수로 보정한다.
///
/// `material_alpha` 는 재질표 값(×10⁻⁶/°C)을 그대로 받는다.
/// NaN/Infinity 는 별도 처리 없이 그대로 전파된다.
pub fn calculate_corrected_size(
    measured_size_mm: f64,
    material_alpha: f64,
    measured_temp_c: f64,
    reference_temp_c: f64,
) -> CalculationResult {
    let alpha_coefficient = material_alpha * 1e-6;
    let delta_temp = measured_temp_c - reference_temp_c;
    let corrected = measured_size_mm * (1.0 + alpha_coefficient * delta_temp);
    let expansion = corrected - measured_size_mm;

    CalculationResult {
        corrected_size: corrected,
        expansion_amount: expansion,
        breakdown: breakdown_string(
            measured_size_mm,
            alpha_coefficient,
            measured_temp_c,
            reference_temp_c,
            corrected,
        ),
    }
}

/// 기준 온도 20°C 로 보정한다.
pub fn calculate_at_default_reference(
    measured_size_mm: f64,
    material_alpha: f64,
    measured_temp_c: f64,
) -> CalculationResult {
    calculate_corrected_size(
        measured_size_mm,
        material_alpha,
        measured_temp_c,
        DEFAULT_REFERENCE_TEMP_C,
    )
}

fn breakdown_string(
    measured_size: f64,
    alpha_coefficient: f64,
    temp_measured: f64,
    temp_ref: f64,
    corrected: f64,
) -> String {
    format!(
        "{measured_size:.6} × [1 + {alpha_coefficient:.7} × ({temp_measured:.6} − {temp_ref:.6})] = {corrected:.6}"
    )
}
