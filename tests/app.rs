//! 명령행 해석과 `calc`/`settings set` 명령 처리.
use std::sync::Arc;

use clap::Parser;
use thermal_growth::app::{
    apply_settings, calculate, AppError, CalcArgs, Cli, Command, SetArgs, SettingsAction,
};
use thermal_growth::calculator::CalculatorState;
use thermal_growth::config::{MemoryBackend, UnitSystem};
use thermal_growth::material_db::{Material, MaterialCatalog};
use thermal_growth::settings_store::SettingsStore;

fn material(name: &str, alpha: f64, category: &str) -> Material {
    Material {
        name: name.into(),
        alpha,
        category: category.into(),
        description: None,
    }
}

async fn loaded_state() -> Arc<CalculatorState> {
    let (store, _worker) = SettingsStore::new(Arc::new(MemoryBackend::new()));
    let state = Arc::new(CalculatorState::new(Arc::new(store)));
    state
        .load_materials(|| {
            MaterialCatalog::new(vec![
                material("Test Aluminium", 23.0, "Aluminium"),
                material("Test Steel", 11.7, "Steel"),
            ])
        })
        .await;
    state
}

fn calc_args(size: &str, temp: &str, material: Option<&str>) -> CalcArgs {
    CalcArgs {
        size: size.into(),
        temp: temp.into(),
        material: material.map(Into::into),
    }
}

fn reference_arg(args: &[&str]) -> Result<Option<i64>, clap::Error> {
    let cli = Cli::try_parse_from(args)?;
    match cli.command {
        Some(Command::Settings {
            action: Some(SettingsAction::Set(set)),
        }) => Ok(set.reference),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[tokio::test]
async fn calc_with_named_material_counts_once() {
    let state = loaded_state().await;
    calculate(&state, calc_args("100", "-20", Some("test steel"))).expect("calc");

    let result = state.calculation_result().get().expect("result");
    assert!((result.corrected_size - 99.9532).abs() < 1e-9);
    assert_eq!(
        state.selected_material().get().map(|m| m.name),
        Some("Test Steel".to_string())
    );
    assert_eq!(state.settings().calculation_count().get(), 1);
}

#[tokio::test]
async fn calc_defaults_to_first_material() {
    let state = loaded_state().await;
    calculate(&state, calc_args("25", "100", None)).expect("calc");
    let result = state.calculation_result().get().expect("result");
    assert_eq!(
        result.breakdown,
        "25.000000 × [1 + 0.0000230 × (100.000000 − 20.000000)] = 25.046000"
    );
    assert_eq!(state.settings().calculation_count().get(), 1);
}

#[tokio::test]
async fn calc_uses_imperial_inputs() {
    let state = loaded_state().await;
    state.settings().set_unit_system(UnitSystem::Imperial);
    calculate(&state, calc_args("1", "68", None)).expect("calc");
    let result = state.calculation_result().get().expect("result");
    assert!(result.breakdown.starts_with("25.400000 ×"), "{}", result.breakdown);
}

#[tokio::test]
async fn calc_rejections_do_not_count() {
    let state = loaded_state().await;
    assert!(matches!(
        calculate(&state, calc_args("abc", "100", None)),
        Err(AppError::InvalidNumber(s)) if s == "abc"
    ));
    assert!(matches!(
        calculate(&state, calc_args("25", "100", Some("Unobtainium"))),
        Err(AppError::UnknownMaterial(s)) if s == "Unobtainium"
    ));
    assert!(matches!(
        calculate(&state, calc_args("25", "3000", None)),
        Err(AppError::Temperature(_))
    ));
    assert!(matches!(
        calculate(&state, calc_args("25", "", None)),
        Err(AppError::NoResult)
    ));
    assert!(state.calculation_result().get().is_none());
    assert_eq!(state.settings().calculation_count().get(), 0);
}

#[test]
fn reference_argument_is_range_checked() {
    assert_eq!(
        reference_arg(&["thermal_growth", "settings", "set", "--reference", "-40"]).expect("valid"),
        Some(-40)
    );
    for bad in ["NaN", "21.6", "-274", "2501", "1e300"] {
        assert!(
            reference_arg(&["thermal_growth", "settings", "set", "--reference", bad]).is_err(),
            "{bad} accepted"
        );
    }
}

#[test]
fn apply_settings_writes_reference() {
    let (store, _worker) = SettingsStore::new(Arc::new(MemoryBackend::new()));
    apply_settings(
        &store,
        SetArgs {
            units: Some(UnitSystem::Imperial),
            theme: None,
            accent: None,
            reference: Some(25),
        },
    )
    .expect("apply");
    assert_eq!(store.unit_system().get(), UnitSystem::Imperial);
    assert_eq!(store.reference_temp_c().get(), 25.0);
}
