use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::calculator::{CalculatorState, TemperatureInputError};
use crate::config::{
    AppAccent, AppTheme, SettingsBackend, SettingsError, TomlFileBackend, UnitSystem,
    DEFAULT_SETTINGS_FILE,
};
use crate::conversion::{self, ConversionError};
use crate::material_db::{CatalogLoadError, MaterialCatalog};
use crate::settings_store::SettingsStore;
use crate::ui_cli;

/// 선팽창 보정 계산기.
#[derive(Debug, Parser)]
#[command(name = "thermal_growth", version)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,
    /// 내장 목록 대신 사용할 재질 JSON 파일
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 카테고리별 재질 목록을 출력한다
    Materials,
    /// 측정값을 기준 온도 치수로 보정한다
    Calc(CalcArgs),
    /// 단위 변환 (mm/in, C/F)
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },
    /// 설정 확인/변경
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    /// 측정 치수 (현재 단위계: mm 또는 in)
    #[arg(long, allow_hyphen_values = true)]
    pub size: String,
    /// 측정 온도 (현재 단위계: °C 또는 °F)
    #[arg(long, allow_hyphen_values = true)]
    pub temp: String,
    /// 재질 이름. 생략하면 목록의 첫 재질
    #[arg(long)]
    pub material: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(long, value_enum)]
    pub units: Option<UnitSystem>,
    #[arg(long, value_enum)]
    pub theme: Option<AppTheme>,
    #[arg(long, value_enum)]
    pub accent: Option<AppAccent>,
    /// 기준 온도 (정수 °C, -273 ~ 2500)
    #[arg(
        long,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i64).range(-273..=2500)
    )]
    pub reference: Option<i64>,
}

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] ConversionError),
    #[error("재질 데이터 오류: {0}")]
    Catalog(#[from] CatalogLoadError),
    #[error("설정 오류: {0}")]
    Settings(#[from] SettingsError),
    #[error("온도 입력 오류: {0}")]
    Temperature(#[from] TemperatureInputError),
    #[error("알 수 없는 재질: {0}")]
    UnknownMaterial(String),
    #[error("숫자가 아닌 입력: {0:?}")]
    InvalidNumber(String),
    #[error("계산에 필요한 입력이 부족합니다")]
    NoResult,
}

/// 설정과 재질을 로드하고 명령을 실행한다. 종료 전에 밀린 설정 쓰기를 모두 마친다.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let backend: Arc<dyn SettingsBackend> = Arc::new(TomlFileBackend::new(&cli.settings));
    let (store, worker) = SettingsStore::new(backend);
    let worker = tokio::spawn(worker.run());
    let store = Arc::new(store);
    store.load().await;

    let state = Arc::new(CalculatorState::new(Arc::clone(&store)));
    let follower = tokio::spawn(state.follow_settings());
    let catalog_path = cli.catalog.clone();
    state
        .load_materials(move || match catalog_path {
            Some(path) => MaterialCatalog::load_file(path),
            None => MaterialCatalog::bundled(),
        })
        .await;

    let outcome = execute(&state, cli.command).await;

    follower.abort();
    let _ = follower.await;
    drop(state);
    drop(store);
    if let Err(err) = worker.await {
        warn!(%err, "persistence worker ended abnormally");
    }
    outcome
}

async fn execute(state: &CalculatorState, command: Option<Command>) -> Result<(), AppError> {
    match command {
        None => ui_cli::interactive(state).await,
        Some(Command::Materials) => {
            ui_cli::print_materials(state);
            Ok(())
        }
        Some(Command::Calc(args)) => calculate(state, args),
        Some(Command::Convert { value, from, to }) => {
            let result = conversion::convert_auto(value, &from, &to)?;
            println!("{value} {} = {result} {}", from.trim(), to.trim());
            Ok(())
        }
        Some(Command::Settings { action }) => {
            if let Some(SettingsAction::Set(args)) = action {
                apply_settings(state.settings(), args)?;
            }
            ui_cli::print_settings(state.settings());
            Ok(())
        }
    }
}

/// `calc` 명령. 재질을 고른 뒤 온도, 치수 순으로 입력해 한 번만 계산되게 한다.
pub fn calculate(state: &CalculatorState, args: CalcArgs) -> Result<(), AppError> {
    if args.size.trim().parse::<f64>().is_err() {
        return Err(AppError::InvalidNumber(args.size));
    }
    if let Some(name) = &args.material {
        if !state.select_material(name) {
            return Err(AppError::UnknownMaterial(name.clone()));
        }
    }
    state.enter_temperature(&args.temp)?;
    state.on_measured_size_changed(args.size);
    if state.calculation_result().with(Option::is_none) {
        return Err(AppError::NoResult);
    }
    ui_cli::print_result(state);
    Ok(())
}

pub fn apply_settings(store: &SettingsStore, args: SetArgs) -> Result<(), AppError> {
    if let Some(units) = args.units {
        store.set_unit_system(units);
    }
    if let Some(theme) = args.theme {
        store.set_theme(theme);
    }
    if let Some(accent) = args.accent {
        store.set_accent(accent);
    }
    if let Some(reference) = args.reference {
        store.set_reference_temp_c(reference as f64)?;
    }
    Ok(())
}
