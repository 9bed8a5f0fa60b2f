use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::app::AppError;
use crate::calculator::CalculatorState;
use crate::config::{AppAccent, AppTheme, UnitSystem};
use crate::material_db::Material;
use crate::settings_store::SettingsStore;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    MeasuredSize,
    MeasuredTemperature,
    Material,
    Settings,
    Exit,
}

/// 표준 입력을 한 줄씩 읽는다. 입력이 닫히면 None.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        print!("{prompt}");
        io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

/// 대화형 메뉴를 실행한다.
pub async fn interactive(state: &CalculatorState) -> Result<(), AppError> {
    let mut prompt = Prompt::new();
    loop {
        // 설정 변경에 따른 재계산이 먼저 반영되도록 한 번 양보한다.
        tokio::task::yield_now().await;
        print_status(state);
        let Some(choice) = main_menu(&mut prompt).await? else {
            return Ok(());
        };
        match choice {
            MenuChoice::MeasuredSize => handle_size(&mut prompt, state).await?,
            MenuChoice::MeasuredTemperature => handle_temperature(&mut prompt, state).await?,
            MenuChoice::Material => handle_material(&mut prompt, state).await?,
            MenuChoice::Settings => handle_settings(&mut prompt, state.settings()).await?,
            MenuChoice::Exit => return Ok(()),
        }
    }
}

async fn main_menu(prompt: &mut Prompt) -> Result<Option<MenuChoice>, AppError> {
    println!("\n=== Thermal Growth ===");
    println!("1) 측정 치수 입력");
    println!("2) 측정 온도 입력");
    println!("3) 재질 선택");
    println!("4) 설정");
    println!("0) 종료");
    loop {
        let Some(sel) = prompt.read_line("메뉴 선택: ").await? else {
            return Ok(None);
        };
        match sel.trim() {
            "1" => return Ok(Some(MenuChoice::MeasuredSize)),
            "2" => return Ok(Some(MenuChoice::MeasuredTemperature)),
            "3" => return Ok(Some(MenuChoice::Material)),
            "4" => return Ok(Some(MenuChoice::Settings)),
            "0" => return Ok(Some(MenuChoice::Exit)),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

async fn handle_size(prompt: &mut Prompt, state: &CalculatorState) -> Result<(), AppError> {
    let hint = state.settings().display_input_size_hint();
    if let Some(text) = prompt.read_line(&format!("{hint}: ")).await? {
        state.on_measured_size_changed(text.trim());
    }
    Ok(())
}

async fn handle_temperature(prompt: &mut Prompt, state: &CalculatorState) -> Result<(), AppError> {
    let label = state.settings().display_temperature_label();
    let Some(text) = prompt.read_line(&format!("{label}: ")).await? else {
        return Ok(());
    };
    if let Err(err) = state.enter_temperature(&text) {
        println!("입력이 반영되지 않았습니다: {err}");
    }
    Ok(())
}

async fn handle_material(prompt: &mut Prompt, state: &CalculatorState) -> Result<(), AppError> {
    let catalog = state.materials().get();
    if catalog.is_empty() {
        println!("사용 가능한 재질이 없습니다.");
        return Ok(());
    }
    let mut listed: Vec<&Material> = Vec::with_capacity(catalog.len());
    for group in catalog.grouped_by_category() {
        println!("[{}]", group.category);
        for m in &group.materials {
            listed.push(m);
            println!("{:>3}) {}", listed.len(), m.name);
        }
    }
    let Some(sel) = prompt.read_line("번호 또는 이름: ").await? else {
        return Ok(());
    };
    let sel = sel.trim();
    let chosen = match sel.parse::<usize>() {
        Ok(n) if (1..=listed.len()).contains(&n) => Some(listed[n - 1].clone()),
        _ => catalog.find(sel).cloned(),
    };
    match chosen {
        Some(material) => state.on_material_selected(material),
        None => println!("해당 재질이 없습니다."),
    }
    Ok(())
}

async fn handle_settings(prompt: &mut Prompt, store: &SettingsStore) -> Result<(), AppError> {
    println!("\n-- 설정 --");
    print_settings(store);
    println!("1) 단위계  2) 테마  3) 강조색  4) 기준 온도(°C)");
    let Some(sel) = prompt.read_line("변경할 번호(취소하려면 엔터): ").await? else {
        return Ok(());
    };
    match sel.trim() {
        "" => {}
        "1" => {
            let next = match store.unit_system().get() {
                UnitSystem::Metric => UnitSystem::Imperial,
                UnitSystem::Imperial => UnitSystem::Metric,
            };
            store.set_unit_system(next);
        }
        "2" => {
            println!("1) System 2) Light 3) Dark 4) High contrast");
            let theme = match prompt.read_line("선택: ").await?.as_deref().map(str::trim) {
                Some("1") => Some(AppTheme::System),
                Some("2") => Some(AppTheme::Light),
                Some("3") => Some(AppTheme::Dark),
                Some("4") => Some(AppTheme::HighContrast),
                _ => None,
            };
            match theme {
                Some(theme) => store.set_theme(theme),
                None => println!("잘못된 입력이므로 변경하지 않습니다."),
            }
        }
        "3" => {
            println!("1) Blue 2) Orange 3) Green 4) Red 5) Purple");
            let accent = match prompt.read_line("선택: ").await?.as_deref().map(str::trim) {
                Some("1") => Some(AppAccent::Blue),
                Some("2") => Some(AppAccent::Orange),
                Some("3") => Some(AppAccent::Green),
                Some("4") => Some(AppAccent::Red),
                Some("5") => Some(AppAccent::Purple),
                _ => None,
            };
            match accent {
                Some(accent) => store.set_accent(accent),
                None => println!("잘못된 입력이므로 변경하지 않습니다."),
            }
        }
        "4" => {
            let text = prompt.read_line("기준 온도 [°C]: ").await?;
            match text.as_deref().map(str::trim).map(str::parse::<f64>) {
                Some(Ok(v)) => {
                    if let Err(err) = store.set_reference_temp_c(v) {
                        println!("변경하지 않습니다: {err}");
                    }
                }
                _ => println!("숫자를 입력하세요."),
            }
        }
        _ => println!("잘못된 입력이므로 변경하지 않습니다."),
    }
    Ok(())
}

/// 현재 입력과 결과를 한눈에 보여준다.
pub fn print_status(state: &CalculatorState) {
    let settings = state.settings();
    let material = state
        .selected_material()
        .with(|m| m.as_ref().map(|m| m.name.clone()))
        .unwrap_or_else(|| "-".into());
    let size = state.measured_size_text().get();
    let temp = state.temperature_edit().get();
    let unit = settings.unit_system().get();
    println!(
        "\n재질: {material} | 치수: {} {} | 온도: {} {} | 기준: {}",
        if size.is_empty() { "-" } else { size.as_str() },
        unit.length_unit().symbol(),
        if temp.is_empty() { "-".to_string() } else { temp.to_string() },
        unit.temperature_unit().symbol(),
        settings.display_reference_temperature(),
    );
    print_result(state);
}

pub fn print_result(state: &CalculatorState) {
    let settings = state.settings();
    state.calculation_result().with(|result| match result {
        Some(r) => {
            println!("OFFSET: {}", settings.display_length(r.expansion_amount));
            println!("TARGET SIZE: {}", settings.display_length(r.corrected_size));
            println!("{}", r.breakdown);
        }
        None => println!("결과 없음 (치수, 온도, 재질을 모두 입력하세요)"),
    });
}

pub fn print_materials(state: &CalculatorState) {
    let catalog = state.materials().get();
    if catalog.is_empty() {
        println!("사용 가능한 재질이 없습니다.");
        return;
    }
    for group in catalog.grouped_by_category() {
        println!("[{}]", group.category);
        for m in &group.materials {
            match &m.description {
                Some(desc) => println!("  {:<28} α = {:>6.1} ×10⁻⁶/°C  {desc}", m.name, m.alpha),
                None => println!("  {:<28} α = {:>6.1} ×10⁻⁶/°C", m.name, m.alpha),
            }
        }
    }
}

pub fn print_settings(store: &SettingsStore) {
    let s = store.snapshot();
    println!("단위계: {}", s.unit_system.as_str());
    println!("테마: {}", s.theme.as_str());
    println!("강조색: {}", s.accent.as_str());
    println!("기준 온도: {}", store.display_reference_temperature());
    println!("계산 횟수: {}", s.calculation_count);
}
