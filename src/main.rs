use std::process::ExitCode;

use clap::Parser;
use thermal_growth::app::{self, AppError, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 프로그램의 엔트리 포인트. 로그를 초기화한 뒤 명령을 실행한다.
fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = try_run(cli) {
        eprintln!("오류: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(app::run(cli))
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
