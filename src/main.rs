use clap::Parser;
use symbolic_calculator::{app, logging};

/// 프로그램의 엔트리 포인트. 로깅과 인자를 준비한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    logging::init();
    if let Err(err) = try_run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = app::Cli::parse();
    app::run(cli)?;
    Ok(())
}
