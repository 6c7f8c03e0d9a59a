use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::calc::{ParseOperationError, TransportChain, TransportError};
use crate::config::{self, ConfigError};
use crate::i18n::{self, LocaleSignals};
use crate::localizer::Localizer;
use crate::preferences::FilePreferences;
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("전송 구성 오류: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Operation(#[from] ParseOperationError),
}

/// 기호 계산 서비스 CLI.
#[derive(Debug, Parser)]
#[command(name = "symbolic_calculator_cli", version, about)]
pub struct Cli {
    /// 표시 언어(en/zh). 정확히 일치할 때만 적용된다.
    #[arg(long, short = 'L')]
    pub lang: Option<String>,

    /// 다른 모든 언어 설정보다 우선하는 값.
    #[arg(long = "lang-override", env = "SYMCALC_LANG", hide = true)]
    pub lang_override: Option<String>,

    /// 설정 파일 경로.
    #[arg(long, default_value = config::CONFIG_FILE)]
    pub config: PathBuf,

    /// 계산 서비스 주소(설정 파일 값 대신 사용).
    #[arg(long)]
    pub base_url: Option<String>,

    /// 프록시 폴백 주소(설정 파일 값 대신 사용).
    #[arg(long)]
    pub proxy_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 계산을 한 번 수행한다.
    Calc {
        operation: String,
        expression: String,
    },
    /// 현재 언어를 보여주거나 바꾼다.
    Lang { code: Option<String> },
    /// 지원하는 연산 목록.
    Operations,
    /// 예제 식 목록.
    Examples,
    /// 메뉴 방식으로 실행한다(기본값).
    Interactive,
}

impl Cli {
    pub fn locale_signals(&self) -> LocaleSignals {
        LocaleSignals {
            env_override: self.lang_override.clone(),
            query: self.lang.clone(),
            persisted: None,
            ambient: i18n::detect_system_language(),
        }
    }
}

/// CLI 애플리케이션을 실행한다.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_create(&cli.config)?;
    if let Some(url) = &cli.base_url {
        cfg.api.base_url = url.clone();
    }
    if let Some(url) = &cli.proxy_url {
        cfg.api.proxy_url = Some(url.clone());
    }

    let store = FilePreferences::new(&cli.config);
    let mut localizer = Localizer::resolve(cli.locale_signals(), store, ui_cli::registry());
    let mut surface = ui_cli::ConsoleSurface::default();
    localizer.init(&mut surface);
    tracing::debug!(language = localizer.language().as_code(), "cli started");

    let chain = TransportChain::from_config(&cfg.api)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Calc {
            operation,
            expression,
        } => ui_cli::handle_calc(&runtime, &chain, &localizer, &operation, &expression),
        Command::Lang { code } => {
            ui_cli::handle_lang(&mut localizer, &mut surface, code.as_deref());
            Ok(())
        }
        Command::Operations => {
            ui_cli::print_operations(&localizer.translator());
            Ok(())
        }
        Command::Examples => {
            ui_cli::print_examples();
            Ok(())
        }
        Command::Interactive => ui_cli::interactive(
            &runtime,
            &chain,
            &mut localizer,
            &mut surface,
            &mut io::stdin().lock(),
        ),
    }
}
