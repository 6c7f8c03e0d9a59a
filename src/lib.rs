//! 원격 기호 계산 서비스를 위한 클라이언트 로직을 라이브러리로 분리하여 CLI와 GUI가 함께 쓴다.

pub mod app;
pub mod calc;
pub mod config;
pub mod i18n;
pub mod localizer;
pub mod logging;
pub mod page;
pub mod preferences;
pub mod ui_cli;
