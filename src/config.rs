use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 기본 설정 파일 경로(작업 디렉터리 기준).
pub const CONFIG_FILE: &str = "config.toml";

/// 계산 서비스 접속 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// `{base_url}/calculate`로 요청한다.
    pub base_url: String,
    /// 설정되어 있을 때만 프록시 폴백을 사용한다.
    pub proxy_url: Option<String>,
    pub timeout_secs: u64,
    /// 모든 요청에 붙는 CORS 헤더.
    pub headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".into(), "application/json".into());
        headers.insert("Accept".into(), "application/json".into());
        Self {
            base_url: "http://localhost:5000".into(),
            proxy_url: None,
            timeout_secs: 60,
            headers,
        }
    }
}

/// 화면 동작 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// "복사됨" 표시 유지 시간(ms)
    pub copy_feedback_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_feedback_ms: 2000,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    /// 사용자 선호값 저장소(`preferred-language` 등).
    pub preferences: BTreeMap<String, String>,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 주어진 경로의 설정을 로드한다. 파일이 없으면 기본값을 저장하고 돌려준다.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load_from(path)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

impl Config {
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://calc.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://calc.example.com");
        assert_eq!(cfg.api.proxy_url, None);
        assert_eq!(cfg.ui.copy_feedback_ms, 2000);
        assert_eq!(
            cfg.api.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn creates_and_reloads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = load_or_create(&path).unwrap();
        assert!(path.exists());
        cfg.preferences
            .insert("preferred-language".into(), "zh".into());
        cfg.save_to(&path).unwrap();
        let again = load_from(&path).unwrap();
        assert_eq!(again, cfg);
    }
}
