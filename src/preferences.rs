//! 세션 간 유지되는 사용자 선호값 저장소.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::{self, ConfigError};

/// 언어 선호값이 저장되는 키.
pub const PREFERRED_LANGUAGE_KEY: &str = "preferred-language";

/// 문자열 키-값 저장소.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// 메모리에만 두는 저장소. 테스트와 일회성 실행에 쓴다.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 설정 파일의 `[preferences]` 테이블에 저장한다. 다른 설정은 그대로 보존한다.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        match config::load_from(&self.path) {
            Ok(cfg) => cfg.preferences.get(key).cloned(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read preferences: {e}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut cfg = if self.path.exists() {
            config::load_from(&self.path)?
        } else {
            config::Config::default()
        };
        cfg.preferences.insert(key.to_string(), value.to_string());
        cfg.save_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_preserves_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://calc.example.com\"\n",
        )
        .unwrap();

        let mut store = FilePreferences::new(&path);
        assert_eq!(store.get(PREFERRED_LANGUAGE_KEY), None);
        store.set(PREFERRED_LANGUAGE_KEY, "zh").unwrap();
        assert_eq!(store.get(PREFERRED_LANGUAGE_KEY).as_deref(), Some("zh"));

        let cfg = config::load_from(&path).unwrap();
        assert_eq!(cfg.api.base_url, "https://calc.example.com");
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferences::new(dir.path().join("absent.toml"));
        assert_eq!(store.get(PREFERRED_LANGUAGE_KEY), None);
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryPreferences::with(PREFERRED_LANGUAGE_KEY, "en");
        store.set(PREFERRED_LANGUAGE_KEY, "zh").unwrap();
        assert_eq!(store.get(PREFERRED_LANGUAGE_KEY).as_deref(), Some("zh"));
    }
}
