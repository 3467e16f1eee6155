use crate::utils::error::{Result, ZipManagerError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 프롬프트/확인 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub create_folder: String,
    pub rename: String,
    pub reset: String,
    pub delete: String,
    pub download_name: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            create_folder: "Please enter the folder name".into(),
            rename: "Please enter the entry name".into(),
            reset: "Please confirm the reset".into(),
            delete: "Please confirm the deletion".into(),
            download_name: "Please enter the file name".into(),
        }
    }
}

/// 세션 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PageUp/PageDown 이동 행 수
    pub page_size: usize,
    /// 루트 폴더 내보내기 파일명
    pub root_zip_filename: String,
    /// 폴더 내보내기 확장자
    pub zip_extension: String,
    /// 파일 다운로드 MIME 타입
    pub default_mime_type: String,
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 10,
            root_zip_filename: "Download.zip".into(),
            zip_extension: ".zip".into(),
            default_mime_type: "application/octet-stream".into(),
            messages: Messages::default(),
        }
    }
}

impl Config {
    const APP_DIR: &'static str = "zip-manager";
    const FILE_NAME: &'static str = "config.toml";
    const PATH_ENV: &'static str = "ZIP_MANAGER_CONFIG_FILE";
    const LOG_FILE_NAME: &'static str = "zip-manager.log";

    /// TOML 파일에서 설정 로드
    pub fn from_file(path: &Path) -> std::result::Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 설정을 TOML 파일로 저장
    pub fn save_to_file(&self, path: &Path) -> std::result::Result<(), anyhow::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 설정 파일 경로 (환경변수 우선, 없으면 설정 디렉토리)
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(custom) = env::var(Self::PATH_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// 로그 파일 경로 (로컬 데이터 디렉토리)
    pub fn log_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::LOG_FILE_NAME))
    }

    /// 로그 파일을 이어쓰기로 열기 (상위 디렉토리 생성)
    pub fn open_log_file(path: &Path) -> Result<fs::File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(file)
    }

    /// 설정 로드
    ///
    /// 파일이 없으면 기본값, 파싱 실패는 에러로 반환합니다.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_file(path)
            .map_err(|e| ZipManagerError::Config(format!("{}: {:#}", path.display(), e)))?;
        if config.page_size == 0 {
            return Err(ZipManagerError::Config(format!(
                "{}: page_size must be at least 1",
                path.display()
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(&temp.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.root_zip_filename, "Download.zip");
    }

    #[test]
    fn test_log_file_is_appended() {
        use std::io::Write;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("zip-manager.log");
        writeln!(Config::open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(Config::open_log_file(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        if let Some(log_path) = Config::log_path() {
            assert!(log_path.ends_with("zip-manager/zip-manager.log"));
        }
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = Config {
            page_size: 25,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.page_size, 25);
        assert_eq!(loaded.messages, Messages::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "page_size = 3\n[messages]\ndelete = \"Sure?\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.page_size, 3);
        assert_eq!(config.messages.delete, "Sure?");
        assert_eq!(config.messages.reset, "Please confirm the reset");
        assert_eq!(config.zip_extension, ".zip");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "page_size = \"many\"").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ZipManagerError::Config(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "page_size = 0").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
