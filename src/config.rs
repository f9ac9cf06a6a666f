use crate::error::{PdfMasterError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// サーバーURLの環境変数（設定ファイルより優先）
pub const SERVER_ENV: &str = "PDF_MASTER_SERVER";

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PdfMasterError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pdf-master").join("config.json"))
    }

    /// 接続先サーバー
    ///
    /// 優先順: コマンドライン指定 > 環境変数 > 設定ファイル
    pub fn server_url(&self, override_url: Option<&str>) -> String {
        if let Some(url) = override_url {
            return url.to_string();
        }
        if let Ok(url) = std::env::var(SERVER_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.server_url.clone()
    }

    /// 出力先（未指定ならカレント）
    pub fn output_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        override_dir
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn set_server_url(&mut self, url: String) -> Result<()> {
        let trimmed = url.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(PdfMasterError::Config(format!(
                "サーバーURLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.server_url = trimmed.trim_end_matches('/').to_string();
        self.save()
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = Some(dir);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"output_dir": "/tmp/out"}"#).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_override_wins() {
        let config = Config::default();
        assert_eq!(config.server_url(Some("http://example:8080")), "http://example:8080");
    }

    #[test]
    fn test_output_dir_fallbacks() {
        let mut config = Config::default();
        assert_eq!(config.output_dir(None), PathBuf::from("."));
        config.output_dir = Some(PathBuf::from("out"));
        assert_eq!(config.output_dir(None), PathBuf::from("out"));
        assert_eq!(config.output_dir(Some(PathBuf::from("x"))), PathBuf::from("x"));
    }
}
