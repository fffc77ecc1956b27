// src/config.rs

pub mod credentials;

use self::credentials::{load_or_create_external_config, resolve_password, resolve_username};
use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub fetch_attempts: Option<u32>,
    pub retry_interval_ms: Option<u64>,
    pub resolution: Option<String>,
}

/// 配置文件 (`~/.learning-dl/config.json`) 的内容
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        let network = NetworkConfig {
            base_url: Some(constants::DEFAULT_BASE_URL.into()),
            connect_timeout_secs: Some(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout_secs: None,
            fetch_attempts: Some(constants::DEFAULT_FETCH_ATTEMPTS),
            retry_interval_ms: Some(constants::DEFAULT_RETRY_INTERVAL_MS),
            resolution: Some(constants::DEFAULT_RESOLUTION.into()),
        };

        Self {
            courses: Vec::new(),
            output_dir: Some(PathBuf::from(constants::DEFAULT_SAVE_DIR)),
            max_workers: Some(constants::DEFAULT_MAX_WORKERS),
            network,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub username: String,
    pub password: String,
    pub courses: Vec<String>,
    pub proxy: Option<String>,
    pub output_dir: PathBuf,
    pub max_workers: usize,
    pub base_url: String,
    pub resolution: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Option<Duration>,
    /// 视频详情请求的总尝试次数 (含首次)
    pub fetch_attempts: u32,
    pub retry_interval: Duration,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config(args.config.as_deref())?;
        Self::from_sources(args, external_config)
    }

    /// 合并命令行参数与配置文件，命令行优先
    pub fn from_sources(args: &Cli, external_config: ExternalConfig) -> AppResult<Self> {
        let courses = if args.courses.is_empty() {
            external_config.courses.clone()
        } else {
            args.courses.clone()
        };
        if courses.is_empty() {
            return Err(AppError::Config(
                "未指定任何课程，请使用 --course 或在配置文件中填写 courses".into(),
            ));
        }

        let max_workers = args
            .workers
            .or(external_config.max_workers)
            .unwrap_or(constants::DEFAULT_MAX_WORKERS);
        if max_workers == 0 {
            return Err(AppError::Config("并发数必须至少为 1".into()));
        }

        let username = resolve_username(args.username.as_deref(), &external_config)?;
        let password = resolve_password(args.password.as_deref(), &external_config)?;

        let network = external_config.network;
        Ok(Self {
            username,
            password,
            courses,
            proxy: args.proxy.clone().or(external_config.proxy),
            output_dir: args
                .output
                .clone()
                .or(external_config.output_dir)
                .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_SAVE_DIR)),
            max_workers,
            base_url: network
                .base_url
                .unwrap_or_else(|| constants::DEFAULT_BASE_URL.into()),
            resolution: args
                .resolution
                .clone()
                .or(network.resolution)
                .unwrap_or_else(|| constants::DEFAULT_RESOLUTION.into()),
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                network
                    .connect_timeout_secs
                    .unwrap_or(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            timeout: network.timeout_secs.map(Duration::from_secs),
            fetch_attempts: network
                .fetch_attempts
                .unwrap_or(constants::DEFAULT_FETCH_ATTEMPTS)
                .max(1),
            retry_interval: Duration::from_millis(
                network
                    .retry_interval_ms
                    .unwrap_or(constants::DEFAULT_RETRY_INTERVAL_MS),
            ),
        })
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            username: "user@example.com".to_string(),
            password: "secret".to_string(),
            courses: Vec::new(),
            proxy: None,
            output_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            max_workers: constants::DEFAULT_MAX_WORKERS,
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            resolution: constants::DEFAULT_RESOLUTION.to_string(),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Some(Duration::from_secs(15)),
            fetch_attempts: constants::DEFAULT_FETCH_ATTEMPTS,
            retry_interval: Duration::from_millis(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn file_config() -> ExternalConfig {
        ExternalConfig {
            username: Some("file-user".into()),
            password: Some("file-pass".into()),
            courses: vec!["from-file".into()],
            max_workers: Some(3),
            ..ExternalConfig::default_app_config()
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let args = Cli::parse_from(["learning-dl", "-c", "from-cli", "-u", "cli-user", "-w", "7"]);
        let config = AppConfig::from_sources(&args, file_config()).unwrap();
        assert_eq!(config.courses, vec!["from-cli"]);
        assert_eq!(config.username, "cli-user");
        assert_eq!(config.password, "file-pass");
        assert_eq!(config.max_workers, 7);
        assert_eq!(config.fetch_attempts, 3);
        assert_eq!(config.resolution, "_720");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_falls_back_to_file_values() {
        let args = Cli::parse_from(["learning-dl"]);
        let config = AppConfig::from_sources(&args, file_config()).unwrap();
        assert_eq!(config.courses, vec!["from-file"]);
        assert_eq!(config.username, "file-user");
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.output_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_rejects_missing_courses_and_zero_workers() {
        let args = Cli::parse_from(["learning-dl"]);
        let no_courses = ExternalConfig {
            courses: Vec::new(),
            ..file_config()
        };
        assert!(matches!(
            AppConfig::from_sources(&args, no_courses),
            Err(AppError::Config(_))
        ));

        let args = Cli::parse_from(["learning-dl", "-w", "0"]);
        assert!(matches!(
            AppConfig::from_sources(&args, file_config()),
            Err(AppError::Config(_))
        ));
    }
}
