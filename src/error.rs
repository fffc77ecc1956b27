// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("登录失败，请检查用户名和密码")]
    AuthFailed,
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("请求 '{url}' 在重试后仍然失败 (状态码: {status})")]
    RetriesExhausted { url: String, status: StatusCode },
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("响应内容解析失败: {0}")]
    Parse(String),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("配置错误: {0}")]
    Config(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 是否为连接层 (含代理) 错误
    pub fn is_connection_error(&self) -> bool {
        match self {
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                err.is_connect() || err.is_timeout()
            }
            _ => false,
        }
    }

    /// 进程退出码，便于外部监控区分失败类型
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::AuthFailed => 2,
            e if e.is_connection_error() => 3,
            AppError::Config(_) | AppError::Url(_) => 4,
            AppError::UserInterrupt => 130,
            _ => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
