// src/models/mod.rs

pub mod api;

use crate::error::AppError;
use crate::ui::symbols;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

use self::api::TranscriptLine;

// --- 课程目录层级: Course -> Chapter -> Video ---

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub unlocked: bool,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub name: String,
    /// 从 1 开始，与 API 返回顺序一致
    pub index: usize,
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub name: String,
    pub slug: String,
    pub index: usize,
    pub filename: String,
}

impl Course {
    pub fn video_count(&self) -> usize {
        self.chapters.iter().map(|c| c.videos.len()).sum()
    }
}

/// 单个视频解析后的下载信息
#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub url: String,
    pub duration_ms: u64,
    pub transcript: Option<Vec<TranscriptLine>>,
}

/// 调度器中的一个工作单元
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub course_name: String,
    pub course_slug: String,
    pub chapter_index: usize,
    pub video: Video,
    pub video_path: PathBuf,
    pub subtitle_path: PathBuf,
}

impl VideoJob {
    pub fn label(&self) -> String {
        format!(
            "'{}' Chapter no. {} Video no. {}",
            self.course_name, self.chapter_index, self.video.index
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    Skipped,
    HttpError,
    NetworkError,
    ConnectionError,
    TimeoutError,
    RetryExhausted,
    ParseError,
    IoError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Success => (&symbols::OK, |s| s.green(), "下载成功"),
            DownloadStatus::Skipped => (&symbols::INFO, |s| s.cyan(), "文件已存在，跳过"),
            DownloadStatus::HttpError => (&symbols::ERROR, |s| s.red(), "服务器返回错误"),
            DownloadStatus::NetworkError => (&symbols::ERROR, |s| s.red(), "网络请求失败"),
            DownloadStatus::ConnectionError => (&symbols::ERROR, |s| s.red(), "无法建立连接"),
            DownloadStatus::TimeoutError => (&symbols::WARN, |s| s.yellow(), "网络连接超时"),
            DownloadStatus::RetryExhausted => (&symbols::ERROR, |s| s.red(), "视频信息获取失败 (重试次数已用尽)"),
            DownloadStatus::ParseError => (&symbols::ERROR, |s| s.red(), "API 响应格式异常"),
            DownloadStatus::IoError => (&symbols::ERROR, |s| s.red(), "本地文件读写错误"),
            DownloadStatus::UnexpectedError => {
                (&symbols::ERROR, |s| s.red(), "发生未预期的程序错误")
            }
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                if err.is_timeout() {
                    DownloadStatus::TimeoutError
                } else if err.is_connect() {
                    DownloadStatus::ConnectionError
                } else if err.is_status() {
                    DownloadStatus::HttpError
                } else {
                    DownloadStatus::NetworkError
                }
            }
            AppError::NetworkMiddleware(_) => DownloadStatus::NetworkError,
            AppError::RetriesExhausted { .. } => DownloadStatus::RetryExhausted,
            AppError::Io(_) | AppError::TempFilePersist(_) => DownloadStatus::IoError,
            AppError::Json(_) | AppError::ApiParseFailed { .. } | AppError::Parse(_) => {
                DownloadStatus::ParseError
            }
            _ => DownloadStatus::UnexpectedError,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub filename: String,
    pub status: DownloadStatus,
    pub message: Option<String>,
}

/// 根据本地文件状态决定如何处理一个视频
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadAction {
    /// 视频与字幕均已存在
    Skip,
    /// 视频已存在，只需补齐字幕
    SubtitleOnly,
    DownloadNew,
}
