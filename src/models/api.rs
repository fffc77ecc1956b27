// src/models/api.rs

use log::warn;
use serde::{Deserialize, Deserializer};

// --- 通用结构体 ---

/// `detailedCourses` 接口的外层包装，课程与视频详情共用
#[derive(Deserialize, Debug, Clone)]
pub struct ElementsResponse<T> {
    #[serde(default = "Vec::new")]
    pub elements: Vec<T>,
}

// --- 课程详情 API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CourseElement {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub full_course_unlocked: bool,
    #[serde(default)]
    pub chapters: Vec<ChapterElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChapterElement {
    pub title: String,
    #[serde(default)]
    pub videos: Vec<VideoElement>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VideoElement {
    pub title: String,
    pub slug: String,
}

// --- 视频详情 API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetailElement {
    pub selected_video: Option<SelectedVideo>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectedVideo {
    pub url: Option<VideoUrl>,
    #[serde(default)]
    pub duration_in_seconds: Option<f64>,
    /// 字幕格式异常时记为 `None`，不影响视频本身的下载
    #[serde(default, deserialize_with = "lenient_transcript")]
    pub transcript: Option<Transcript>,
}

fn lenient_transcript<'de, D>(deserializer: D) -> Result<Option<Transcript>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(raw) {
        Ok(transcript) => Ok(Some(transcript)),
        Err(e) => {
            warn!("字幕数据格式异常，已忽略: {}", e);
            Ok(None)
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoUrl {
    pub progressive_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Transcript {
    #[serde(default)]
    pub lines: Vec<TranscriptLine>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    /// 相对视频开头的毫秒偏移
    pub transcript_start_at: u64,
    #[serde(default)]
    pub caption: String,
}
