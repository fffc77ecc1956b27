// src/downloader/task_processor.rs

use super::file_writer::{download_stream, write_text};
use crate::{
    DownloadJobContext,
    constants::api,
    error::*,
    models::{
        DownloadAction, DownloadResult, DownloadStatus, MediaInfo, VideoJob,
        api::{ElementsResponse, VideoDetailElement},
    },
    subtitle,
};
use log::{debug, error, info, warn};
use url::Url;

/// `TaskProcessor` 封装了处理单个视频任务的所有逻辑。
pub struct TaskProcessor {
    context: DownloadJobContext,
}

impl TaskProcessor {
    pub fn new(context: DownloadJobContext) -> Self {
        Self { context }
    }

    /// 处理单个视频：解析下载地址、写入视频与字幕。
    ///
    /// 任何错误都转换为 `DownloadResult` 中的失败状态，不会影响其他视频。
    pub async fn process(&self, job: &VideoJob) -> DownloadResult {
        let filename = job.video.filename.clone();
        let action = Self::prepare_download_action(job);
        if action == DownloadAction::Skip {
            return DownloadResult {
                filename,
                status: DownloadStatus::Skipped,
                message: Some("视频与字幕均已存在".to_string()),
            };
        }

        info!("[~] Fetching course {}", job.label());
        match self.download_video(job, action).await {
            Ok(()) => {
                info!("[~] Done fetching course {}", job.label());
                DownloadResult {
                    filename,
                    status: DownloadStatus::Success,
                    message: None,
                }
            }
            Err(e) => {
                error!("处理视频 {} 时发生错误: {}", job.label(), e);
                DownloadResult {
                    filename,
                    status: DownloadStatus::from(&e),
                    message: Some(e.to_string()),
                }
            }
        }
    }

    /// 检查本地文件，决定跳过、只补字幕还是完整下载
    pub(super) fn prepare_download_action(job: &VideoJob) -> DownloadAction {
        match (job.video_path.exists(), job.subtitle_path.exists()) {
            (true, true) => DownloadAction::Skip,
            (true, false) => DownloadAction::SubtitleOnly,
            _ => DownloadAction::DownloadNew,
        }
    }

    async fn download_video(&self, job: &VideoJob, action: DownloadAction) -> AppResult<()> {
        let media = self.resolve_video(&job.course_slug, &job.video.slug).await?;

        if action == DownloadAction::DownloadNew {
            download_stream(
                &self.context.http_client,
                &media.url,
                self.context.auth.headers(),
                &job.video_path,
            )
            .await?;
        }

        match media.transcript.as_deref() {
            Some(lines) if !lines.is_empty() => {
                let cues = subtitle::build_cues(lines, media.duration_ms);
                write_text(&subtitle::render_srt(&cues), &job.subtitle_path)?;
                debug!("已写入字幕 {:?} ({} 条)", job.subtitle_path, cues.len());
            }
            _ => debug!("视频 {} 没有字幕", job.label()),
        }
        Ok(())
    }

    fn video_detail_url(&self, course_slug: &str, video_slug: &str) -> AppResult<Url> {
        let mut url = self.context.http_client.endpoint(api::DETAILED_COURSES_PATH)?;
        url.query_pairs_mut()
            .append_pair("addParagraphsToTranscript", "false")
            .append_pair("courseSlug", course_slug)
            .append_pair("q", "slugs")
            .append_pair("resolution", &self.context.config.resolution)
            .append_pair("videoSlug", video_slug);
        Ok(url)
    }

    /// 解析视频的直链、时长与字幕。
    ///
    /// 请求按配置重试；重试耗尽后仍失败的状态码只让当前视频失败。
    pub async fn resolve_video(&self, course_slug: &str, video_slug: &str) -> AppResult<MediaInfo> {
        let url = self.video_detail_url(course_slug, video_slug)?;
        let res = self
            .context
            .http_client
            .get_video_detail(url.clone(), self.context.auth.headers())
            .await?;

        let status = res.status();
        if !status.is_success() {
            warn!("视频详情 '{}' 在 {} 次尝试后仍返回 {}", video_slug, self.context.config.fetch_attempts, status);
            return Err(AppError::RetriesExhausted {
                url: url.to_string(),
                status,
            });
        }

        let body = res.text().await?;
        parse_video_detail(url.as_str(), &body)
    }
}

pub(crate) fn parse_video_detail(url: &str, body: &str) -> AppResult<MediaInfo> {
    let response: ElementsResponse<VideoDetailElement> =
        serde_json::from_str(body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })?;
    let selected = response
        .elements
        .into_iter()
        .next()
        .and_then(|e| e.selected_video)
        .ok_or_else(|| AppError::Parse(format!("视频响应中没有 selectedVideo: {}", url)))?;

    let media_url = selected
        .url
        .and_then(|u| u.progressive_url)
        .ok_or_else(|| AppError::Parse(format!("视频响应中没有 progressiveUrl: {}", url)))?;

    let duration_ms = selected
        .duration_in_seconds
        .map_or(0, |secs| (secs * 1000.0).round() as u64);
    let transcript = selected.transcript.map(|t| t.lines);

    Ok(MediaInfo {
        url: media_url,
        duration_ms,
        transcript,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Video;
    use std::{fs, path::Path};

    #[test]
    fn test_parse_video_detail() {
        let body = r#"{"elements": [{"selectedVideo": {
            "url": {"progressiveUrl": "https://cdn.example.com/v.mp4"},
            "durationInSeconds": 3,
            "transcript": {"lines": [
                {"transcriptStartAt": 0, "caption": "A"},
                {"transcriptStartAt": 1500, "caption": "B"}
            ]}
        }}]}"#;
        let media = parse_video_detail("http://test", body).unwrap();
        assert_eq!(media.url, "https://cdn.example.com/v.mp4");
        assert_eq!(media.duration_ms, 3000);
        assert_eq!(media.transcript.unwrap().len(), 2);
    }

    #[test]
    fn test_parse_video_detail_without_transcript() {
        let body = r#"{"elements": [{"selectedVideo": {"url": {"progressiveUrl": "u"}, "durationInSeconds": 1.25}}]}"#;
        let media = parse_video_detail("http://test", body).unwrap();
        assert_eq!(media.duration_ms, 1250);
        assert!(media.transcript.is_none());
    }

    #[test]
    fn test_malformed_transcript_still_yields_media_url() {
        let body = r#"{"elements": [{"selectedVideo": {
            "url": {"progressiveUrl": "https://cdn.example.com/v.mp4"},
            "durationInSeconds": 2,
            "transcript": {"lines": [
                {"caption": "A"},
                {"transcriptStartAt": 1500.5, "caption": "B"}
            ]}
        }}]}"#;
        let media = parse_video_detail("http://test", body).unwrap();
        assert_eq!(media.url, "https://cdn.example.com/v.mp4");
        assert_eq!(media.duration_ms, 2000);
        assert!(media.transcript.is_none());

        let body = r#"{"elements": [{"selectedVideo": {"url": {"progressiveUrl": "u"}, "transcript": "n/a"}}]}"#;
        assert!(parse_video_detail("http://test", body).unwrap().transcript.is_none());
    }

    #[test]
    fn test_parse_video_detail_missing_url() {
        let body = r#"{"elements": [{"selectedVideo": {"url": {}}}]}"#;
        assert!(matches!(
            parse_video_detail("http://test", body),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_prepare_download_action() {
        let dir = tempfile::tempdir().unwrap();
        let video_path = dir.path().join("01 - Intro.mp4");
        let job = VideoJob {
            course_name: "Course".into(),
            course_slug: "course".into(),
            chapter_index: 1,
            video: Video {
                name: "Intro".into(),
                slug: "intro".into(),
                index: 1,
                filename: "01 - Intro.mp4".into(),
            },
            subtitle_path: crate::utils::subtitle_path(&video_path),
            video_path,
        };

        assert_eq!(TaskProcessor::prepare_download_action(&job), DownloadAction::DownloadNew);
        fs::write(&job.video_path, b"video").unwrap();
        assert_eq!(TaskProcessor::prepare_download_action(&job), DownloadAction::SubtitleOnly);
        fs::write(&job.subtitle_path, b"srt").unwrap();
        assert_eq!(TaskProcessor::prepare_download_action(&job), DownloadAction::Skip);
        assert!(Path::new(&job.subtitle_path).ends_with("01 - Intro.srt"));
    }
}
