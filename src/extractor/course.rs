// src/extractor/course.rs

use crate::{
    auth::AuthState,
    client::RobustClient,
    constants::api,
    error::*,
    models::{
        Chapter, Course, Video,
        api::{CourseElement, ElementsResponse},
    },
    utils,
};
use log::{debug, info};
use std::sync::Arc;
use url::Url;

/// 课程目录解析器：每个课程一次请求，得到 Course/Chapter/Video 树
pub struct CourseExtractor {
    http_client: Arc<RobustClient>,
    auth: Arc<AuthState>,
}

impl CourseExtractor {
    pub fn new(http_client: Arc<RobustClient>, auth: Arc<AuthState>) -> Self {
        Self {
            http_client,
            auth,
        }
    }

    fn course_url(&self, course_slug: &str) -> AppResult<Url> {
        let mut url = self.http_client.endpoint(api::DETAILED_COURSES_PATH)?;
        url.query_pairs_mut()
            .append_pair("fields", api::COURSE_FIELDS)
            .append_pair("addParagraphsToTranscript", "true")
            .append_pair("courseSlug", course_slug)
            .append_pair("q", "slugs");
        Ok(url)
    }

    /// 获取单个课程的完整目录。
    ///
    /// 账号无权访问 (`unlocked == false`) 时返回 `None`，不视为错误。此处不重试。
    pub async fn fetch_course(&self, course_slug: &str) -> AppResult<Option<Course>> {
        let url = self.course_url(course_slug)?;
        debug!("请求课程详情: {}", url);
        let body = self
            .http_client
            .get(url.clone(), self.auth.headers())
            .await?
            .text()
            .await?;
        let course = parse_course_response(url.as_str(), &body)?;

        info!(
            "[*] Access to {} is {}",
            course.name,
            if course.unlocked { "GRANTED" } else { "DENIED" }
        );
        if !course.unlocked {
            return Ok(None);
        }
        debug!(
            "课程 '{}' 共 {} 章 {} 个视频",
            course.name,
            course.chapters.len(),
            course.video_count()
        );
        Ok(Some(course))
    }
}

pub(crate) fn parse_course_response(url: &str, body: &str) -> AppResult<Course> {
    let response: ElementsResponse<CourseElement> =
        serde_json::from_str(body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })?;
    let element = response
        .elements
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Parse(format!("课程响应中没有 elements[0]: {}", url)))?;
    Ok(build_course(element))
}

/// 按 API 返回顺序从 1 开始编号章节和视频
pub fn build_course(element: CourseElement) -> Course {
    let chapters = element
        .chapters
        .into_iter()
        .enumerate()
        .map(|(chapter_idx, chapter)| Chapter {
            name: chapter.title,
            index: chapter_idx + 1,
            videos: chapter
                .videos
                .into_iter()
                .enumerate()
                .map(|(video_idx, video)| Video {
                    filename: utils::video_filename(video_idx + 1, &video.title),
                    name: video.title,
                    slug: video.slug,
                    index: video_idx + 1,
                })
                .collect(),
        })
        .collect();

    Course {
        name: element.title,
        slug: element.slug,
        description: element.description.unwrap_or_default(),
        unlocked: element.full_course_unlocked,
        chapters,
    }
}
