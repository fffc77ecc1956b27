// tests/common/mod.rs

#![allow(dead_code)]

use learning_dl::config::AppConfig;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};
use std::path::Path;

pub const COURSES_PATH: &str = "/learning-api/detailedCourses";
pub const LOGIN_PAGE: &str = include_str!("../fixtures/login_page.html");
pub const CSRF_COOKIE: &str = "ajax:0123456789";

/// 指向模拟服务器、输出到临时目录的配置
pub fn test_config(server: &ServerGuard, output_dir: &Path, courses: &[&str]) -> AppConfig {
    AppConfig {
        base_url: server.url(),
        output_dir: output_dir.to_path_buf(),
        courses: courses.iter().map(|c| c.to_string()).collect(),
        max_workers: 2,
        ..Default::default()
    }
}

/// 登录页 (下发 JSESSIONID) 与登录表单提交 (下发 li_at)
pub async fn mock_login(server: &mut ServerGuard) -> (Mock, Mock) {
    let page = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_header("set-cookie", &format!("JSESSIONID=\"{}\"; Path=/", CSRF_COOKIE))
        .with_body(LOGIN_PAGE)
        .create_async()
        .await;
    let submit = server
        .mock("POST", "/uas/login-submit")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("session_key".into(), "user@example.com".into()),
            Matcher::UrlEncoded("session_password".into(), "secret".into()),
            Matcher::UrlEncoded("loginCsrfParam".into(), "3e5b1c2a-csrf-token".into()),
        ]))
        .with_status(200)
        .with_header("set-cookie", "li_at=AQEDAR-session; Path=/")
        .with_body("<html>feed</html>")
        .create_async()
        .await;
    (page, submit)
}

/// 构造课程详情响应。`chapters` 中每项为 (章节标题, [(视频标题, 视频 slug)])
pub fn course_body(title: &str, slug: &str, unlocked: bool, chapters: &[(&str, Vec<(&str, &str)>)]) -> String {
    let chapters: Vec<Value> = chapters
        .iter()
        .map(|(chapter_title, videos)| {
            let videos: Vec<Value> = videos
                .iter()
                .map(|(title, slug)| json!({ "title": title, "slug": slug }))
                .collect();
            json!({ "title": chapter_title, "videos": videos })
        })
        .collect();
    json!({
        "elements": [{
            "title": title,
            "slug": slug,
            "description": "",
            "fullCourseUnlocked": unlocked,
            "chapters": chapters
        }]
    })
    .to_string()
}

/// 视频详情响应：3 秒时长，两条字幕
pub fn video_body(media_url: &str) -> String {
    json!({
        "elements": [{
            "selectedVideo": {
                "url": { "progressiveUrl": media_url },
                "durationInSeconds": 3,
                "transcript": {
                    "lines": [
                        { "transcriptStartAt": 0, "caption": "Hello" },
                        { "transcriptStartAt": 1500, "caption": "World" }
                    ]
                }
            }
        }]
    })
    .to_string()
}

pub const EXPECTED_SRT: &str =
    "1\n00:00:00,000 --> 00:00:01,500\nHello\n\n2\n00:00:01,500 --> 00:00:03,000\nWorld\n\n";

pub fn course_query(course_slug: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("addParagraphsToTranscript".into(), "true".into()),
        Matcher::UrlEncoded("courseSlug".into(), course_slug.into()),
    ])
}

pub fn video_query(course_slug: &str, video_slug: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("addParagraphsToTranscript".into(), "false".into()),
        Matcher::UrlEncoded("courseSlug".into(), course_slug.into()),
        Matcher::UrlEncoded("videoSlug".into(), video_slug.into()),
        Matcher::UrlEncoded("resolution".into(), "_720".into()),
    ])
}

pub async fn mock_course(server: &mut ServerGuard, course_slug: &str, body: String) -> Mock {
    server
        .mock("GET", COURSES_PATH)
        .match_query(course_query(course_slug))
        .match_header("csrf-token", CSRF_COOKIE)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// 视频详情接口与对应的媒体文件
pub async fn mock_video(
    server: &mut ServerGuard,
    course_slug: &str,
    video_slug: &str,
    content: &[u8],
) -> (Mock, Mock) {
    let media_path = format!("/media/{}.mp4", video_slug);
    let media_url = format!("{}{}", server.url(), media_path);
    let detail = server
        .mock("GET", COURSES_PATH)
        .match_query(video_query(course_slug, video_slug))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(video_body(&media_url))
        .create_async()
        .await;
    let media = server
        .mock("GET", media_path.as_str())
        .with_status(200)
        .with_header("content-type", "video/mp4")
        .with_body(content)
        .create_async()
        .await;
    (detail, media)
}
