// src/downloader/job.rs

use super::{provision, task_runner};
use crate::{
    DownloadJobContext,
    error::*,
    extractor::CourseExtractor,
    models::{Course, DownloadResult, VideoJob},
    utils,
};
use log::info;
use std::path::Path;

/// 单个课程的处理结果
#[derive(Debug)]
pub enum CourseOutcome {
    /// 账号无权访问，未创建任何目录也未请求任何视频
    Denied,
    Completed {
        course: Course,
        results: Vec<DownloadResult>,
    },
}

/// 负责一个课程的完整流程：解析目录 -> 创建章节目录 -> 调度视频下载
pub struct CourseDownloader {
    context: DownloadJobContext,
}

impl CourseDownloader {
    pub fn new(context: DownloadJobContext) -> Self {
        Self { context }
    }

    pub async fn run(&self, course_slug: &str) -> AppResult<CourseOutcome> {
        info!("开始处理课程: {}", course_slug);
        let extractor = CourseExtractor::new(
            self.context.http_client.clone(),
            self.context.auth.clone(),
        );
        let Some(course) = extractor.fetch_course(course_slug).await? else {
            self.context.manager.record_course_denied(course_slug);
            return Ok(CourseOutcome::Denied);
        };

        // 目录必须在该课程的任何下载开始之前创建完毕
        let base_dir = self.context.config.output_dir.as_path();
        provision::provision_chapter_dirs(base_dir, &course)?;

        let jobs = build_video_jobs(base_dir, &course);
        self.context.manager.add_batch(&course.name, jobs.len());
        self.context.progress.inc_length(jobs.len() as u64);

        let results = task_runner::execute_video_jobs(&self.context, jobs).await;
        info!("[*] Finished fetching course \"{}\"", course.name);
        Ok(CourseOutcome::Completed { course, results })
    }
}

/// 展开课程下所有章节的视频，生成调度单元
pub fn build_video_jobs(base_dir: &Path, course: &Course) -> Vec<VideoJob> {
    course
        .chapters
        .iter()
        .flat_map(|chapter| {
            let dir = provision::chapter_dir(base_dir, course, chapter);
            chapter.videos.iter().map(move |video| {
                let video_path = dir.join(&video.filename);
                VideoJob {
                    course_name: course.name.clone(),
                    course_slug: course.slug.clone(),
                    chapter_index: chapter.index,
                    video: video.clone(),
                    subtitle_path: utils::subtitle_path(&video_path),
                    video_path,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chapter, Video};
    use std::path::PathBuf;

    #[test]
    fn test_build_video_jobs_paths() {
        let video = |index: usize, name: &str| Video {
            name: name.into(),
            slug: name.to_lowercase(),
            index,
            filename: utils::video_filename(index, name),
        };
        let course = Course {
            name: "Learning Rust".into(),
            slug: "learning-rust".into(),
            description: String::new(),
            unlocked: true,
            chapters: vec![
                Chapter { name: "Intro".into(), index: 1, videos: vec![video(1, "Welcome")] },
                Chapter {
                    name: "Control Flow".into(),
                    index: 3,
                    videos: (1..=7).map(|i| video(i, if i == 7 { "Loops" } else { "Other" })).collect(),
                },
            ],
        };

        let jobs = build_video_jobs(Path::new("root"), &course);
        assert_eq!(jobs.len(), 8);

        let loops = jobs.last().unwrap();
        assert_eq!(loops.chapter_index, 3);
        assert_eq!(
            loops.video_path,
            PathBuf::from("root/Learning Rust/03 - Control Flow/07 - Loops.mp4")
        );
        assert_eq!(
            loops.subtitle_path,
            PathBuf::from("root/Learning Rust/03 - Control Flow/07 - Loops.srt")
        );
    }
}
