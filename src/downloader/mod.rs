// src/downloader/mod.rs

mod file_writer;
mod job;
mod provision;
mod task_processor;
mod task_runner;

pub use file_writer::{download_stream, write_stream, write_text};
pub use job::{CourseDownloader, CourseOutcome};
pub use provision::{chapter_dir, course_dir, provision_chapter_dirs};
pub use task_processor::TaskProcessor;
pub use task_runner::{TaskScheduler, execute_video_jobs};

use crate::{models::DownloadStatus, ui::{self, symbols}};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    pub courses_denied: usize,
    pub courses_failed: usize,
}

impl DownloadStats {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.courses_failed == 0
    }
}

/// 汇总整个运行过程中的下载结果，供最终报告与退出码使用
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
    failed_courses: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
            failed_courses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_stats(&self, f: impl FnOnce(&mut DownloadStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }

    /// 课程是并发解析的，每个课程解析完成后追加自己的视频数量
    pub fn add_batch(&self, course_name: &str, total_tasks: usize) {
        info!("课程 '{}' 新增下载任务，数量: {}", course_name, total_tasks);
        self.with_stats(|s| s.total += total_tasks);
    }

    pub fn record_success(&self) {
        self.with_stats(|s| s.success += 1);
    }

    pub fn record_skip(&self, filename: &str, reason: &str) {
        info!("跳过文件 '{}'，原因: {}", filename, reason);
        self.with_stats(|s| s.skipped += 1);
    }

    pub fn record_failure(&self, filename: &str, status: DownloadStatus, detail: Option<&str>) {
        log::error!("文件 '{}' 下载失败，状态: {:?}", filename, status);
        self.with_stats(|s| s.failed += 1);
        let (_, _, msg) = status.get_display_info();
        let reason = match detail {
            Some(detail) => format!("{} ({})", msg, detail),
            None => msg.to_string(),
        };
        if let Ok(mut failed) = self.failed_downloads.lock() {
            failed.push((filename.to_string(), reason));
        }
    }

    pub fn record_course_denied(&self, course_slug: &str) {
        info!("课程 '{}' 无访问权限，已跳过", course_slug);
        self.with_stats(|s| s.courses_denied += 1);
    }

    pub fn record_course_failure(&self, course_slug: &str, reason: &str) {
        log::error!("课程 '{}' 处理失败: {}", course_slug, reason);
        self.with_stats(|s| s.courses_failed += 1);
        if let Ok(mut failed) = self.failed_courses.lock() {
            failed.push((course_slug.to_string(), reason.to_string()));
        }
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn did_all_succeed(&self) -> bool {
        self.get_stats().all_succeeded()
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        info!(
            "下载报告: Total={}, Success={}, Skipped={}, Failed={}, CoursesDenied={}, CoursesFailed={}",
            stats.total,
            stats.success,
            stats.skipped,
            stats.failed,
            stats.courses_denied,
            stats.courses_failed
        );

        let failed_courses = self.failed_courses.lock().map(|v| v.clone()).unwrap_or_default();
        let failed = self.failed_downloads.lock().map(|v| v.clone()).unwrap_or_default();
        if !failed_courses.is_empty() || !failed.is_empty() {
            ui::subsection("失败详情报告");
            if !failed_courses.is_empty() {
                println!("\n{} 处理失败的课程 ({}个):", *symbols::ERROR, failed_courses.len());
                print_grouped_report(&failed_courses, |s| s.red());
            }
            if !failed.is_empty() {
                println!("\n{} 失败的文件 ({}个):", *symbols::ERROR, stats.failed);
                print_grouped_report(&failed, |s| s.red());
            }
        }
        if stats.courses_denied > 0 {
            println!(
                "\n{} {} 个课程因账号无访问权限而跳过。",
                *symbols::WARN,
                stats.courses_denied
            );
        }

        ui::subsection("任务总结");
        if self.did_all_succeed() {
            println!(
                "{} 所有 {} 个视频均已完成 ({} 个已跳过)。",
                *symbols::OK,
                stats.total,
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("成功: {}", stats.success).green(),
                format!("失败: {}", stats.failed).red(),
                format!("跳过: {}", stats.skipped).yellow()
            );
            println!("{}", summary);
        }
    }
}

// 模块内的私有辅助函数
fn print_grouped_report(
    items: &[(String, String)],
    color_fn: fn(ColoredString) -> ColoredString,
) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (name, reason) in items {
        grouped.entry(reason).or_default().push(name);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().copied().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("原因: {}", reason).into()));
        let mut names = grouped.get(reason).cloned().unwrap_or_default();
        names.sort();
        for name in names {
            println!("    - {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_accumulates_across_courses() {
        let manager = DownloadManager::new();
        manager.add_batch("a", 2);
        manager.add_batch("b", 3);
        manager.record_success();
        manager.record_skip("x.mp4", "文件已存在");
        assert!(manager.did_all_succeed());

        manager.record_failure("y.mp4", DownloadStatus::IoError, Some("disk full"));
        manager.record_course_denied("locked");
        let stats = manager.get_stats();
        assert_eq!(stats.total, 5);
        assert_eq!((stats.success, stats.skipped, stats.failed), (1, 1, 1));
        assert_eq!(stats.courses_denied, 1);
        assert!(!manager.did_all_succeed());
    }

    #[test]
    fn test_course_failure_fails_run() {
        let manager = DownloadManager::new();
        manager.record_course_failure("broken", "HTTP 500");
        assert!(!manager.did_all_succeed());
        assert_eq!(manager.get_stats().courses_failed, 1);
    }
}
