// src/downloader/task_runner.rs

use super::task_processor::TaskProcessor;
use crate::{DownloadJobContext, constants, models::*, utils};
use futures::future::join_all;
use log::{debug, error};
use std::{future::Future, sync::Arc};
use tokio::sync::Semaphore;

/// 全局并发闸门。
///
/// 同一个实例被所有课程共享，因此并发上限作用于整个运行过程而不是单个课程。
#[derive(Clone, Debug)]
pub struct TaskScheduler {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl TaskScheduler {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 并发执行全部任务，每个任务在持有许可期间运行，结束 (无论成败) 时自动归还。
    ///
    /// 所有任务都会被等待完成；单个任务的结果不会中断其他任务。
    pub async fn run_all<T, F, Fut>(&self, items: Vec<T>, f: F) -> Vec<Fut::Output>
    where
        F: Fn(T) -> Fut,
        Fut: Future,
    {
        let tasks = items.into_iter().map(|item| {
            let permits = Arc::clone(&self.permits);
            let fut = f(item);
            async move {
                // 信号量从不关闭，acquire 只会在关闭时失败
                let _permit = permits.acquire_owned().await.ok();
                fut.await
            }
        });
        join_all(tasks).await
    }
}

/// 在全局并发限制下执行一批视频任务，并把结果记入统计。
pub async fn execute_video_jobs(context: &DownloadJobContext, jobs: Vec<VideoJob>) -> Vec<DownloadResult> {
    if jobs.is_empty() {
        return Vec::new();
    }
    debug!(
        "调度 {} 个视频任务 (全局并发上限: {})",
        jobs.len(),
        context.scheduler.limit()
    );

    context
        .scheduler
        .run_all(jobs, |job| run_single_concurrent_task(job, context.clone()))
        .await
}

/// 在并发池中运行的单个任务单元。
async fn run_single_concurrent_task(job: VideoJob, context: DownloadJobContext) -> DownloadResult {
    let processor = TaskProcessor::new(context.clone());
    let result = processor.process(&job).await;

    match result.status {
        DownloadStatus::Success => context.manager.record_success(),
        DownloadStatus::Skipped => context.manager.record_skip(
            &result.filename,
            result.message.as_deref().unwrap_or("文件已存在"),
        ),
        status => {
            error!("视频 {} 失败: {:?}", job.label(), result.message);
            context
                .manager
                .record_failure(&job.video_path.to_string_lossy(), status, result.message.as_deref());
        }
    }

    context.progress.inc(1);
    if result.status != DownloadStatus::Skipped {
        let (symbol, color_fn, default_msg) = result.status.get_display_info();
        let name = utils::truncate_text(&result.filename, constants::UI_WIDTH / 2);
        let msg = match &result.message {
            Some(err_msg) => format!(
                "{} {} {}",
                symbol,
                name,
                color_fn(format!("失败: {} (详情: {})", default_msg, err_msg).into())
            ),
            None => format!("{} {}", symbol, name),
        };
        context.progress.println(msg);
    }
    result
}
