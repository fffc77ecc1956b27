// src/lib.rs

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod subtitle;
pub mod ui;
pub mod utils;

use crate::{
    auth::AuthState,
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    downloader::{CourseDownloader, CourseOutcome, DownloadManager, DownloadStats, TaskScheduler},
    error::AppResult,
};
use futures::future::join_all;
use indicatif::ProgressBar;
use log::{debug, info};
use std::{fs, sync::Arc};

/// 核心的执行上下文，包含所有任务所需的状态和工具。
///
/// 登录完成后才会构建，之后所有字段都只读共享。
#[derive(Clone)]
pub struct DownloadJobContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub auth: Arc<AuthState>,
    pub scheduler: TaskScheduler,
    pub progress: ProgressBar,
}

impl DownloadJobContext {
    pub fn new(config: Arc<AppConfig>, http_client: Arc<RobustClient>, auth: AuthState) -> Self {
        Self {
            manager: DownloadManager::new(),
            scheduler: TaskScheduler::new(config.max_workers),
            progress: ui::new_tasks_progress_bar("下载"),
            auth: Arc::new(auth),
            config,
            http_client,
        }
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<DownloadStats> {
    debug!("CLI 参数: {:?}", args.courses);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!(
        "加载的应用配置: courses={:?}, output={:?}, workers={}, proxy={:?}",
        config.courses, config.output_dir, config.max_workers, config.proxy
    );
    run(config).await
}

/// 登录一次，然后并发处理所有课程。
///
/// 登录失败会中止整个运行；单个课程或视频的失败只记入统计。
pub async fn run(config: Arc<AppConfig>) -> AppResult<DownloadStats> {
    fs::create_dir_all(&config.output_dir)?;
    let absolute_path = dunce::canonicalize(&config.output_dir)?;
    info!("文件将保存到目录: \"{}\"", absolute_path.display());
    ui::info(&format!("文件将保存到目录: \"{}\"", absolute_path.display()));

    let http_client = Arc::new(RobustClient::new(config.clone())?);

    info!("[*] -------------Login-------------");
    ui::section("登录");
    let auth_state = auth::login(&http_client, &config.username, &config.password).await?;
    ui::info("登录成功。");
    info!("[*] -------------Done-------------");

    let context = DownloadJobContext::new(config.clone(), http_client, auth_state);

    info!("[*] -------------Fetching Course-------------");
    ui::section(&format!(
        "开始处理 {} 个课程 (并发数: {})",
        config.courses.len(),
        context.scheduler.limit()
    ));
    let outcomes = join_all(config.courses.iter().map(|slug| {
        let downloader = CourseDownloader::new(context.clone());
        async move { (slug, downloader.run(slug).await) }
    }))
    .await;

    for (slug, outcome) in outcomes {
        match outcome {
            Ok(CourseOutcome::Denied) => {
                context
                    .progress
                    .println(format!("{} 课程 '{}' 无访问权限，已跳过", *ui::symbols::WARN, slug));
            }
            Ok(CourseOutcome::Completed { course, results }) => {
                debug!("课程 '{}' 共处理 {} 个视频", course.name, results.len());
            }
            Err(e) => {
                context.manager.record_course_failure(slug, &e.to_string());
                context
                    .progress
                    .println(format!("{} 课程 '{}' 处理失败: {}", *ui::symbols::ERROR, slug, e));
            }
        }
    }
    context.progress.finish_and_clear();
    info!("[*] -------------Done-------------");

    context.manager.print_report();
    Ok(context.manager.get_stats())
}
