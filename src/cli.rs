// src/cli.rs

use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 下载选项 (Options) ---
    /// 要下载的课程标识 (slug)，可重复指定；未指定时使用配置文件中的课程列表
    #[arg(short, long = "course", value_name = "SLUG", help_heading = "Options")]
    pub courses: Vec<String>,
    /// 登录用户名 (邮箱)
    #[arg(short, long, help_heading = "Options")]
    pub username: Option<String>,
    /// 登录密码，也可通过环境变量 LEARNING_DL_PASSWORD 提供
    #[arg(long, help_heading = "Options")]
    pub password: Option<String>,
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", help_heading = "Options")]
    pub output: Option<PathBuf>,
    /// 设置最大并发下载数
    #[arg(short, long, value_parser = clap::value_parser!(usize), help_heading = "Options")]
    pub workers: Option<usize>,
    /// 使用 HTTP/SOCKS 代理，例如 'http://127.0.0.1:8080'
    #[arg(long, value_name = "URL", help_heading = "Options")]
    pub proxy: Option<String>,
    /// 请求的视频清晰度，例如 '_720'
    #[arg(long, help_heading = "Options")]
    pub resolution: Option<String>,
    /// 使用指定的配置文件代替默认位置
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
