// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use learning_dl::{cli::Cli, error::AppError, logger, run_from_cli};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(AppError::UserInterrupt.exit_code());
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "learning-dl".to_string());

    let after_help = format!(
        "示例:\n  # 下载配置文件中列出的所有课程\n  {bin}\n\n  # 指定课程与保存目录\n  {bin} -c learning-rust -c advanced-rust -o ./courses\n\n  # 通过代理下载，并限制并发数\n  {bin} -c learning-rust --proxy http://127.0.0.1:8080 -w 4",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logger::init_logger(args.log_level);

    match run_from_cli(args).await {
        Ok(stats) if stats.all_succeeded() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            log::error!("程序执行出错: {}", e);
            let hint = if e.is_connection_error() {
                " (请检查网络连接或代理设置)"
            } else {
                ""
            };
            eprintln!(
                "\n{} {}",
                "[X]".red(),
                format!("程序执行出错: {}{}", e, hint).red()
            );
            std::process::exit(e.exit_code());
        }
    }
}
