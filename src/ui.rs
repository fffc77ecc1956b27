// src/ui.rs

use crate::constants::UI_WIDTH;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};

pub mod symbols {
    use colored::{ColoredString, Colorize};
    use std::sync::LazyLock;

    pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
    pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
    pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
    pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
}

/// `══ 标题 ═══...`，一个阶段的开始
pub fn section(title: &str) {
    let lead = format!("══ {} ", title);
    let fill = UI_WIDTH.saturating_sub(lead.chars().count());
    println!("\n{}{}", lead.cyan().bold(), "═".repeat(fill).cyan());
}

pub fn subsection(title: &str) {
    println!("\n{} {}", "──".dimmed(), title.bold());
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

/// 从标准输入读取一行，去掉首尾空白
pub fn ask(label: &str) -> io::Result<String> {
    print!("\n>>> {}: ", label);
    io::stdout().flush()?;
    let line = io::stdin().lock().lines().next().transpose()?;
    Ok(line.unwrap_or_default().trim().to_string())
}

/// 不回显输入，用于读取密码
pub fn ask_secret(label: &str) -> io::Result<String> {
    rpassword::prompt_password(format!("\n>>> {}: ", label))
}

/// 按任务数量计数的进度条。总数在课程解析完成后逐步追加。
pub fn new_tasks_progress_bar(prefix: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{prefix:>4.cyan.bold} [{bar:40.green/white}] {pos}/{len} ({elapsed_precise})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    ProgressBar::new(0)
        .with_style(style)
        .with_prefix(prefix.to_string())
}
