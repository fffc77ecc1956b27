// src/logger.rs

use crate::{cli::LogLevel, constants};
use log::LevelFilter;
use std::{env, fs::File, path::PathBuf};

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// 候选日志文件，按优先级排列：配置目录下的主日志，其次是临时目录
fn log_file_candidates() -> Vec<PathBuf> {
    let fallback = env::temp_dir().join(format!(
        "{}-{}",
        clap::crate_name!(),
        constants::LOG_FALLBACK_FILE_NAME
    ));
    dirs::home_dir()
        .map(|home| home.join(constants::CONFIG_DIR_NAME).join(constants::LOG_FILE_NAME))
        .into_iter()
        .chain(std::iter::once(fallback))
        .collect()
}

fn open_first_writable(candidates: &[PathBuf]) -> Option<(PathBuf, File)> {
    candidates.iter().find_map(|path| {
        if let Some(dir) = path.parent() {
            // 目录创建失败时交给 log_file 报错
            let _ = std::fs::create_dir_all(dir);
        }
        match fern::log_file(path) {
            Ok(file) => Some((path.clone(), file)),
            Err(e) => {
                eprintln!("警告: 无法打开日志文件 {:?}: {}", path, e);
                None
            }
        }
    })
}

/// 初始化文件日志。日志只写文件，不干扰终端上的进度条。
pub fn init_logger(level: LogLevel) {
    if level == LogLevel::Off {
        return;
    }

    let candidates = log_file_candidates();
    let Some((path, file)) = open_first_writable(&candidates) else {
        eprintln!("警告: 没有可写的日志文件，本次运行不记录日志。");
        return;
    };

    let applied = fern::Dispatch::new()
        .level(level.into())
        // 依赖库的网络细节只保留警告
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("html5ever", LevelFilter::Warn)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{time}] [{level:<5}] [{target}:{line}] - {message}",
                time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level = record.level(),
                target = record.target(),
                line = record.line().unwrap_or(0),
            ))
        })
        .chain(file)
        .apply();

    match applied {
        Ok(()) if Some(&path) != candidates.first() => {
            log::warn!("日志写入备用文件: {:?}", path)
        }
        Ok(()) => {}
        Err(e) => eprintln!("警告: 日志系统初始化失败: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping_and_candidates() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::Off);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::Debug);

        let candidates = log_file_candidates();
        assert!(candidates.last().unwrap().starts_with(env::temp_dir()));
        if dirs::home_dir().is_some() {
            assert!(candidates[0].ends_with(constants::LOG_FILE_NAME));
        }
    }

    #[test]
    fn test_open_first_writable_skips_bad_paths() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let good = dir.path().join("logs").join("app.log");

        let (path, _) = open_first_writable(&[blocker.join("app.log"), good.clone()]).unwrap();
        assert_eq!(path, good);
    }
}
