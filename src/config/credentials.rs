// src/config/credentials.rs

use crate::{
    config::ExternalConfig, // 只需要从父模块导入结构体定义
    constants,
    error::{AppError, AppResult},
    ui,
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

/// 读取配置文件；默认位置的文件不存在时写入一份默认配置
pub(crate) fn load_or_create_external_config(custom_path: Option<&Path>) -> AppResult<ExternalConfig> {
    if let Some(path) = custom_path {
        return read_config_file(path);
    }

    let config_path = get_config_path()?;
    if config_path.is_file() {
        read_config_file(&config_path)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

fn read_config_file(path: &Path) -> AppResult<ExternalConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("读取配置文件 '{}' 失败", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件 '{}' 失败: {}", path.display(), e)))
}

pub fn resolve_username(cli_username: Option<&str>, config: &ExternalConfig) -> AppResult<String> {
    if let Some(name) = cli_username && !name.is_empty() {
        debug!("使用来自命令行参数的用户名");
        return Ok(name.to_string());
    }
    if let Some(name) = config.username.as_deref() && !name.is_empty() {
        debug!("使用来自配置文件的用户名");
        return Ok(name.to_string());
    }
    let name = ui::ask("请输入登录用户名 (邮箱)")?;
    if name.is_empty() {
        return Err(AppError::Config("未提供登录用户名".into()));
    }
    Ok(name)
}

pub fn resolve_password(cli_password: Option<&str>, config: &ExternalConfig) -> AppResult<String> {
    if let Some(password) = cli_password && !password.is_empty() {
        debug!("使用来自命令行参数的密码");
        return Ok(password.to_string());
    }
    if let Ok(password) = std::env::var(constants::PASSWORD_ENV_VAR) && !password.is_empty() {
        debug!("使用来自环境变量 {} 的密码", constants::PASSWORD_ENV_VAR);
        return Ok(password);
    }
    if let Some(password) = config.password.as_deref() && !password.is_empty() {
        debug!("使用来自配置文件的密码");
        return Ok(password.to_string());
    }
    debug!("未在任何位置找到密码，提示用户输入");
    let password = ui::ask_secret("请输入登录密码 (输入不可见，完成后按回车)")?;
    if password.is_empty() {
        return Err(AppError::Config("未提供登录密码".into()));
    }
    Ok(password)
}
