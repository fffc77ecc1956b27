// src/utils.rs

use crate::constants;
use regex::Regex;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::LazyLock,
};

static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());
static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 将 API 返回的标题转换为可安全用作文件/目录名的字符串。
///
/// 去掉开头的编号 (如 `1. `)，删除非法字符 `\:<>"/|?*`，合并空白。
pub fn sanitize(title: &str) -> String {
    let original = title.trim();
    if original.is_empty() {
        return "unknown".to_string();
    }

    let mut name = LEADING_NUMBER_RE.replace(original, "").into_owned();
    name = ILLEGAL_CHARS_RE.replace_all(&name, "").into_owned();
    name = WHITESPACE_RE.replace_all(&name, " ").trim().to_string();
    name = name.trim_end_matches('.').trim().to_string();
    if name.is_empty() {
        return "unnamed".to_string();
    }

    let stem = Path::new(&name)
        .file_stem()
        .unwrap_or_else(|| OsStr::new(&name))
        .to_string_lossy()
        .to_uppercase();
    let windows_reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    if windows_reserved.contains(&stem.as_ref()) {
        name = format!("_{}", name);
    }

    safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string()
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
    &s[..i]
}

/// `07 - Loops`，章节目录名与视频文件名共用的前缀格式
pub fn indexed_name(index: usize, title: &str) -> String {
    format!("{:02} - {}", index, sanitize(title))
}

/// 视频文件名只依赖 (index, title)，保证多次运行得到相同路径
pub fn video_filename(index: usize, title: &str) -> String {
    format!("{}.{}", indexed_name(index, title), constants::VIDEO_EXTENSION)
}

/// 与视频同名的字幕文件路径
pub fn subtitle_path(video_path: &Path) -> PathBuf {
    video_path.with_extension(constants::SUBTITLE_EXTENSION)
}

/// 毫秒 -> `HH:MM:SS,mmm`
pub fn format_timecode(total_ms: u64) -> String {
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

/// 按终端显示宽度截断文本，非 ASCII 字符按两列计算
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}
