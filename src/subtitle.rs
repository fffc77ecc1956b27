// src/subtitle.rs

use crate::{models::api::TranscriptLine, utils::format_timecode};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    pub sequence_number: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub caption: String,
}

/// 每条字幕的结束时间取下一条的开始时间，最后一条取视频总时长。
///
/// 字幕文本原样保留，只去掉末尾换行；末尾换行会在 SRT 块之间产生多余空行。
pub fn build_cues(lines: &[TranscriptLine], total_duration_ms: u64) -> Vec<SubtitleCue> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let end_ms = lines
                .get(i + 1)
                .map_or(total_duration_ms, |next| next.transcript_start_at);
            SubtitleCue {
                sequence_number: i + 1,
                start_ms: line.transcript_start_at,
                end_ms: end_ms.max(line.transcript_start_at),
                caption: line.caption.trim_end_matches(['\r', '\n']).to_string(),
            }
        })
        .collect()
}

/// 序列化为 SRT 文本
pub fn render_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            cue.sequence_number,
            format_timecode(cue.start_ms),
            format_timecode(cue.end_ms),
            cue.caption
        );
    }
    out
}
