// src/downloader/provision.rs

use crate::{
    error::*,
    models::{Chapter, Course},
    utils,
};
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn course_dir(base_dir: &Path, course: &Course) -> PathBuf {
    base_dir.join(utils::sanitize(&course.name))
}

/// `{base}/{课程名}/{章节序号:02} - {章节名}`
pub fn chapter_dir(base_dir: &Path, course: &Course, chapter: &Chapter) -> PathBuf {
    course_dir(base_dir, course).join(utils::indexed_name(chapter.index, &chapter.name))
}

/// 在任何下载开始前创建课程的全部章节目录，已存在的目录直接跳过
pub fn provision_chapter_dirs(base_dir: &Path, course: &Course) -> AppResult<Vec<PathBuf>> {
    course
        .chapters
        .iter()
        .map(|chapter| {
            let dir = chapter_dir(base_dir, course, chapter);
            if !dir.is_dir() {
                debug!("创建章节目录: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
            Ok(dir)
        })
        .collect()
}
