// src/extractor/mod.rs

pub mod course;

pub use course::{CourseExtractor, build_course};
