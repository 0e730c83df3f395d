//! 有聲書標籤讀取
//!
//! 從 MPEG-4 容器（.m4b）讀取作者、書名與年份

use anyhow::{Context, Result};
use std::path::Path;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_YEAR: &str = "Unknown Year";

/// 讀取後的標籤，皆已去除頭尾空白
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTags {
    pub author: String,
    pub title: String,
    pub year: String,
}

impl MediaTags {
    /// 缺少的標籤以預設值代替
    pub fn from_raw(author: Option<&str>, title: Option<&str>, year: Option<&str>) -> Self {
        Self {
            author: author.unwrap_or(UNKNOWN_AUTHOR).trim().to_string(),
            title: title.unwrap_or(UNKNOWN_TITLE).trim().to_string(),
            year: year.unwrap_or(UNKNOWN_YEAR).trim().to_string(),
        }
    }

    /// 三個欄位都不是空字串
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.author.is_empty() && !self.title.is_empty() && !self.year.is_empty()
    }
}

pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<MediaTags>;
}

/// 以 iTunes 樣式 atom（©ART、©nam、©day）讀取標籤
#[derive(Debug, Default, Clone, Copy)]
pub struct Mp4TagReader;

impl Mp4TagReader {
    pub const fn new() -> Self {
        Self
    }
}

impl TagReader for Mp4TagReader {
    fn read_tags(&self, path: &Path) -> Result<MediaTags> {
        let tag = mp4ameta::Tag::read_from_path(path)
            .with_context(|| format!("Error reading metadata from {}", path.display()))?;

        Ok(MediaTags::from_raw(tag.artist(), tag.title(), tag.year()))
    }
}
