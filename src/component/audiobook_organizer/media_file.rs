//! 有聲書檔案與整理目標路徑

use super::run_report::SkipReason;
use crate::tools::{MediaTags, SanitizedName, TagReader};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// 掃描到的有聲書檔案，標籤在需要時才讀取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    path: PathBuf,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 原始副檔名（保留大小寫，不含前導點）
    pub fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
    }

    pub fn read_tags(&self, reader: &impl TagReader) -> Result<MediaTags> {
        reader.read_tags(&self.path)
    }
}

/// 依標籤計算出的目的地：
/// `root/<author>/<year> - <title>/<year> - <author> - <title>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizedTarget {
    pub book_directory: PathBuf,
    pub file_path: PathBuf,
}

impl OrganizedTarget {
    pub fn from_tags(root: &Path, tags: &MediaTags, extension: &str) -> Result<Self, SkipReason> {
        if !tags.is_complete() {
            return Err(SkipReason::IncompleteTags);
        }

        let author = SanitizedName::new(&tags.author);
        let title = SanitizedName::new(&tags.title);
        let year = SanitizedName::new(&tags.year);

        // 作者名稱單獨成為一層目錄，不能是 "." 或 ".."
        if matches!(author.as_str(), "." | "..") {
            return Err(SkipReason::ReservedAuthorName {
                author: author.to_string(),
            });
        }

        let book_directory = root
            .join(author.as_str())
            .join(format!("{year} - {title}"));
        let file_path = book_directory.join(format!("{year} - {author} - {title}.{extension}"));

        Ok(Self {
            book_directory,
            file_path,
        })
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
