use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 走訪目錄時取得的項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    /// 相對於起始目錄的深度，直接子項目為 1
    pub depth: usize,
}

/// 遞迴掃描目錄下所有檔案與資料夾（不含起始目錄本身，不跟隨符號連結）
pub fn scan_tree(directory: &Path) -> Result<Vec<TreeEntry>> {
    let entries = WalkDir::new(directory)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| warn!("Skipping unreadable entry under {}: {e}", directory.display()))
                .ok()
        })
        .map(|entry| TreeEntry {
            is_dir: entry.file_type().is_dir(),
            depth: entry.depth(),
            path: entry.into_path(),
        })
        .collect();

    Ok(entries)
}
