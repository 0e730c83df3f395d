//! 檔案系統存取介面
//!
//! 整理流程只透過 [`FileSystem`] 操作磁碟，測試時可替換為記憶體實作

use super::file_scanner::{TreeEntry, scan_tree};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// 列出目錄的直接子項目
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// 遞迴列出所有子項目（不含起始目錄）
    fn walk(&self, path: &Path) -> Result<Vec<TreeEntry>>;

    fn is_empty_dir(&self, path: &Path) -> Result<bool>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// 移動檔案，目標路徑的上層目錄必須已存在
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// 刪除空目錄
    fn remove_dir(&self, path: &Path) -> Result<()>;
}

/// 直接操作本機磁碟的實作
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub const fn new() -> Self {
        Self
    }

    /// 複製檔案後刪除原檔案；原檔案刪不掉時移除複本，維持只有一份
    fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
        fs::copy(source, target).with_context(|| {
            format!(
                "Failed to copy {} -> {}",
                source.display(),
                target.display()
            )
        })?;

        if let Err(e) = fs::remove_file(source) {
            if let Err(cleanup) = fs::remove_file(target) {
                warn!("Failed to remove copy {}: {cleanup}", target.display());
            }
            return Err(e)
                .with_context(|| format!("Failed to remove original {}", source.display()));
        }

        Ok(())
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(path)
            .with_context(|| format!("Failed to list {}", path.display()))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to list {}", path.display()))?;
            children.push(entry.path());
        }
        Ok(children)
    }

    fn walk(&self, path: &Path) -> Result<Vec<TreeEntry>> {
        scan_tree(path)
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool> {
        let mut entries = fs::read_dir(path)
            .with_context(|| format!("Failed to list {}", path.display()))?;
        Ok(entries.next().is_none())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            // rename 無法跨檔案系統，改用複製後刪除
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(
                    "rename {} -> {} crosses devices, falling back to copy",
                    from.display(),
                    to.display()
                );
                Self::copy_and_delete(from, to)
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to move {} -> {}", from.display(), to.display())
            }),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path)
            .with_context(|| format!("Failed to remove directory {}", path.display()))
    }
}
