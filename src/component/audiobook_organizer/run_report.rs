//! 整理結果紀錄
//!
//! 每個檔案與每項清理動作都記錄為一筆結果，最後彙整成 [`RunReport`]

use crate::config::OrganizerConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 檔案未被移動的原因（非錯誤）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// 目的地資料夾與檔案都已存在
    AlreadyOrganized { target: PathBuf },
    /// 作者、書名或年份為空
    IncompleteTags,
    /// 作者名稱無法作為目錄名稱
    ReservedAuthorName { author: String },
}

/// 單一有聲書檔案的處理結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Moved { source: PathBuf, target: PathBuf },
    /// 預覽模式下預計的移動
    Planned { source: PathBuf, target: PathBuf },
    Skipped { source: PathBuf, reason: SkipReason },
    Failed { source: PathBuf, reason: String },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            Self::Moved { source, .. }
            | Self::Planned { source, .. }
            | Self::Skipped { source, .. }
            | Self::Failed { source, .. } => source,
        }
    }
}

/// 清理階段的結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum CleanupOutcome {
    FileDeleted(PathBuf),
    /// 預覽模式下預計刪除的檔案
    WouldDeleteFile(PathBuf),
    DirectoryRemoved(PathBuf),
    Failed { path: PathBuf, reason: String },
}

/// 一個第一層子資料夾的處理結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderReport {
    pub folder: PathBuf,
    pub files: Vec<FileOutcome>,
    pub cleanup: Vec<CleanupOutcome>,
    /// 無法掃描此資料夾時的錯誤
    pub error: Option<String>,
}

impl FolderReport {
    pub fn new(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn moved(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Moved { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Planned { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count_files(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn deleted_files(&self) -> usize {
        self.count_cleanup(|o| {
            matches!(
                o,
                CleanupOutcome::FileDeleted(_) | CleanupOutcome::WouldDeleteFile(_)
            )
        })
    }

    pub fn removed_directories(&self) -> usize {
        self.count_cleanup(|o| matches!(o, CleanupOutcome::DirectoryRemoved(_)))
    }

    pub fn cleanup_failures(&self) -> usize {
        self.count_cleanup(|o| matches!(o, CleanupOutcome::Failed { .. }))
    }

    fn count_files(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|o| predicate(o)).count()
    }

    fn count_cleanup(&self, predicate: impl Fn(&CleanupOutcome) -> bool) -> usize {
        self.cleanup.iter().filter(|o| predicate(o)).count()
    }
}

/// 整次執行的結果
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub folders: Vec<FolderReport>,
    /// 因 Ctrl-C 提前結束
    pub interrupted: bool,
}

impl RunReport {
    pub fn new(config: &OrganizerConfig) -> Self {
        Self {
            root: config.root.clone(),
            dry_run: config.dry_run,
            folders: Vec::new(),
            interrupted: false,
        }
    }

    pub fn moved(&self) -> usize {
        self.folders.iter().map(FolderReport::moved).sum()
    }

    pub fn planned(&self) -> usize {
        self.folders.iter().map(FolderReport::planned).sum()
    }

    pub fn skipped(&self) -> usize {
        self.folders.iter().map(FolderReport::skipped).sum()
    }

    pub fn failed(&self) -> usize {
        self.folders.iter().map(FolderReport::failed).sum()
    }

    pub fn deleted_files(&self) -> usize {
        self.folders.iter().map(FolderReport::deleted_files).sum()
    }

    pub fn removed_directories(&self) -> usize {
        self.folders.iter().map(FolderReport::removed_directories).sum()
    }

    pub fn cleanup_failures(&self) -> usize {
        self.folders.iter().map(FolderReport::cleanup_failures).sum()
    }

    /// 是否有任何錯誤（檔案、清理或資料夾掃描）
    pub fn has_errors(&self) -> bool {
        self.folders
            .iter()
            .any(|f| f.error.is_some() || f.failed() > 0 || f.cleanup_failures() > 0)
    }

    pub fn all_file_outcomes(&self) -> impl Iterator<Item = &FileOutcome> {
        self.folders.iter().flat_map(|f| f.files.iter())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run report")
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write run report to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_folder() -> FolderReport {
        let mut folder = FolderReport::new(Path::new("/root/incoming"));
        folder.files = vec![
            FileOutcome::Moved {
                source: PathBuf::from("/root/incoming/a.m4b"),
                target: PathBuf::from("/root/A/2020 - B/2020 - A - B.m4b"),
            },
            FileOutcome::Skipped {
                source: PathBuf::from("/root/incoming/b.m4b"),
                reason: SkipReason::IncompleteTags,
            },
            FileOutcome::Failed {
                source: PathBuf::from("/root/incoming/c.m4b"),
                reason: "corrupt".to_string(),
            },
        ];
        folder.cleanup = vec![
            CleanupOutcome::FileDeleted(PathBuf::from("/root/incoming/cover.jpg")),
            CleanupOutcome::DirectoryRemoved(PathBuf::from("/root/incoming/cd1")),
        ];
        folder
    }

    #[test]
    fn test_counts() {
        let mut report = RunReport::new(&OrganizerConfig::new("/root"));
        report.folders.push(sample_folder());
        report.folders.push(sample_folder());

        assert_eq!(report.moved(), 2);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.planned(), 0);
        assert_eq!(report.deleted_files(), 2);
        assert_eq!(report.removed_directories(), 2);
        assert_eq!(report.cleanup_failures(), 0);
        assert!(report.has_errors());
        assert_eq!(report.all_file_outcomes().count(), 6);
    }

    #[test]
    fn test_empty_report_has_no_errors() {
        let report = RunReport::new(&OrganizerConfig::new("/root"));
        assert!(!report.has_errors());
        assert_eq!(report.moved(), 0);
    }

    #[test]
    fn test_json_export() {
        let temp_dir = TempDir::new().unwrap();
        let mut report = RunReport::new(&OrganizerConfig::new("/root"));
        report.folders.push(sample_folder());

        let path = temp_dir.path().join("report.json");
        report.save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["root"], "/root");
        assert_eq!(value["folders"][0]["files"][0]["outcome"], "moved");
        assert_eq!(value["folders"][0]["files"][1]["reason"]["kind"], "incomplete_tags");
        assert_eq!(value["folders"][0]["cleanup"][0]["outcome"], "file_deleted");
    }
}
