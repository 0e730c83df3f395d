//! 有聲書整理核心流程
//!
//! 對根目錄下每個第一層子資料夾：
//! 1. 依標籤把目標檔案移到 `root/<author>/<year> - <title>/`
//! 2. （選用）刪除非目標副檔名的檔案
//! 3. 由深到淺刪除空資料夾，包含子資料夾本身

use super::media_file::{MediaFile, OrganizedTarget};
use super::run_report::{CleanupOutcome, FileOutcome, FolderReport, RunReport, SkipReason};
use crate::config::OrganizerConfig;
use crate::tools::{FileSystem, TagReader, validate_directory_exists};
use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct TreeOrganizer<F: FileSystem, R: TagReader> {
    config: OrganizerConfig,
    file_system: F,
    tag_reader: R,
    shutdown_signal: Arc<AtomicBool>,
}

impl<F: FileSystem, R: TagReader> TreeOrganizer<F, R> {
    pub fn new(
        config: OrganizerConfig,
        file_system: F,
        tag_reader: R,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            file_system,
            tag_reader,
            shutdown_signal,
        }
    }

    pub fn file_system(&self) -> &F {
        &self.file_system
    }

    /// 驗證根目錄並列出第一層子資料夾（忽略檔案），依名稱排序
    pub fn top_level_folders(&self) -> Result<Vec<PathBuf>> {
        validate_directory_exists(&self.file_system, &self.config.root)?;

        let mut folders: Vec<PathBuf> = self
            .file_system
            .list_dir(&self.config.root)?
            .into_iter()
            .filter(|path| self.file_system.is_dir(path))
            .collect();
        folders.sort();

        Ok(folders)
    }

    /// 完整執行一次整理；根目錄無效時不做任何變更直接回傳錯誤
    pub fn organize(&self) -> Result<RunReport> {
        let folders = self.top_level_folders()?;
        Ok(self.organize_folders(&folders, |_| {}))
    }

    /// 依序處理指定的資料夾，每處理完一個就呼叫 `on_folder`
    pub fn organize_folders(
        &self,
        folders: &[PathBuf],
        mut on_folder: impl FnMut(&FolderReport),
    ) -> RunReport {
        let mut report = RunReport::new(&self.config);
        let mut claimed_targets = HashSet::new();

        for folder in folders {
            if self.is_interrupted() {
                break;
            }
            let folder_report = self.organize_folder(folder, &mut claimed_targets);
            on_folder(&folder_report);
            report.folders.push(folder_report);
        }

        report.interrupted = self.is_interrupted();
        info!(
            "Run finished - moved: {}, planned: {}, skipped: {}, failed: {}, deleted: {}, removed dirs: {}",
            report.moved(),
            report.planned(),
            report.skipped(),
            report.failed(),
            report.deleted_files(),
            report.removed_directories()
        );
        report
    }

    /// `claimed_targets` 記錄本次執行已預定的目的地，預覽時同一目的地只算一次
    fn organize_folder(
        &self,
        folder: &Path,
        claimed_targets: &mut HashSet<PathBuf>,
    ) -> FolderReport {
        info!("Processing folder {}", folder.display());
        let mut report = FolderReport::new(folder);

        let media_files = match self.collect_media_files(folder) {
            Ok(files) => files,
            Err(e) => {
                warn!("Error scanning folder {}: {e:#}", folder.display());
                report.error = Some(format!("{e:#}"));
                return report;
            }
        };

        for media_file in &media_files {
            if self.is_interrupted() {
                warn!("Interrupted, leaving {} unfinished", folder.display());
                return report;
            }
            report
                .files
                .push(self.process_media_file(media_file, claimed_targets));
        }

        if self.config.remove_residual_files {
            self.remove_residual_files(folder, &mut report);
        }

        if !self.config.dry_run {
            self.prune_empty_directories(folder, &mut report);
        }

        report
    }

    fn is_interrupted(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }

    fn collect_media_files(&self, folder: &Path) -> Result<Vec<MediaFile>> {
        let mut files: Vec<MediaFile> = self
            .file_system
            .walk(folder)?
            .into_iter()
            .filter(|entry| !entry.is_dir && self.config.is_target_file(&entry.path))
            .map(|entry| MediaFile::new(entry.path))
            .collect();
        files.sort_by(|a, b| a.path().cmp(b.path()));

        debug!(
            "Found {} .{} files under {}",
            files.len(),
            self.config.target_extension,
            folder.display()
        );
        Ok(files)
    }

    fn process_media_file(
        &self,
        media_file: &MediaFile,
        claimed_targets: &mut HashSet<PathBuf>,
    ) -> FileOutcome {
        let source = media_file.path().to_path_buf();

        let tags = match media_file.read_tags(&self.tag_reader) {
            Ok(tags) => tags,
            Err(e) => {
                warn!("{e:#}");
                return FileOutcome::Failed {
                    source,
                    reason: format!("{e:#}"),
                };
            }
        };

        let target =
            match OrganizedTarget::from_tags(&self.config.root, &tags, media_file.extension()) {
                Ok(target) => target,
                Err(reason) => {
                    info!("Skipping {}: {reason:?}", source.display());
                    return FileOutcome::Skipped { source, reason };
                }
            };

        let already_there = self.file_system.is_dir(&target.book_directory)
            && self.file_system.exists(&target.file_path);
        if already_there || claimed_targets.contains(&target.file_path) {
            info!("Skipping already processed file: {}", target.file_name());
            return FileOutcome::Skipped {
                source,
                reason: SkipReason::AlreadyOrganized {
                    target: target.file_path,
                },
            };
        }

        if self.config.dry_run {
            claimed_targets.insert(target.file_path.clone());
            return FileOutcome::Planned {
                source,
                target: target.file_path,
            };
        }

        let moved = self
            .file_system
            .create_dir_all(&target.book_directory)
            .and_then(|()| self.file_system.rename(&source, &target.file_path));

        match moved {
            Ok(()) => {
                info!(
                    "Renamed and moved: {} -> {}",
                    source.display(),
                    target.file_path.display()
                );
                FileOutcome::Moved {
                    source,
                    target: target.file_path,
                }
            }
            Err(e) => {
                warn!("Error renaming file {}: {e:#}", source.display());
                FileOutcome::Failed {
                    source,
                    reason: format!("{e:#}"),
                }
            }
        }
    }

    /// 刪除非目標副檔名的所有檔案
    fn remove_residual_files(&self, folder: &Path, report: &mut FolderReport) {
        let entries = match self.file_system.walk(folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error scanning folder {}: {e:#}", folder.display());
                report.cleanup.push(CleanupOutcome::Failed {
                    path: folder.to_path_buf(),
                    reason: format!("{e:#}"),
                });
                return;
            }
        };

        let mut residual: Vec<PathBuf> = entries
            .into_iter()
            .filter(|entry| !entry.is_dir && !self.config.is_target_file(&entry.path))
            .map(|entry| entry.path)
            .collect();
        residual.sort();

        for path in residual {
            if self.config.dry_run {
                report.cleanup.push(CleanupOutcome::WouldDeleteFile(path));
                continue;
            }

            match self.file_system.remove_file(&path) {
                Ok(()) => {
                    info!("Deleted non-.{} file: {}", self.config.target_extension, path.display());
                    report.cleanup.push(CleanupOutcome::FileDeleted(path));
                }
                Err(e) => {
                    warn!("Error deleting file {}: {e:#}", path.display());
                    report.cleanup.push(CleanupOutcome::Failed {
                        path,
                        reason: format!("{e:#}"),
                    });
                }
            }
        }
    }

    /// 由深到淺刪除空資料夾，最後檢查子資料夾本身
    fn prune_empty_directories(&self, folder: &Path, report: &mut FolderReport) {
        let entries = match self.file_system.walk(folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error scanning folder {}: {e:#}", folder.display());
                report.cleanup.push(CleanupOutcome::Failed {
                    path: folder.to_path_buf(),
                    reason: format!("{e:#}"),
                });
                return;
            }
        };

        let mut directories: Vec<(usize, PathBuf)> = entries
            .into_iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| (entry.depth, entry.path))
            .collect();
        directories.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        for (_, directory) in directories {
            self.remove_if_empty(&directory, report);
        }
        self.remove_if_empty(folder, report);
    }

    fn remove_if_empty(&self, directory: &Path, report: &mut FolderReport) {
        match self.file_system.is_empty_dir(directory) {
            Ok(true) => match self.file_system.remove_dir(directory) {
                Ok(()) => {
                    info!("Deleted empty folder: {}", directory.display());
                    report
                        .cleanup
                        .push(CleanupOutcome::DirectoryRemoved(directory.to_path_buf()));
                }
                Err(e) => {
                    warn!("Error deleting folder {}: {e:#}", directory.display());
                    report.cleanup.push(CleanupOutcome::Failed {
                        path: directory.to_path_buf(),
                        reason: format!("{e:#}"),
                    });
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!("Error checking folder {}: {e:#}", directory.display());
                report.cleanup.push(CleanupOutcome::Failed {
                    path: directory.to_path_buf(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }
}
