//! 有聲書整理元件
//!
//! 依 .m4b 內嵌的作者、書名、年份重新命名並搬移檔案，
//! 之後清理殘留檔案與空資料夾

mod main;
mod media_file;
mod run_report;
mod tree_organizer;

pub use main::AudiobookOrganizer;
pub use media_file::{MediaFile, OrganizedTarget};
pub use run_report::{CleanupOutcome, FileOutcome, FolderReport, RunReport, SkipReason};
pub use tree_organizer::TreeOrganizer;
