use std::path::{Path, PathBuf};

/// 預設處理的有聲書容器副檔名（不含前導點）
pub const DEFAULT_TARGET_EXTENSION: &str = "m4b";

/// 整理流程的設定，由互動介面或測試注入
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// 要整理的根目錄
    pub root: PathBuf,
    /// 目標副檔名，比對時不分大小寫
    pub target_extension: String,
    /// 只預覽，不更動任何檔案
    pub dry_run: bool,
    /// 是否刪除子資料夾中非目標副檔名的檔案（封面、附屬檔案等）
    pub remove_residual_files: bool,
}

impl OrganizerConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            dry_run: false,
            remove_residual_files: false,
        }
    }

    #[must_use]
    pub fn with_target_extension(mut self, extension: &str) -> Self {
        self.target_extension = extension.trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_residual_cleanup(mut self, enabled: bool) -> Self {
        self.remove_residual_files = enabled;
        self
    }

    #[must_use]
    pub fn is_target_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.target_extension))
    }
}
