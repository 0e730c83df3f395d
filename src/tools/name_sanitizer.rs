//! 路徑名稱清理模組
//!
//! 把檔案系統不允許的字元換成底線，其他字元保持原樣

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static REGEX_ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex"));

/// 將 `< > : " / \ | ? *` 全部替換為 `_`
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    REGEX_ILLEGAL_CHARS.replace_all(name, "_").into_owned()
}

/// 保證不含非法字元、可直接作為路徑片段的名稱
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub fn new(raw: &str) -> Self {
        Self(sanitize_name(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
