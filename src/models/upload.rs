use std::path::{Path, PathBuf};

use phf::phf_set;
use serde::Deserialize;

/// 建议上传的文件类型（仅提示，不强制）
static ACCEPTED_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt",
    "jpg", "jpeg", "png", "gif", "webp",
};

/// 文件选择器给出的一个文件
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PathBuf")]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    /// 文件大小（字节），未知时为 0
    pub size: u64,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self { path, name, size }
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn is_accepted_type(&self) -> bool {
        self.extension()
            .map(|ext| ACCEPTED_EXTENSIONS.contains(ext.as_str()))
            .unwrap_or(false)
    }

    /// 大小（KB），用于展示
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

impl From<PathBuf> for SelectedFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}
