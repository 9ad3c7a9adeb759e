use serde::Deserialize;

use crate::models::task::TaskSelection;
use crate::models::upload::SelectedFile;

/// 测验题目数量上限（与表单一致）
pub const MAX_QUIZ_COUNT: u32 = 20;

/// 一次提交的全部输入
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub files: Vec<SelectedFile>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub tasks: TaskSelection,
    /// 测验题目数量（可选）
    #[serde(default)]
    pub quiz_count: Option<u32>,
}

impl SubmissionRequest {
    pub fn new(files: Vec<SelectedFile>, prompt: impl Into<String>, tasks: TaskSelection) -> Self {
        Self {
            files,
            prompt: prompt.into(),
            tasks,
            quiz_count: None,
        }
    }

    pub fn with_quiz_count(mut self, count: u32) -> Self {
        self.quiz_count = Some(count);
        self
    }

    /// 真正上传的文件（只取第一个）
    pub fn primary_file(&self) -> Option<&SelectedFile> {
        self.files.first()
    }

    /// 发送给测验接口的 prompt
    ///
    /// 后端从 prompt 中识别 "N questions"，所以设置了题目数量时追加到末尾
    pub fn quiz_prompt(&self) -> String {
        match self.quiz_count {
            Some(count) if self.prompt.trim().is_empty() => format!("{} questions", count),
            Some(count) => format!("{} ({} questions)", self.prompt.trim(), count),
            None => self.prompt.clone(),
        }
    }
}
