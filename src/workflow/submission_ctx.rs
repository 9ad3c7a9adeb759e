//! 提交上下文
//!
//! 封装"这是第几次提交、上传的是哪个文件"这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 本进程内的提交序号（从1开始）
    pub submission_no: u64,

    /// 上传的文件名
    pub file_name: String,
}

impl SubmissionCtx {
    pub fn new(submission_no: u64, file_name: impl Into<String>) -> Self {
        Self {
            submission_no,
            file_name: file_name.into(),
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[提交 #{} 文件 {}]", self.submission_no, self.file_name)
    }
}
