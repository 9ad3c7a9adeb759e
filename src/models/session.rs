/// 上传会话
///
/// 由后端在上传并摘要成功后签发，仅在一次提交过程中保存在内存中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    /// 后端签发的不透明会话标识
    pub session_id: String,
    /// 上传的文件名
    pub file_name: String,
}

impl UploadSession {
    pub fn new(session_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            file_name: file_name.into(),
        }
    }
}

impl std::fmt::Display for UploadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[会话 {} 文件 {}]", self.session_id, self.file_name)
    }
}
