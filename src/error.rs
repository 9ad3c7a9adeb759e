use thiserror::Error;

use crate::models::task::TaskKind;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 提交前校验失败（不会发起任何网络请求）
    #[error("校验失败: {0}")]
    Validation(#[from] ValidationError),
    /// 上传并摘要（第一步）失败，整个提交作废
    #[error("文档上传失败: {0}")]
    Ingestion(#[source] ApiError),
    /// 后续某个任务失败
    #[error("{0}")]
    Task(#[from] TaskError),
    /// 已有一次提交正在进行
    #[error("已有提交正在处理中，请稍候")]
    Busy,
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

/// 提交前置条件错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 没有选择文件
    #[error("请至少上传一个文档 (no file)")]
    NoFile,
    /// 没有选择任务
    #[error("请至少选择一个任务 (no task)")]
    NoTask,
    /// 启用了 explain 但没有填写问题
    #[error("Explain 任务需要填写问题或概念 (missing prompt)")]
    MissingPrompt,
    /// 题目数量超出范围
    #[error("题目数量必须在 1 到 {max} 之间，当前为 {count}")]
    InvalidQuizCount { count: u32, max: u32 },
}

/// 后端调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接、超时等）
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 状态码
    #[error("后端返回状态码 {status} ({endpoint})")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应体中带有 `error` 字段
    #[error("后端返回错误 ({endpoint}): {message}")]
    Backend { endpoint: String, message: String },
    /// 响应体缺少预期字段
    #[error("响应缺少字段 `{field}` ({endpoint})")]
    MissingField { endpoint: String, field: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 读取待上传文件失败
    #[error("无法读取上传文件 {path}: {source}")]
    UploadRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 测试或替代后端使用的通用错误
    #[error("{0}")]
    Other(String),
}

/// 单个任务失败（保留失败的任务名）
#[derive(Debug, Error)]
#[error("任务 {task} 失败: {source}")]
pub struct TaskError {
    pub task: TaskKind,
    #[source]
    pub source: ApiError,
}

impl TaskError {
    pub fn new(task: TaskKind, source: ApiError) -> Self {
        Self { task, source }
    }

    /// 面向用户的提示信息
    pub fn user_message(&self) -> String {
        format!("Failed to generate {}: {}", self.task.label(), self.source)
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 账号相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// 密码强度不足
    #[error("密码至少 8 位，并包含一个大写字母和一个特殊字符")]
    WeakPassword,
    /// 两次输入的密码不一致
    #[error("两次输入的密码不一致")]
    PasswordMismatch,
    /// 用户已存在
    #[error("用户已存在")]
    UserExists,
    /// 用户不存在或密码错误
    #[error("邮箱或密码错误")]
    InvalidCredentials,
    /// 邮箱为空
    #[error("邮箱不能为空")]
    EmptyEmail,
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 是否为超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::RequestFailed { source, .. } if source.is_timeout())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
