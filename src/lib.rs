//! # RAG Assistant
//!
//! 文档上传与任务提交客户端：上传一个文档，选择若干任务
//! （摘要、解释、测验、案例、可视化、播客），依次调用远程后端并汇总结果
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只暴露后端能力，不关心流程
//! - `TaskBackend` - 每个后端接口一个方法，`HttpBackend` 为 reqwest 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `quiz_formatter` - 测验文本整理
//! - `result_renderer` - 结果渲染
//! - `ResultWriter` - 写结果文件
//! - `AccountService` - 基于注入存储的注册 / 登录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次提交"的完整处理流程
//! - `TaskFlow` - 校验 → 上传 → 后续任务 → 交付结果
//! - `UploadForm` - 表单状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 应用生命周期、输出统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{HttpBackend, TaskBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ResultsRecord, SubmissionRequest, TaskKind, TaskSelection};
pub use orchestrator::App;
pub use workflow::{FailurePolicy, SubmissionOutcome, TaskFlow, UploadForm};
