//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理应用生命周期：读取配置、加载提交描述、创建后端客户端与流程、
//! 输出结果和统计信息。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (加载提交、输出结果)
//!     ↓
//! workflow::TaskFlow (一次提交的完整流程)
//!     ↓
//! clients::TaskBackend (后端接口)      services (测验格式化 / 渲染 / 写结果)
//! ```
//!
//! 本层只做调度和统计，不做具体业务判断。

pub mod app;

pub use app::App;
