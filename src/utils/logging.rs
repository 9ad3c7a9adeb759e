/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::SubmissionRequest;
use crate::workflow::SubmissionOutcome;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文档任务提交");
    info!("🌐 后端地址: {}", config.backend_base_url);
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("📋 失败策略: {:?}", config.failure_policy);
    info!("{}", "=".repeat(60));
}

/// 记录提交内容
pub fn log_submission_loaded(request: &SubmissionRequest) {
    for file in &request.files {
        info!("📄 文件: {} ({:.1} KB)", file.name, file.size_kb());
    }
    info!("✓ 勾选任务: {:?}", request.tasks.enabled());
    if !request.prompt.trim().is_empty() {
        info!("💬 问题: {}", truncate_text(request.prompt.trim(), 80));
    }
}

/// 打印最终统计信息
pub fn print_final_stats(outcome: &SubmissionOutcome, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 提交完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔑 会话: {}", outcome.session.session_id);
    info!("✅ 成功: {:?}", outcome.results.keys());
    info!("❌ 失败: {}", outcome.failures.len());
    for message in outcome.failure_messages() {
        info!("   - {}", message);
    }
    if !outcome.skipped.is_empty() {
        info!("⏭️ 跳过: {:?}", outcome.skipped);
    }
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
