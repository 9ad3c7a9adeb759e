//! 日志初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化 tracing 日志（`RUST_LOG` 优先）
pub fn init() {
    init_with_verbose(false);
}

/// `verbose` 为 true 时默认级别为 debug
pub fn init_with_verbose(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如多个测试）时忽略错误
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
