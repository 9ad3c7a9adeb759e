use crate::workflow::FailurePolicy;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端服务地址
    pub backend_base_url: String,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    /// 提交描述文件（TOML）
    pub submission_file: String,
    /// 结果输出文件（JSON）
    pub output_file: String,
    /// 任务失败后的处理策略
    pub failure_policy: FailurePolicy,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 后端路径 ---
    pub summarize_path: String,
    pub explain_path: String,
    pub quiz_path: String,
    pub case_study_path: String,
    pub visualize_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 300,
            submission_file: "submission.toml".to_string(),
            output_file: "results.json".to_string(),
            failure_policy: FailurePolicy::AbortRemaining,
            verbose_logging: false,
            summarize_path: "/summarize_pdf/".to_string(),
            explain_path: "/explain_concept/".to_string(),
            quiz_path: "/generate_quiz/".to_string(),
            case_study_path: "/generate_case_study/".to_string(),
            visualize_path: "/generate_visualization/".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            backend_base_url: std::env::var("BACKEND_BASE_URL").unwrap_or(default.backend_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            submission_file: std::env::var("SUBMISSION_FILE").unwrap_or(default.submission_file),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            failure_policy: std::env::var("FAILURE_POLICY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.failure_policy),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            summarize_path: std::env::var("SUMMARIZE_PATH").unwrap_or(default.summarize_path),
            explain_path: std::env::var("EXPLAIN_PATH").unwrap_or(default.explain_path),
            quiz_path: std::env::var("QUIZ_PATH").unwrap_or(default.quiz_path),
            case_study_path: std::env::var("CASE_STUDY_PATH").unwrap_or(default.case_study_path),
            visualize_path: std::env::var("VISUALIZE_PATH").unwrap_or(default.visualize_path),
        }
    }

    /// 指向给定后端地址的配置（其余保持默认）
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            backend_base_url: base_url.into(),
            ..Self::default()
        }
    }
}
