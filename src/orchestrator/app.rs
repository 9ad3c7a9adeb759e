use crate::clients::HttpBackend;
use crate::config::Config;
use crate::models::{load_submission, SubmissionRequest};
use crate::services::{render_results, ResultWriter};
use crate::utils::logging::{log_startup, log_submission_loaded, print_final_stats};
use crate::workflow::{SubmissionOutcome, TaskFlow};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: Config,
    flow: TaskFlow<HttpBackend>,
    writer: ResultWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let backend = HttpBackend::new(&config).context("无法创建后端客户端")?;
        let flow = TaskFlow::new(backend, config.failure_policy);
        let writer = ResultWriter::with_path(config.output_file.clone());

        Ok(Self {
            config,
            flow,
            writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        info!("\n📁 正在加载提交描述: {}", self.config.submission_file);
        let request = load_submission(Path::new(&self.config.submission_file))
            .await
            .context("加载提交描述失败")?;

        let outcome = self.submit(&request).await?;

        println!("{}", render_results(&outcome.results));
        for message in outcome.failure_messages() {
            eprintln!("⚠️ {}", message);
        }

        print_final_stats(&outcome, self.writer.path());

        Ok(())
    }

    /// 执行一次提交并写出结果
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionOutcome> {
        log_submission_loaded(request);

        let outcome = self.flow.run(request).await.map_err(|e| {
            error!("❌ 提交失败: {}", e);
            e
        })?;

        self.writer
            .write(&outcome.results)
            .await
            .context("写入结果失败")?;

        Ok(outcome)
    }
}
