//! 结果写入服务 - 业务能力层
//!
//! 只负责"把结果记录写到文件"能力，不关心流程

use crate::error::{AppResult, FileError};
use crate::models::ResultsRecord;
use tracing::debug;

/// 结果写入服务
///
/// 职责：
/// - 将一次提交的结果记录以 JSON 写入文件
/// - 每次提交覆盖上一次的结果
pub struct ResultWriter {
    output_path: String,
}

impl ResultWriter {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            output_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.output_path
    }

    /// 写入结果记录
    pub async fn write(&self, results: &ResultsRecord) -> AppResult<()> {
        debug!(
            "写入结果: {} | 键: {:?}",
            self.output_path,
            results.keys()
        );

        let json = serde_json::to_string_pretty(results).map_err(|e| {
            FileError::WriteFailed {
                path: self.output_path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }
        })?;

        tokio::fs::write(&self.output_path, json)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.output_path.clone(),
                source,
            })?;

        Ok(())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::with_path("results.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuizPayload, TaskOutput};

    #[tokio::test]
    async fn test_write_results_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let writer = ResultWriter::with_path(path.to_string_lossy());

        let mut results = ResultsRecord::default();
        results.insert(TaskOutput::Summary("S".into()));
        results.insert(TaskOutput::Quiz(QuizPayload::Many(vec!["Q1".into()])));
        writer.write(&results).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"summarize": "S", "quiz": ["Q1"]}));
    }
}
