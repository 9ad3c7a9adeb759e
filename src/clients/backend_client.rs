/// 文档处理后端客户端
///
/// 封装所有与后端 HTTP 接口相关的调用逻辑
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{QuizPayload, SelectedFile, VisualizationPayload};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// 上传并摘要的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResponse {
    pub session_id: String,
    pub summary: String,
}

/// 任务后端能力
///
/// 每个方法对应后端的一个接口，成功时返回已解码的内容
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// 上传文档并生成摘要，同时签发会话
    async fn summarize(&self, file: &SelectedFile) -> Result<IngestResponse, ApiError>;

    async fn explain(&self, session_id: &str, concept: &str) -> Result<String, ApiError>;

    async fn quiz(&self, session_id: &str, prompt: &str) -> Result<QuizPayload, ApiError>;

    async fn case_study(&self, session_id: &str) -> Result<String, ApiError>;

    async fn visualize(
        &self,
        session_id: &str,
        prompt: &str,
    ) -> Result<VisualizationPayload, ApiError>;
}

/// 基于 reqwest 的后端客户端
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    summarize_path: String,
    explain_path: String,
    quiz_path: String,
    case_study_path: String,
    visualize_path: String,
}

impl HttpBackend {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
            summarize_path: config.summarize_path.clone(),
            explain_path: config.explain_path.clone(),
            quiz_path: config.quiz_path.clone(),
            case_study_path: config.case_study_path.clone(),
            visualize_path: config.visualize_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发送 JSON 请求并返回校验过的响应体
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        debug!("POST {} Payload: {}", path, body);

        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(path, e))?;

        read_body(path, response).await
    }
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn summarize(&self, file: &SelectedFile) -> Result<IngestResponse, ApiError> {
        let endpoint = self.summarize_path.as_str();
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| ApiError::UploadRead {
                path: file.path.display().to_string(),
                source,
            })?;

        debug!("上传文件 {} ({} 字节)", file.name, bytes.len());

        let form = Form::new()
            .text("task", "summarize")
            .part("file", Part::bytes(bytes).file_name(file.name.clone()));

        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        let body = read_body(endpoint, response).await?;

        Ok(IngestResponse {
            session_id: take_text(endpoint, &body, "session_id")?,
            summary: take_text(endpoint, &body, "summary")?,
        })
    }

    async fn explain(&self, session_id: &str, concept: &str) -> Result<String, ApiError> {
        let body = self
            .post_json(
                &self.explain_path,
                &json!({ "session_id": session_id, "concept": concept }),
            )
            .await?;
        take_text(&self.explain_path, &body, "explanation")
    }

    async fn quiz(&self, session_id: &str, prompt: &str) -> Result<QuizPayload, ApiError> {
        let body = self
            .post_json(
                &self.quiz_path,
                &json!({ "session_id": session_id, "prompt": prompt }),
            )
            .await?;
        let quiz = take_field(&self.quiz_path, &body, "quiz")?;
        Ok(serde_json::from_value(quiz.clone()).unwrap_or(QuizPayload::Unrecognized(quiz)))
    }

    async fn case_study(&self, session_id: &str) -> Result<String, ApiError> {
        let body = self
            .post_json(
                &self.case_study_path,
                &json!({ "session_id": session_id, "prompt": "" }),
            )
            .await?;
        take_text(&self.case_study_path, &body, "caseStudy")
    }

    async fn visualize(
        &self,
        session_id: &str,
        prompt: &str,
    ) -> Result<VisualizationPayload, ApiError> {
        let body = self
            .post_json(
                &self.visualize_path,
                &json!({ "session_id": session_id, "prompt": prompt }),
            )
            .await?;
        let vis = take_field(&self.visualize_path, &body, "visualization")?;
        Ok(serde_json::from_value(vis.clone())
            .unwrap_or(VisualizationPayload::Unrecognized(vis)))
    }
}

// ========== 响应处理 ==========

/// 读取响应体：非 2xx 状态码与 `error` 字段一律视为失败
async fn read_body(endpoint: &str, response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::request_failed(endpoint, e))?;

    let parsed: Result<Value, _> = serde_json::from_str(&text);

    if let Ok(body) = &parsed {
        if let Some(message) = error_message(body) {
            return Err(ApiError::Backend {
                endpoint: endpoint.to_string(),
                message,
            });
        }
    }

    if !status.is_success() {
        return Err(ApiError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let body = parsed.map_err(|source| ApiError::JsonParseFailed {
        endpoint: endpoint.to_string(),
        source,
    })?;

    debug!("{} 响应: {}", endpoint, body);

    Ok(body)
}

/// 提取 `error` 字段（存在且非 null 时）
fn error_message(body: &Value) -> Option<String> {
    match body.get("error") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn take_field(endpoint: &str, body: &Value, field: &str) -> Result<Value, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(ApiError::MissingField {
            endpoint: endpoint.to_string(),
            field: field.to_string(),
        }),
        Some(value) => Ok(value.clone()),
    }
}

fn take_text(endpoint: &str, body: &Value, field: &str) -> Result<String, ApiError> {
    Ok(match take_field(endpoint, body, field)? {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(&json!({"error": "Session not found"})),
            Some("Session not found".to_string())
        );
        assert_eq!(error_message(&json!({"error": null, "summary": "S"})), None);
        assert_eq!(error_message(&json!({"summary": "S"})), None);
    }

    #[test]
    fn test_take_text() {
        let body = json!({"explanation": "E", "count": 3});
        assert_eq!(take_text("/x", &body, "explanation").unwrap(), "E");
        assert_eq!(take_text("/x", &body, "count").unwrap(), "3");
        assert!(matches!(
            take_text("/x", &body, "missing"),
            Err(ApiError::MissingField { .. })
        ));
    }
}
