use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use rag_assistant::clients::IngestResponse;
use rag_assistant::error::{ApiError, AppError};
use rag_assistant::models::{
    QuizPayload, SelectedFile, SubmissionRequest, TaskKind, TaskSelection, VisualizationPayload,
};
use rag_assistant::workflow::{BusyFlag, Settlement};
use rag_assistant::{FailurePolicy, TaskBackend, TaskFlow};
use serde_json::Value;
use tokio::sync::Notify;

/// 记录调用并在调用期间观察忙碌标志的后端
#[derive(Default)]
struct ScriptedBackend {
    busy: OnceLock<BusyFlag>,
    calls: Mutex<Vec<(&'static str, bool)>>,
    fail_ingest: bool,
    fail_quiz: bool,
    panic_on_explain: bool,
    gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    fn observe(&self, call: &'static str) {
        let busy = self.busy.get().map(|b| b.is_busy()).unwrap_or(false);
        self.calls.lock().unwrap().push((call, busy));
    }

    fn calls(&self) -> Vec<(&'static str, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskBackend for ScriptedBackend {
    async fn summarize(&self, _file: &SelectedFile) -> Result<IngestResponse, ApiError> {
        self.observe("summarize");
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_ingest {
            return Err(ApiError::Other("connection refused".to_string()));
        }
        Ok(IngestResponse {
            session_id: "abc".to_string(),
            summary: "S".to_string(),
        })
    }

    async fn explain(&self, _session_id: &str, _concept: &str) -> Result<String, ApiError> {
        self.observe("explain");
        if self.panic_on_explain {
            panic!("backend exploded");
        }
        Ok("E".to_string())
    }

    async fn quiz(&self, _session_id: &str, _prompt: &str) -> Result<QuizPayload, ApiError> {
        self.observe("quiz");
        if self.fail_quiz {
            return Err(ApiError::Other("quiz unavailable".to_string()));
        }
        Ok(QuizPayload::Many(vec!["Q1".to_string()]))
    }

    async fn case_study(&self, _session_id: &str) -> Result<String, ApiError> {
        self.observe("case_study");
        Ok("C".to_string())
    }

    async fn visualize(
        &self,
        _session_id: &str,
        _prompt: &str,
    ) -> Result<VisualizationPayload, ApiError> {
        self.observe("visualize");
        Ok(VisualizationPayload::Unrecognized(Value::Null))
    }
}

fn flow_with(backend: ScriptedBackend, policy: FailurePolicy) -> TaskFlow<ScriptedBackend> {
    let flow = TaskFlow::new(backend, policy);
    let _ = flow.backend().busy.set(flow.busy_flag());
    flow
}

fn request(tasks: &[TaskKind], prompt: &str) -> SubmissionRequest {
    SubmissionRequest::new(
        vec![SelectedFile::new("notes.pdf")],
        prompt,
        TaskSelection::of(tasks),
    )
}

#[tokio::test]
async fn busy_during_every_call_and_cleared_after() {
    let flow = flow_with(ScriptedBackend::default(), FailurePolicy::AbortRemaining);
    assert!(!flow.is_busy());

    let outcome = flow
        .run(&request(TaskKind::ALL.as_slice(), "entropy"))
        .await
        .unwrap();

    let calls = flow.backend().calls();
    assert_eq!(
        calls.iter().map(|(c, _)| *c).collect::<Vec<_>>(),
        vec!["summarize", "explain", "quiz", "case_study", "visualize"]
    );
    assert!(calls.iter().all(|(_, busy)| *busy));
    assert!(!flow.is_busy());
    assert_eq!(outcome.settlement, Settlement::Success);
    assert_eq!(outcome.skipped, vec![TaskKind::Podcast]);
}

#[tokio::test]
async fn busy_cleared_after_ingestion_failure() {
    let backend = ScriptedBackend {
        fail_ingest: true,
        ..Default::default()
    };
    let flow = flow_with(backend, FailurePolicy::AbortRemaining);

    let err = flow
        .run(&request(&[TaskKind::Quiz], ""))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Ingestion(_)));
    assert_eq!(flow.backend().calls(), vec![("summarize", true)]);
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn busy_cleared_after_task_failure() {
    let backend = ScriptedBackend {
        fail_quiz: true,
        ..Default::default()
    };
    let flow = flow_with(backend, FailurePolicy::AbortRemaining);

    let outcome = flow
        .run(&request(&[TaskKind::Quiz, TaskKind::Visualize], "cells"))
        .await
        .unwrap();

    assert_eq!(outcome.settlement, Settlement::Partial);
    assert!(outcome.results.is_empty());
    assert_eq!(flow.backend().calls().len(), 2);
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn busy_cleared_after_backend_panic() {
    let backend = ScriptedBackend {
        panic_on_explain: true,
        ..Default::default()
    };
    let flow = Arc::new(flow_with(backend, FailurePolicy::AbortRemaining));

    let task_flow = flow.clone();
    let handle = tokio::spawn(async move {
        let _ = task_flow.run(&request(&[TaskKind::Explain], "entropy")).await;
    });

    assert!(handle.await.unwrap_err().is_panic());
    assert!(!flow.is_busy());
}

#[tokio::test]
async fn second_submission_rejected_while_busy() {
    let gate = Arc::new(Notify::new());
    let backend = ScriptedBackend {
        gate: Some(gate.clone()),
        ..Default::default()
    };
    let flow = flow_with(backend, FailurePolicy::AbortRemaining);
    let req = request(&[TaskKind::Summarize], "");

    let (first, second) = tokio::join!(flow.run(&req), async {
        while !flow.is_busy() {
            tokio::task::yield_now().await;
        }
        let second = flow.run(&req).await;
        gate.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Busy)));
    assert_eq!(flow.backend().calls().len(), 1);
    assert!(!flow.is_busy());
}
