//! 上传表单状态
//!
//! 持有用户在表单上的全部输入（文件、问题、勾选的任务）以及最近一次的结果，
//! 展示层只读取这里的状态

use tracing::{info, warn};

use crate::clients::TaskBackend;
use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityAction, RecentActivityLog, ResultsRecord, SelectedFile, SubmissionRequest, TaskKind,
    TaskSelection,
};
use crate::workflow::task_flow::{SubmissionOutcome, TaskFlow};

#[derive(Debug, Default)]
pub struct UploadForm {
    files: Vec<SelectedFile>,
    prompt: String,
    quiz_count: Option<u32>,
    tasks: TaskSelection,
    outcome: Option<SubmissionOutcome>,
    notices: Vec<String>,
    activity: RecentActivityLog,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文件选择器给出新的文件列表（替换之前的选择）
    pub fn select_files(&mut self, files: Vec<SelectedFile>) {
        let action = if self.files.is_empty() {
            ActivityAction::Uploaded
        } else {
            ActivityAction::Replaced
        };
        for file in &files {
            if !file.is_accepted_type() {
                warn!("⚠️ 不建议的文件类型: {}", file.name);
            }
            self.activity.record(file.name.clone(), action);
        }
        self.files = files;
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_quiz_count(&mut self, count: Option<u32>) {
        self.quiz_count = count;
    }

    pub fn toggle_task(&mut self, task: TaskKind) -> bool {
        self.tasks.toggle(task)
    }

    pub fn set_task(&mut self, task: TaskKind, enabled: bool) {
        self.tasks.set(task, enabled);
    }

    pub fn tasks(&self) -> &TaskSelection {
        &self.tasks
    }

    pub fn activity(&self) -> &RecentActivityLog {
        &self.activity
    }

    /// 当前表单内容对应的提交
    pub fn request(&self) -> SubmissionRequest {
        SubmissionRequest {
            files: self.files.clone(),
            prompt: self.prompt.clone(),
            tasks: self.tasks,
            quiz_count: self.quiz_count,
        }
    }

    /// 最近一次提交的结果
    pub fn results(&self) -> Option<&ResultsRecord> {
        self.outcome.as_ref().map(|o| &o.results)
    }

    pub fn outcome(&self) -> Option<&SubmissionOutcome> {
        self.outcome.as_ref()
    }

    /// 需要提示给用户的消息（校验失败、任务失败等）
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// 清空表单（最近动态保留）
    pub fn clear(&mut self) {
        self.files.clear();
        self.prompt.clear();
        self.quiz_count = None;
        self.tasks = TaskSelection::default();
        self.outcome = None;
        self.notices.clear();
        info!("表单已清空");
    }

    /// 提交表单
    ///
    /// 结果只在流程结束后一次性写入；校验失败和忙碌时保留原有结果
    pub async fn submit<B: TaskBackend>(&mut self, flow: &TaskFlow<B>) -> AppResult<()> {
        self.notices.clear();

        match flow.run(&self.request()).await {
            Ok(outcome) => {
                self.notices = outcome.failure_messages();
                self.outcome = Some(outcome);
                Ok(())
            }
            Err(e) => {
                if matches!(e, AppError::Ingestion(_)) {
                    self.outcome = None;
                }
                self.notices.push(e.to_string());
                Err(e)
            }
        }
    }
}
