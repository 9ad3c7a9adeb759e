//! 任务处理流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验（文件 / 任务 / prompt），失败时不发起任何请求
//! 2. 上传并摘要，拿到 session_id（无论是否勾选摘要都必须执行，且只执行一次）
//! 3. 按固定顺序执行后续任务：explain → quiz → case study → visualize → podcast
//! 4. 一次性交付结果记录
//!
//! 状态机：`Idle → Validating → Ingesting → RunningTasks → Settled`

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::clients::TaskBackend;
use crate::error::{ApiError, AppError, AppResult, TaskError, ValidationError};
use crate::models::{
    ResultsRecord, SubmissionRequest, TaskKind, TaskOutput, UploadSession, MAX_QUIZ_COUNT,
};
use crate::utils::logging::truncate_text;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 某个任务失败后的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// 第一个失败的任务之后不再执行剩余任务
    #[default]
    AbortRemaining,
    /// 每个任务独立执行，各自记录成功或失败
    Independent,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort_remaining" => Ok(FailurePolicy::AbortRemaining),
            "independent" => Ok(FailurePolicy::Independent),
            other => Err(format!("未知的失败策略: {}", other)),
        }
    }
}

/// 提交结束时的结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// 所有任务成功
    Success,
    /// 上传成功，但有任务失败
    Partial,
    /// 上传失败，没有结果
    Fatal,
}

/// 流程状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Validating,
    Ingesting,
    RunningTasks { index: usize, task: TaskKind },
    Settled(Settlement),
}

/// 一次提交的结果
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub session: UploadSession,
    pub results: ResultsRecord,
    pub settlement: Settlement,
    /// 失败的任务（按执行顺序）
    pub failures: Vec<TaskError>,
    /// 没有后端接口、被跳过的任务
    pub skipped: Vec<TaskKind>,
}

impl SubmissionOutcome {
    /// 面向用户的失败提示
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.user_message()).collect()
    }
}

/// 忙碌标志
///
/// 整个提交期间为 true，流程以任何方式结束（包括 panic）后都会恢复为 false
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 提交前校验
pub fn validate(request: &SubmissionRequest) -> Result<(), ValidationError> {
    if request.files.is_empty() {
        return Err(ValidationError::NoFile);
    }
    if !request.tasks.any() {
        return Err(ValidationError::NoTask);
    }
    let needs_prompt = request.tasks.enabled().iter().any(|t| t.requires_prompt());
    if needs_prompt && request.prompt.trim().is_empty() {
        return Err(ValidationError::MissingPrompt);
    }
    if let Some(count) = request.quiz_count {
        if request.tasks.is_enabled(TaskKind::Quiz) && !(1..=MAX_QUIZ_COUNT).contains(&count) {
            return Err(ValidationError::InvalidQuizCount {
                count,
                max: MAX_QUIZ_COUNT,
            });
        }
    }
    Ok(())
}

/// 任务处理流程
///
/// - 编排一次提交的全部后端调用（顺序执行，不重试）
/// - 在调用之间传递 session_id
/// - 持有后端能力，不关心 HTTP 细节
pub struct TaskFlow<B: TaskBackend> {
    backend: B,
    policy: FailurePolicy,
    busy: BusyFlag,
    state: watch::Sender<FlowState>,
    submissions: AtomicU64,
}

impl<B: TaskBackend> TaskFlow<B> {
    /// 创建新的任务处理流程
    pub fn new(backend: B, policy: FailurePolicy) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            backend,
            policy,
            busy: BusyFlag::default(),
            state,
            submissions: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 忙碌标志的句柄（可交给展示层）
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    fn set_state(&self, state: FlowState) {
        debug!("流程状态: {:?}", state);
        self.state.send_replace(state);
    }

    /// 执行一次提交
    ///
    /// 校验失败、正在忙碌、上传失败时返回错误；
    /// 上传成功后总是返回结果（可能只包含部分任务）
    pub async fn run(&self, request: &SubmissionRequest) -> AppResult<SubmissionOutcome> {
        let _guard = self.busy.try_acquire().ok_or_else(|| {
            warn!("⚠️ 上一次提交尚未完成，忽略本次提交");
            AppError::Busy
        })?;

        self.set_state(FlowState::Validating);
        if let Err(e) = validate(request) {
            warn!("⚠️ {}", e);
            self.set_state(FlowState::Idle);
            return Err(e.into());
        }

        let file = match request.primary_file() {
            Some(file) => file,
            None => return Err(ValidationError::NoFile.into()),
        };
        let ctx = SubmissionCtx::new(
            self.submissions.fetch_add(1, Ordering::Relaxed) + 1,
            file.name.clone(),
        );

        if request.files.len() > 1 {
            info!(
                "{} 只上传第一个文件，忽略其余 {} 个",
                ctx,
                request.files.len() - 1
            );
        }
        if !file.is_accepted_type() {
            warn!("{} ⚠️ 文件类型不在建议列表中，仍然尝试上传", ctx);
        }

        // ========== 步骤 1: 上传并摘要 ==========
        self.set_state(FlowState::Ingesting);
        info!("{} 📤 正在上传文档并生成摘要...", ctx);

        let ingest = match self.backend.summarize(file).await {
            Ok(ingest) => ingest,
            Err(e) => {
                error!("{} ❌ 文档上传失败: {}", ctx, e);
                self.set_state(FlowState::Settled(Settlement::Fatal));
                return Err(AppError::Ingestion(e));
            }
        };

        let session = UploadSession::new(ingest.session_id, file.name.clone());
        info!("{} ✓ 上传成功 {}", ctx, session);

        let mut results = ResultsRecord::default();
        if request.tasks.is_enabled(TaskKind::Summarize) {
            info!("{} 摘要: {}", ctx, truncate_text(&ingest.summary, 80));
            results.insert(TaskOutput::Summary(ingest.summary));
        } else {
            debug!("{} 未勾选摘要，丢弃摘要内容", ctx);
        }

        // ========== 步骤 2: 后续任务 ==========
        let mut failures = Vec::new();
        let mut skipped = Vec::new();

        for (index, task) in request.tasks.follow_ups().enumerate() {
            self.set_state(FlowState::RunningTasks { index, task });

            if task == TaskKind::Podcast {
                warn!("{} ⚠️ 后端没有播客接口，跳过 {}", ctx, task);
                skipped.push(task);
                continue;
            }

            info!("{} 🔄 正在执行任务 {}...", ctx, task);
            match self.run_task(task, &session, request).await {
                Ok(output) => {
                    info!("{} ✓ 任务 {} 完成", ctx, task);
                    results.insert(output);
                }
                Err(e) => {
                    let failure = TaskError::new(task, e);
                    error!("{} ❌ {}", ctx, failure.user_message());
                    failures.push(failure);

                    if self.policy == FailurePolicy::AbortRemaining {
                        warn!("{} 停止执行剩余任务", ctx);
                        break;
                    }
                }
            }
        }

        let settlement = if failures.is_empty() {
            Settlement::Success
        } else {
            Settlement::Partial
        };
        self.set_state(FlowState::Settled(settlement));

        info!(
            "{} 📊 提交完成: {:?}, 结果 {:?}",
            ctx,
            settlement,
            results.keys()
        );

        Ok(SubmissionOutcome {
            session,
            results,
            settlement,
            failures,
            skipped,
        })
    }

    /// 执行单个后续任务
    async fn run_task(
        &self,
        task: TaskKind,
        session: &UploadSession,
        request: &SubmissionRequest,
    ) -> Result<TaskOutput, ApiError> {
        let session_id = session.session_id.as_str();
        match task {
            TaskKind::Explain => self
                .backend
                .explain(session_id, &request.prompt)
                .await
                .map(TaskOutput::Explanation),
            TaskKind::Quiz => self
                .backend
                .quiz(session_id, &request.quiz_prompt())
                .await
                .map(TaskOutput::Quiz),
            TaskKind::CaseStudy => self
                .backend
                .case_study(session_id)
                .await
                .map(TaskOutput::CaseStudy),
            TaskKind::Visualize => self
                .backend
                .visualize(session_id, &request.prompt)
                .await
                .map(TaskOutput::Visualization),
            TaskKind::Summarize | TaskKind::Podcast => Err(ApiError::Other(format!(
                "任务 {} 没有独立的后端接口",
                task
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SelectedFile, TaskSelection};

    fn request(tasks: &[TaskKind], prompt: &str) -> SubmissionRequest {
        SubmissionRequest::new(
            vec![SelectedFile::new("notes.pdf")],
            prompt,
            TaskSelection::of(tasks),
        )
    }

    #[test]
    fn test_validate() {
        let no_file = SubmissionRequest::new(vec![], "", TaskSelection::of(&[TaskKind::Quiz]));
        assert_eq!(validate(&no_file), Err(ValidationError::NoFile));

        assert_eq!(validate(&request(&[], "x")), Err(ValidationError::NoTask));
        assert_eq!(
            validate(&request(&[TaskKind::Explain], "   ")),
            Err(ValidationError::MissingPrompt)
        );
        assert_eq!(
            validate(&request(&[TaskKind::Quiz], "").with_quiz_count(0)),
            Err(ValidationError::InvalidQuizCount { count: 0, max: 20 })
        );
        // 未勾选测验时忽略题目数量
        assert!(validate(&request(&[TaskKind::Summarize], "").with_quiz_count(50)).is_ok());
        assert!(validate(&request(&[TaskKind::Explain], "photosynthesis")).is_ok());
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!(
            "independent".parse::<FailurePolicy>(),
            Ok(FailurePolicy::Independent)
        );
        assert_eq!(
            "ABORT".parse::<FailurePolicy>(),
            Ok(FailurePolicy::AbortRemaining)
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_busy_guard_releases_on_drop() {
        let flag = BusyFlag::default();
        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());
        drop(guard);
        assert!(!flag.is_busy());
    }
}
