use serde::{Deserialize, Serialize};

/// 任务类型
///
/// 声明顺序即后续任务的固定执行顺序（Summarize 除外，它总是随上传一起完成）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// 摘要
    Summarize,
    /// 解释概念
    Explain,
    /// 生成测验
    Quiz,
    /// 相关案例
    #[serde(rename = "casestudy", alias = "voice")]
    CaseStudy,
    /// 数据可视化
    Visualize,
    /// 播客
    Podcast,
}

impl TaskKind {
    /// 上传之后依次执行的任务
    pub const FOLLOW_UP: [TaskKind; 5] = [
        TaskKind::Explain,
        TaskKind::Quiz,
        TaskKind::CaseStudy,
        TaskKind::Visualize,
        TaskKind::Podcast,
    ];

    pub const ALL: [TaskKind; 6] = [
        TaskKind::Summarize,
        TaskKind::Explain,
        TaskKind::Quiz,
        TaskKind::CaseStudy,
        TaskKind::Visualize,
        TaskKind::Podcast,
    ];

    /// 结果记录中的键名
    pub fn key(self) -> &'static str {
        match self {
            TaskKind::Summarize => "summarize",
            TaskKind::Explain => "explain",
            TaskKind::Quiz => "quiz",
            TaskKind::CaseStudy => "caseStudy",
            TaskKind::Visualize => "visualize",
            TaskKind::Podcast => "podcast",
        }
    }

    /// 展示名称
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Summarize => "Summary",
            TaskKind::Explain => "Explanation",
            TaskKind::Quiz => "Quiz",
            TaskKind::CaseStudy => "Case Study",
            TaskKind::Visualize => "Visualization",
            TaskKind::Podcast => "Podcast",
        }
    }

    /// 是否需要用户填写问题
    pub fn requires_prompt(self) -> bool {
        matches!(self, TaskKind::Explain)
    }

    /// 从表单字段名解析（不区分大小写）
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summarize" | "summary" => Some(TaskKind::Summarize),
            "explain" => Some(TaskKind::Explain),
            "quiz" => Some(TaskKind::Quiz),
            "casestudy" | "case_study" | "voice" => Some(TaskKind::CaseStudy),
            "visualize" => Some(TaskKind::Visualize),
            "podcast" => Some(TaskKind::Podcast),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 用户勾选的任务
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSelection {
    pub summarize: bool,
    pub explain: bool,
    pub quiz: bool,
    #[serde(alias = "voice", alias = "case_study")]
    pub casestudy: bool,
    pub podcast: bool,
    pub visualize: bool,
}

impl TaskSelection {
    /// 只勾选给定任务
    pub fn of(tasks: &[TaskKind]) -> Self {
        let mut selection = Self::default();
        for task in tasks {
            selection.set(*task, true);
        }
        selection
    }

    pub fn is_enabled(&self, task: TaskKind) -> bool {
        match task {
            TaskKind::Summarize => self.summarize,
            TaskKind::Explain => self.explain,
            TaskKind::Quiz => self.quiz,
            TaskKind::CaseStudy => self.casestudy,
            TaskKind::Visualize => self.visualize,
            TaskKind::Podcast => self.podcast,
        }
    }

    pub fn set(&mut self, task: TaskKind, enabled: bool) {
        let flag = match task {
            TaskKind::Summarize => &mut self.summarize,
            TaskKind::Explain => &mut self.explain,
            TaskKind::Quiz => &mut self.quiz,
            TaskKind::CaseStudy => &mut self.casestudy,
            TaskKind::Visualize => &mut self.visualize,
            TaskKind::Podcast => &mut self.podcast,
        };
        *flag = enabled;
    }

    /// 切换勾选状态，返回新状态
    pub fn toggle(&mut self, task: TaskKind) -> bool {
        let enabled = !self.is_enabled(task);
        self.set(task, enabled);
        enabled
    }

    pub fn any(&self) -> bool {
        TaskKind::ALL.iter().any(|t| self.is_enabled(*t))
    }

    /// 按固定顺序列出已勾选的任务
    pub fn enabled(&self) -> Vec<TaskKind> {
        TaskKind::ALL
            .iter()
            .copied()
            .filter(|t| self.is_enabled(*t))
            .collect()
    }

    /// 已勾选的后续任务（不含 Summarize）
    pub fn follow_ups(&self) -> impl Iterator<Item = TaskKind> + '_ {
        TaskKind::FOLLOW_UP
            .iter()
            .copied()
            .filter(move |t| self.is_enabled(*t))
    }
}
