//! 结果记录
//!
//! 后端返回的各种形态（字符串、数组、嵌套图表对象）在边界处解码为下面的类型，
//! 渲染层只消费这里的统一表示。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::task::TaskKind;

/// 测验内容：后端可能返回单个字符串或字符串数组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizPayload {
    Single(String),
    Many(Vec<String>),
    /// 既不是字符串也不是数组
    Unrecognized(Value),
}

impl QuizPayload {
    /// 统一成序列；无法识别时返回空
    pub fn items(&self) -> Vec<String> {
        match self {
            QuizPayload::Single(text) => vec![text.clone()],
            QuizPayload::Many(items) => items.clone(),
            QuizPayload::Unrecognized(_) => Vec::new(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, QuizPayload::Unrecognized(_))
    }
}

/// 图表类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartKind {
    BarChart,
    Other(String),
}

impl From<String> for ChartKind {
    fn from(s: String) -> Self {
        if s == "bar_chart" {
            ChartKind::BarChart
        } else {
            ChartKind::Other(s)
        }
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::BarChart => "bar_chart".to_string(),
            ChartKind::Other(s) => s,
        }
    }
}

/// 图表中的一个数据点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// 可视化结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub data: Vec<ChartPoint>,
}

/// 可视化内容：结构不符时保留原始 JSON，渲染为占位提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VisualizationPayload {
    Chart(Visualization),
    Unrecognized(Value),
}

/// 单个任务解码后的输出
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Summary(String),
    Explanation(String),
    Quiz(QuizPayload),
    CaseStudy(String),
    Visualization(VisualizationPayload),
}

impl TaskOutput {
    pub fn task(&self) -> TaskKind {
        match self {
            TaskOutput::Summary(_) => TaskKind::Summarize,
            TaskOutput::Explanation(_) => TaskKind::Explain,
            TaskOutput::Quiz(_) => TaskKind::Quiz,
            TaskOutput::CaseStudy(_) => TaskKind::CaseStudy,
            TaskOutput::Visualization(_) => TaskKind::Visualize,
        }
    }
}

/// 一次提交的结果记录
///
/// 只包含已勾选且成功的任务
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizPayload>,
    #[serde(rename = "caseStudy", skip_serializing_if = "Option::is_none")]
    pub case_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualize: Option<VisualizationPayload>,
}

impl ResultsRecord {
    pub fn insert(&mut self, output: TaskOutput) {
        match output {
            TaskOutput::Summary(text) => self.summarize = Some(text),
            TaskOutput::Explanation(text) => self.explain = Some(text),
            TaskOutput::Quiz(quiz) => self.quiz = Some(quiz),
            TaskOutput::CaseStudy(text) => self.case_study = Some(text),
            TaskOutput::Visualization(vis) => self.visualize = Some(vis),
        }
    }

    pub fn contains(&self, task: TaskKind) -> bool {
        match task {
            TaskKind::Summarize => self.summarize.is_some(),
            TaskKind::Explain => self.explain.is_some(),
            TaskKind::Quiz => self.quiz.is_some(),
            TaskKind::CaseStudy => self.case_study.is_some(),
            TaskKind::Visualize => self.visualize.is_some(),
            TaskKind::Podcast => false,
        }
    }

    /// 已有结果的键名（按展示顺序）
    pub fn keys(&self) -> Vec<&'static str> {
        TaskKind::ALL
            .iter()
            .filter(|t| self.contains(**t))
            .map(|t| t.key())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quiz_payload_shapes() {
        let single: QuizPayload = serde_json::from_value(json!("1. Q? A) x")).unwrap();
        assert_eq!(single.items(), vec!["1. Q? A) x".to_string()]);

        let many: QuizPayload = serde_json::from_value(json!(["Q1", "Q2"])).unwrap();
        assert_eq!(many, QuizPayload::Many(vec!["Q1".into(), "Q2".into()]));

        let odd: QuizPayload = serde_json::from_value(json!({"questions": 3})).unwrap();
        assert!(!odd.is_recognized());
        assert!(odd.items().is_empty());
    }

    #[test]
    fn test_visualization_payload() {
        let payload: VisualizationPayload = serde_json::from_value(json!({
            "description": "Topics",
            "type": "bar_chart",
            "data": [{"label": "A", "value": 3}, {"label": "B", "value": 1.5}]
        }))
        .unwrap();
        match payload {
            VisualizationPayload::Chart(chart) => {
                assert_eq!(chart.kind, ChartKind::BarChart);
                assert_eq!(chart.data.len(), 2);
                assert_eq!(chart.data[1].value, 1.5);
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let broken: VisualizationPayload =
            serde_json::from_value(json!({"data": "not a list"})).unwrap();
        assert!(matches!(broken, VisualizationPayload::Unrecognized(_)));
    }

    #[test]
    fn test_results_serialize_only_present_keys() {
        let mut results = ResultsRecord::default();
        results.insert(TaskOutput::Summary("S".into()));
        results.insert(TaskOutput::CaseStudy("C".into()));

        assert_eq!(results.keys(), vec!["summarize", "caseStudy"]);
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value, json!({"summarize": "S", "caseStudy": "C"}));
    }
}
