//! 结果渲染服务 - 业务能力层
//!
//! 把结果记录渲染成终端展示的文本，结构不符的内容显示占位提示而不是报错

use crate::models::{
    ChartKind, QuizPayload, ResultsRecord, Visualization, VisualizationPayload,
};
use crate::services::quiz_formatter::format_quiz;

/// 条形图最大宽度（字符）
const BAR_WIDTH: usize = 40;

pub const QUIZ_PLACEHOLDER: &str = "⚠️ Quiz could not be displayed.";
pub const VISUALIZATION_PLACEHOLDER: &str = "⚠️ Visualization could not be displayed.";

/// 渲染整个结果记录
pub fn render_results(results: &ResultsRecord) -> String {
    let mut sections = Vec::new();

    if let Some(summary) = &results.summarize {
        sections.push(section("Summary", summary));
    }
    if let Some(explanation) = &results.explain {
        sections.push(section("Explanation", explanation));
    }
    if let Some(quiz) = &results.quiz {
        sections.push(section("Quiz Questions", &render_quiz(quiz)));
    }
    if let Some(case_study) = &results.case_study {
        sections.push(section("Case Study", case_study));
    }
    if let Some(vis) = &results.visualize {
        sections.push(section("Data Visualization", &render_visualization(vis)));
    }

    if sections.is_empty() {
        return "No results.".to_string();
    }

    format!("Results\n{}\n\n{}", "=".repeat(60), sections.join("\n\n"))
}

fn section(title: &str, body: &str) -> String {
    format!("{}\n{}\n{}", title, "-".repeat(title.chars().count()), body.trim())
}

pub fn render_quiz(quiz: &QuizPayload) -> String {
    let blocks = format_quiz(&quiz.items());
    if blocks.is_empty() {
        return QUIZ_PLACEHOLDER.to_string();
    }
    blocks
        .iter()
        .map(|b| b.render())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_visualization(vis: &VisualizationPayload) -> String {
    match vis {
        VisualizationPayload::Chart(chart) => render_chart(chart),
        VisualizationPayload::Unrecognized(_) => VISUALIZATION_PLACEHOLDER.to_string(),
    }
}

fn render_chart(chart: &Visualization) -> String {
    let mut lines = Vec::new();
    if !chart.description.trim().is_empty() {
        lines.push(chart.description.trim().to_string());
    }

    if chart.data.is_empty() {
        lines.push("(no data)".to_string());
        return lines.join("\n");
    }

    let label_width = chart
        .data
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);

    match &chart.kind {
        ChartKind::BarChart => {
            let max = chart
                .data
                .iter()
                .map(|p| p.value)
                .fold(0.0_f64, f64::max);
            for point in &chart.data {
                let len = if max > 0.0 && point.value > 0.0 {
                    ((point.value / max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                lines.push(format!(
                    "{:<width$} | {} {}",
                    point.label,
                    "█".repeat(len),
                    format_value(point.value),
                    width = label_width
                ));
            }
        }
        ChartKind::Other(kind) => {
            lines.push(format!("({})", kind));
            for point in &chart.data {
                lines.push(format!(
                    "{:<width$} : {}",
                    point.label,
                    format_value(point.value),
                    width = label_width
                ));
            }
        }
    }

    lines.join("\n")
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartPoint, TaskOutput};
    use serde_json::json;

    #[test]
    fn test_render_bar_chart() {
        let chart = Visualization {
            description: "Topic weight".to_string(),
            kind: ChartKind::BarChart,
            data: vec![
                ChartPoint { label: "Intro".into(), value: 10.0 },
                ChartPoint { label: "Methods".into(), value: 5.0 },
            ],
        };
        let out = render_visualization(&VisualizationPayload::Chart(chart));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Topic weight");
        assert_eq!(lines[1], format!("Intro   | {} 10", "█".repeat(40)));
        assert_eq!(lines[2], format!("Methods | {} 5", "█".repeat(20)));
    }

    #[test]
    fn test_unrecognized_payloads_render_placeholders() {
        let mut results = ResultsRecord::default();
        results.insert(TaskOutput::Quiz(QuizPayload::Unrecognized(json!(42))));
        results.insert(TaskOutput::Visualization(VisualizationPayload::Unrecognized(
            json!("oops"),
        )));

        let out = render_results(&results);
        assert!(out.contains(QUIZ_PLACEHOLDER));
        assert!(out.contains(VISUALIZATION_PLACEHOLDER));
    }

    #[test]
    fn test_render_sections_in_order() {
        let mut results = ResultsRecord::default();
        results.insert(TaskOutput::Explanation("E".into()));
        results.insert(TaskOutput::Summary("S".into()));
        results.insert(TaskOutput::Quiz(QuizPayload::Single(
            "1. What is X? A) foo B) bar (Correct)".into(),
        )));

        let out = render_results(&results);
        let summary = out.find("Summary").unwrap();
        let explanation = out.find("Explanation").unwrap();
        let quiz = out.find("Quiz Questions").unwrap();
        assert!(summary < explanation && explanation < quiz);
        assert!(out.contains("B) bar **(Correct)**"));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(render_results(&ResultsRecord::default()), "No results.");
    }
}
