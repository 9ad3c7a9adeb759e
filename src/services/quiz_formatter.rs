//! 测验格式化服务 - 业务能力层
//!
//! 把后端返回的松散测验文本整理成带编号的题目块，每个选项单独一行。
//! 这是尽力而为的启发式整理，任何输入都不会报错。

use regex::Regex;
use std::sync::OnceLock;

/// 一个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizChoice {
    /// A-D
    pub letter: char,
    pub text: String,
    /// 是否带有 "(Correct)" 标注
    pub correct: bool,
}

/// 一道题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizBlock {
    /// 从 1 开始的序号
    pub ordinal: usize,
    pub question: String,
    pub choices: Vec<QuizChoice>,
}

impl QuizBlock {
    /// 渲染为展示文本：首行为 "序号. 题干"，之后每个选项一行
    pub fn render(&self) -> String {
        let mut out = format!("{}. {}", self.ordinal, emphasize_correct(&self.question));
        for choice in &self.choices {
            out.push_str(&format!(
                "\n{}) {}",
                choice.letter,
                emphasize_correct(&choice.text)
            ));
        }
        out
    }
}

/// 行首的编号项，或紧跟在句末标点之后的编号项
fn numbered_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)(?:^[ \t]*|[.?!][ \t]+)(\d{1,3})[.)][ \t]+\S")
            .expect("numbered item pattern")
    })
}

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d{1,3}[.)]\s*").expect("leading number pattern"))
}

fn choice_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[\s?])([A-D])[):][ \t]*").expect("choice marker pattern")
    })
}

fn question_then_first_choice() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\?\s*A[):]").expect("question boundary pattern"))
}

fn correct_mark() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\*{0,2}\(\s*correct\s*\)\*{0,2}").expect("correct pattern")
    })
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern"))
}

/// 格式化测验
///
/// 每一段内容至少是一道题，段与段之间不会合并；序号在所有段之间连续
pub fn format_quiz(items: &[String]) -> Vec<QuizBlock> {
    let texts: Vec<String> = items.iter().map(|item| item.replace("\r\n", "\n")).collect();

    texts
        .iter()
        .flat_map(|text| segments(text))
        .enumerate()
        .map(|(i, s)| format_block(i + 1, s))
        .collect()
}

/// 格式化一整段测验文本
pub fn format_quiz_text(raw: &str) -> Vec<QuizBlock> {
    format_quiz(&[raw.to_string()])
}

/// 把一段文本切成题目片段（已去掉空白片段）
fn segments(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut starts = block_starts(text);
    if starts.is_empty() {
        // 没有可识别的题目起点，整体作为一道题
        starts.push(0);
    }

    // 第一个起点之前的内容是前言，丢弃
    let mut pieces = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let block = &text[start..end];

        let mut from = 0;
        for split in inline_question_starts(block) {
            pieces.push(&block[from..split]);
            from = split;
        }
        pieces.push(&block[from..]);
    }

    pieces.retain(|s| !s.trim().is_empty());
    pieces
}

/// 题目起点：编号项，或以大写字母开头且带问号的非选项行
fn block_starts(text: &str) -> Vec<usize> {
    let mut starts: Vec<usize> = numbered_item()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.start()))
        .collect();

    let mut offset = 0;
    for line in text.split('\n') {
        let trimmed = line.trim_start();
        let line_start = offset + (line.len() - trimmed.len());
        if trimmed.starts_with(|c: char| c.is_ascii_uppercase())
            && !starts_with_choice(trimmed)
            && trimmed.contains('?')
        {
            starts.push(line_start);
        }
        offset += line.len() + 1;
    }

    starts.sort_unstable();
    starts.dedup();
    starts
}

fn starts_with_choice(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('A'..='D'), Some(')' | ':'))
    )
}

/// 同一段里出现第二个 "? A)" 时，在新题干的开头切开
///
/// 新题干从上一个选项第一个词之后的第一个大写单词开始
fn inline_question_starts(block: &str) -> Vec<usize> {
    let mut splits = Vec::new();

    for boundary in question_then_first_choice().find_iter(block).skip(1) {
        let question_mark = boundary.start();
        let Some(prev_choice) = choice_marker().find_iter(&block[..question_mark]).last() else {
            continue;
        };
        let from = prev_choice.end();
        let segment = &block[from..question_mark];

        if let Some(offset) = word_starts(segment)
            .into_iter()
            .skip(1)
            .find(|&idx| segment[idx..].starts_with(|c: char| c.is_uppercase()))
        {
            let split = from + offset;
            if splits.last().map_or(true, |&last| split > last) && split > 0 {
                splits.push(split);
            }
        }
    }

    splits
}

fn word_starts(s: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_space = true;
    for (idx, c) in s.char_indices() {
        if !c.is_whitespace() && prev_space {
            starts.push(idx);
        }
        prev_space = c.is_whitespace();
    }
    starts
}

fn format_block(ordinal: usize, raw: &str) -> QuizBlock {
    let text = leading_number().replace(raw, "");
    let text: &str = &text;

    // (字母位置, 标记结束位置, 字母)
    let markers: Vec<(usize, usize, char)> = choice_marker()
        .captures_iter(text)
        .filter_map(|c| {
            let letter = c.get(1)?;
            let whole = c.get(0)?;
            let ch = letter.as_str().chars().next()?;
            Some((letter.start(), whole.end(), ch))
        })
        .collect();

    let Some(&(first_letter, _, _)) = markers.first() else {
        return QuizBlock {
            ordinal,
            question: collapse(text),
            choices: Vec::new(),
        };
    };

    let mut question = collapse(&text[..first_letter]);
    if !question.is_empty() && !question.contains('?') {
        question = question
            .trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
            .to_string();
        question.push('?');
    }

    let choices = markers
        .iter()
        .enumerate()
        .map(|(i, &(_, marker_end, letter))| {
            let end = markers.get(i + 1).map(|m| m.0).unwrap_or(text.len());
            let choice_text = collapse(&text[marker_end.min(end)..end]);
            QuizChoice {
                letter,
                correct: correct_mark().is_match(&choice_text),
                text: choice_text,
            }
        })
        .collect();

    QuizBlock {
        ordinal,
        question,
        choices,
    }
}

fn collapse(s: &str) -> String {
    whitespace().replace_all(s.trim(), " ").to_string()
}

/// 把 "(Correct)" 统一加粗
pub fn emphasize_correct(s: &str) -> String {
    correct_mark().replace_all(s, "**(Correct)**").to_string()
}
