use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::Serialize;

/// 最近动态最多展示的条数
pub const RECENT_DISPLAY_LIMIT: usize = 5;

/// 最多保留的动态条数，更早的丢弃
pub const ACTIVITY_HISTORY_LIMIT: usize = 50;

/// 动态类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityAction {
    /// 首次选择文件
    Uploaded,
    /// 重新选择，替换了之前的文件
    Replaced,
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityAction::Uploaded => write!(f, "Uploaded"),
            ActivityAction::Replaced => write!(f, "Replaced"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub name: String,
    pub action: ActivityAction,
    pub timestamp: DateTime<Local>,
}

/// 最近动态（新的在前，只存在于本次会话）
#[derive(Debug, Clone, Default)]
pub struct RecentActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl RecentActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次文件选择
    pub fn record(&mut self, name: impl Into<String>, action: ActivityAction) {
        self.entries.push_front(ActivityEntry {
            name: name.into(),
            action,
            timestamp: Local::now(),
        });
        self.entries.truncate(ACTIVITY_HISTORY_LIMIT);
    }

    /// 供展示的最近几条
    pub fn recent(&self) -> Vec<&ActivityEntry> {
        self.entries.iter().take(RECENT_DISPLAY_LIMIT).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let mut log = RecentActivityLog::new();
        for i in 0..7 {
            log.record(format!("file{}.pdf", i), ActivityAction::Uploaded);
        }

        assert_eq!(log.len(), 7);
        let recent = log.recent();
        assert_eq!(recent.len(), RECENT_DISPLAY_LIMIT);
        assert_eq!(recent[0].name, "file6.pdf");
        assert_eq!(recent[4].name, "file2.pdf");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut log = RecentActivityLog::new();
        for i in 0..ACTIVITY_HISTORY_LIMIT + 10 {
            log.record(format!("file{}.pdf", i), ActivityAction::Replaced);
        }

        assert_eq!(log.len(), ACTIVITY_HISTORY_LIMIT);
        let newest = format!("file{}.pdf", ACTIVITY_HISTORY_LIMIT + 9);
        assert_eq!(log.recent()[0].name, newest);
    }
}
