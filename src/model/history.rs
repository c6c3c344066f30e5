//! Browse history persistence
//!
//! Remembers recent search patterns and recently opened items so they can be
//! offered back in the recall prompts.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Newest-first cap on each history list
const HISTORY_LIMIT: usize = 20;

/// A single remembered value with the time it was last used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub value: String,
}

impl HistoryEntry {
    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Persisted browse history, newest entries first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseHistory {
    #[serde(default)]
    pub search_patterns: Vec<HistoryEntry>,
    #[serde(default)]
    pub opened_items: Vec<HistoryEntry>,
}

impl BrowseHistory {
    fn history_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".zos-tui"))
    }

    fn history_path() -> Option<PathBuf> {
        Self::history_dir().map(|dir| dir.join("history.json"))
    }

    pub fn load() -> BrowseHistory {
        let history_path = match Self::history_path() {
            Some(p) => p,
            None => return BrowseHistory::default(),
        };

        if !history_path.exists() {
            return BrowseHistory::default();
        }

        let contents = match fs::read_to_string(&history_path) {
            Ok(c) => c,
            Err(_) => return BrowseHistory::default(),
        };

        serde_json::from_str(&contents).unwrap_or_default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let history_dir = Self::history_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;

        if !history_dir.exists() {
            fs::create_dir_all(&history_dir)?;
        }

        let history_path = Self::history_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine history path"))?;

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&history_path, json)?;

        Ok(())
    }

    /// Record a search pattern, moving a repeated value to the front.
    pub fn add_search_pattern(&mut self, value: &str) {
        Self::push_front(&mut self.search_patterns, value);
    }

    /// Record an opened item display string, moving a repeat to the front.
    pub fn add_opened_item(&mut self, value: &str) {
        Self::push_front(&mut self.opened_items, value);
    }

    fn push_front(entries: &mut Vec<HistoryEntry>, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        entries.retain(|e| e.value != value);
        entries.insert(
            0,
            HistoryEntry {
                timestamp: Local::now(),
                value: value.to_string(),
            },
        );
        entries.truncate(HISTORY_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_moves_to_front() {
        let mut history = BrowseHistory::default();
        history.add_search_pattern("IBMUSER.*");
        history.add_search_pattern("SYS1.PARMLIB");
        history.add_search_pattern("IBMUSER.*");

        let values: Vec<&str> = history
            .search_patterns
            .iter()
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(values, vec!["IBMUSER.*", "SYS1.PARMLIB"]);
    }

    #[test]
    fn test_blank_values_ignored() {
        let mut history = BrowseHistory::default();
        history.add_opened_item("   ");
        history.add_opened_item("");
        assert!(history.opened_items.is_empty());
    }

    #[test]
    fn test_truncates_at_limit() {
        let mut history = BrowseHistory::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            history.add_opened_item(&format!("[lpar1]: IBMUSER.DS{}", i));
        }
        assert_eq!(history.opened_items.len(), HISTORY_LIMIT);
        // newest entry first
        assert_eq!(
            history.opened_items[0].value,
            format!("[lpar1]: IBMUSER.DS{}", HISTORY_LIMIT + 4)
        );
    }
}
