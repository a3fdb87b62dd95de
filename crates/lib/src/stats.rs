//! In-memory analysis stats for the dashboard.
//!
//! Append-only, arrival order, lost on restart. Held by the gateway state and shared
//! with handlers; never pruned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::AnalysisResult;

/// How many records `recent` holds.
pub const RECENT_LIMIT: usize = 5;

/// One successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub tone: String,
    pub urgency: String,
    pub summary: String,
    pub received_at: DateTime<Utc>,
}

impl StatRecord {
    pub fn new(
        tone: impl Into<String>,
        urgency: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            tone: tone.into(),
            urgency: urgency.into(),
            summary: summary.into(),
            received_at: Utc::now(),
        }
    }

    /// Record built from the defaulted fields of an analysis result.
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self::new(result.tone(), result.urgency(), result.summary())
    }

    fn is_angry(&self) -> bool {
        self.tone.contains("Angry") || self.tone.contains("Negative")
    }

    fn is_positive(&self) -> bool {
        self.tone.contains("Positive")
    }

    fn is_high_urgency(&self) -> bool {
        self.urgency.contains("High")
    }
}

/// Aggregate view returned by `/api/stats`.
///
/// `neutral_count` is `total - angry_count - positive_count`; a tone matching both classes
/// is counted twice, so it can go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total: usize,
    pub high_urgency_count: usize,
    pub angry_count: usize,
    pub positive_count: usize,
    pub neutral_count: i64,
    /// Up to five most recent records, newest first.
    pub recent: Vec<StatRecord>,
}

impl StatsSnapshot {
    fn from_records(records: &[StatRecord]) -> Self {
        let total = records.len();
        let angry_count = records.iter().filter(|r| r.is_angry()).count();
        let positive_count = records.iter().filter(|r| r.is_positive()).count();
        let high_urgency_count = records.iter().filter(|r| r.is_high_urgency()).count();
        let neutral_count = total as i64 - angry_count as i64 - positive_count as i64;
        let recent = records.iter().rev().take(RECENT_LIMIT).cloned().collect();
        Self {
            total,
            high_urgency_count,
            angry_count,
            positive_count,
            neutral_count,
            recent,
        }
    }
}

/// Append-only store of analysis records.
pub struct StatsStore {
    inner: Arc<RwLock<Vec<StatRecord>>>,
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn append(&self, record: StatRecord) {
        self.inner.write().await.push(record);
    }

    pub async fn snapshot(&self) -> StatsSnapshot {
        let g = self.inner.read().await;
        StatsSnapshot::from_records(&g)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(tones: &[&str]) -> StatsStore {
        let store = StatsStore::new();
        for (i, tone) in tones.iter().enumerate() {
            store
                .append(StatRecord::new(*tone, "Low", format!("summary {}", i)))
                .await;
        }
        store
    }

    #[tokio::test]
    async fn empty_snapshot() {
        let snap = StatsStore::new().snapshot().await;
        assert_eq!(snap.total, 0);
        assert_eq!(snap.neutral_count, 0);
        assert!(snap.recent.is_empty());
    }

    #[tokio::test]
    async fn tone_classification_counts() {
        let store = store_with(&["Angry", "Positive", "Neutral", "Angry"]).await;
        let snap = store.snapshot().await;
        assert_eq!(snap.total, 4);
        assert_eq!(snap.angry_count, 2);
        assert_eq!(snap.positive_count, 1);
        assert_eq!(snap.neutral_count, 1);
    }

    #[tokio::test]
    async fn negative_counts_as_angry_and_match_is_case_sensitive() {
        let store = store_with(&["Negative", "Slightly Negative", "angry", "positive"]).await;
        let snap = store.snapshot().await;
        assert_eq!(snap.angry_count, 2);
        assert_eq!(snap.positive_count, 0);
        assert_eq!(snap.neutral_count, 2);
    }

    #[tokio::test]
    async fn overlapping_tone_makes_neutral_negative() {
        let store = store_with(&["Angry-Positive"]).await;
        let snap = store.snapshot().await;
        assert_eq!(snap.angry_count, 1);
        assert_eq!(snap.positive_count, 1);
        assert_eq!(snap.neutral_count, -1);
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_capped() {
        let store = store_with(&["Neutral"; 7]).await;
        let snap = store.snapshot().await;
        assert_eq!(snap.total, 7);
        let summaries: Vec<&str> = snap.recent.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(
            summaries,
            ["summary 6", "summary 5", "summary 4", "summary 3", "summary 2"]
        );
    }

    #[tokio::test]
    async fn high_urgency_count() {
        let store = StatsStore::new();
        store.append(StatRecord::new("Neutral", "High", "a")).await;
        store.append(StatRecord::new("Neutral", "Low", "b")).await;
        store.append(StatRecord::new("Neutral", "Very High", "c")).await;
        assert_eq!(store.snapshot().await.high_urgency_count, 2);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let store = Arc::new(StatsStore::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(StatRecord::new("Neutral", "Low", format!("s{}", i)))
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.len().await, 50);
    }

    #[test]
    fn record_from_empty_result_uses_defaults() {
        let r = StatRecord::from_result(&AnalysisResult::default());
        assert_eq!(r.tone, "Neutral");
        assert_eq!(r.urgency, "Low");
        assert_eq!(r.summary, "No summary available");
    }
}
