// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Read-only aggregation over the event log and learned patterns

use serde::{Deserialize, Serialize};

use crate::store::{PatternStore, PatternStrength};
use crate::Result;

/// A (category, count) aggregate row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Snapshot of what the engine has learned so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningInsights {
    pub total_corrections: i64,
    /// Categories most often corrected away from (top 5)
    pub most_corrected: Vec<CategoryCount>,
    /// Categories most often corrected toward (top 5)
    pub preferred_categories: Vec<CategoryCount>,
    /// Pattern count and mean confidence per pattern kind
    pub pattern_strength: Vec<PatternStrength>,
}

impl LearningInsights {
    /// Gather insights from the store. An empty store yields a zeroed
    /// report, never an error.
    pub fn gather(store: &PatternStore) -> Result<Self> {
        let total_corrections = store.correction_count()?;
        let most_corrected = store
            .most_corrected(5)?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        let preferred_categories = store
            .preferred_categories(5)?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        let pattern_strength = store.pattern_strength()?;

        Ok(Self {
            total_corrections,
            most_corrected,
            preferred_categories,
            pattern_strength,
        })
    }

    /// False until at least one correction has been recorded
    pub fn has_data(&self) -> bool {
        self.total_corrections > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearningConfig;
    use crate::features::FeatureExtractor;
    use crate::learn::Learner;

    #[test]
    fn test_empty_store_yields_no_data_sentinel() {
        let store = PatternStore::in_memory().unwrap();
        let insights = LearningInsights::gather(&store).unwrap();
        assert!(!insights.has_data());
        assert_eq!(insights.total_corrections, 0);
        assert!(insights.most_corrected.is_empty());
        assert!(insights.pattern_strength.is_empty());
    }

    #[test]
    fn test_aggregates_after_corrections() {
        let store = PatternStore::in_memory().unwrap();
        let learner = Learner::new(
            store.clone(),
            FeatureExtractor::default(),
            LearningConfig::default(),
        );

        learner.record_correction("scan_a.pdf", "downloads/misc", "medical/imaging", None).unwrap();
        learner.record_correction("scan_b.pdf", "downloads/misc", "medical/imaging", None).unwrap();
        learner.record_correction("budget.xlsx", "education", "personal/finances", None).unwrap();

        let insights = LearningInsights::gather(&store).unwrap();
        assert!(insights.has_data());
        assert_eq!(insights.total_corrections, 3);
        assert_eq!(insights.most_corrected[0].category, "downloads/misc");
        assert_eq!(insights.most_corrected[0].count, 2);
        assert_eq!(insights.preferred_categories[0].category, "medical/imaging");

        let ext = insights.pattern_strength.iter()
            .find(|s| s.kind == "extension")
            .unwrap();
        // .pdf (usage 2) and .xlsx (usage 1) are two distinct patterns
        assert_eq!(ext.pattern_count, 2);
        assert!(ext.avg_confidence > 0.5);
    }
}
