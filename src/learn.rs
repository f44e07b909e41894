// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Learning updater: applies user corrections to the pattern store

use chrono::Utc;
use tracing::info;

use crate::config::LearningConfig;
use crate::features::FeatureExtractor;
use crate::store::{CorrectionEvent, PatternStore, PreferenceRecord};
use crate::Result;

/// Applies correction events to the pattern store.
///
/// Deliberately not idempotent: recording the same correction twice
/// reinforces its patterns twice, treating repetition as a stronger signal.
pub struct Learner {
    store: PatternStore,
    extractor: FeatureExtractor,
    config: LearningConfig,
}

impl Learner {
    pub fn new(store: PatternStore, extractor: FeatureExtractor, config: LearningConfig) -> Self {
        Self { store, extractor, config }
    }

    /// Record a user correction and reinforce every pattern extracted from
    /// the filename. The event append and the pattern updates are one
    /// transaction; on storage failure nothing is learned and the caller
    /// is told so.
    pub fn record_correction(
        &self,
        filename: &str,
        original_category: &str,
        corrected_category: &str,
        feedback: Option<&str>,
    ) -> Result<CorrectionEvent> {
        let features = self.extractor.extract(filename);
        let event = CorrectionEvent::new(
            filename,
            original_category,
            corrected_category,
            &features,
            feedback,
        );

        self.store.apply_correction(&event, &self.config)?;

        info!(
            filename,
            category = corrected_category,
            patterns = features.keywords.len() + features.extension.iter().count(),
            "learned correction"
        );

        Ok(event)
    }

    /// Route a clarification answer into the preferences table. Answers
    /// only influence future behavior through whatever reads preferences;
    /// they never mutate learned patterns directly.
    pub fn record_answer(
        &self,
        learning_context: &str,
        answer: &str,
        category_context: Option<&str>,
    ) -> Result<()> {
        self.store.record_preference(&PreferenceRecord {
            preference_type: learning_context.to_string(),
            preference_value: answer.to_string(),
            category_context: category_context.map(String::from),
            strength: 1.0,
            created_at: Utc::now(),
        })?;
        info!(context = learning_context, "recorded clarification answer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PatternKind;

    fn learner() -> Learner {
        Learner::new(
            PatternStore::in_memory().unwrap(),
            FeatureExtractor::default(),
            LearningConfig::default(),
        )
    }

    #[test]
    fn test_correction_reinforces_extension_and_keywords() {
        let learner = learner();
        let event = learner
            .record_correction("lab_results_march.pdf", "downloads/misc", "medical/labs", None)
            .unwrap();

        assert_eq!(event.extension.as_deref(), Some(".pdf"));
        assert_eq!(event.keywords, vec!["lab", "results", "march"]);

        let ext = learner.store.lookup(PatternKind::Extension, ".pdf").unwrap();
        assert_eq!(ext[0].target_category, "medical/labs");
        for kw in &event.keywords {
            let records = learner.store.lookup(PatternKind::Keyword, kw).unwrap();
            assert_eq!(records.len(), 1, "missing pattern for keyword {}", kw);
        }
    }

    #[test]
    fn test_double_correction_double_reinforces() {
        let learner = learner();
        learner.record_correction("x.pdf", "a", "medical", None).unwrap();
        learner.record_correction("x.pdf", "a", "medical", None).unwrap();

        let records = learner.store.lookup(PatternKind::Extension, ".pdf").unwrap();
        assert_eq!(records[0].usage_count, 2);
        assert!((records[0].confidence - 0.7).abs() < 1e-9);
        assert_eq!(learner.store.correction_count().unwrap(), 2);
    }

    #[test]
    fn test_extensionless_filename_learns_keywords_only() {
        let learner = learner();
        let event = learner
            .record_correction("invoice", "downloads/misc", "personal/finances", None)
            .unwrap();
        assert_eq!(event.extension, None);
        let records = learner.store.lookup(PatternKind::Keyword, "invoice").unwrap();
        assert_eq!(records[0].target_category, "personal/finances");
    }
}
