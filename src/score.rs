// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Suggestion scorer: fuses learned pattern weights into a category
//! suggestion
//!
//! Fusion is deliberately additive rather than Bayesian: each matched
//! pattern contributes confidence × a usage-saturating weight, summed per
//! category. Transparent to explain, cheap to compute.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::{LearningConfig, TaxonomyConfig};
use crate::fallback;
use crate::features::FeatureExtractor;
use crate::store::{PatternKind, PatternStore};
use crate::Result;

/// An ephemeral scoring result; callers may act on it, discard it, or
/// turn it into a correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: String,
    /// Always in [0, 1]
    pub confidence: f64,
    /// Patterns that contributed, for explainability; empty on the
    /// fallback path
    pub matched: Vec<PatternMatch>,
}

/// One learned pattern's contribution to a suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub value: String,
    pub category: String,
    pub contribution: f64,
}

/// Scores filenames against the pattern store
pub struct Scorer {
    store: PatternStore,
    extractor: FeatureExtractor,
    learning: LearningConfig,
    taxonomy: TaxonomyConfig,
}

impl Scorer {
    pub fn new(
        store: PatternStore,
        extractor: FeatureExtractor,
        learning: LearningConfig,
        taxonomy: TaxonomyConfig,
    ) -> Self {
        Self { store, extractor, learning, taxonomy }
    }

    /// Suggest a category for a filename. Always resolves to some
    /// category; only storage failures propagate.
    pub fn suggest(&self, filename: &str) -> Result<Suggestion> {
        let features = self.extractor.extract(filename);

        let mut scores: HashMap<String, f64> = HashMap::new();
        let mut matched = Vec::new();

        if let Some(ref ext) = features.extension {
            for record in self.store.lookup(PatternKind::Extension, ext)? {
                let weight = (record.usage_count as f64 / self.learning.extension_saturation).min(1.0);
                let contribution = record.confidence * weight;
                *scores.entry(record.target_category.clone()).or_default() += contribution;
                matched.push(PatternMatch {
                    kind: PatternKind::Extension,
                    value: ext.clone(),
                    category: record.target_category,
                    contribution,
                });
            }
        }

        for keyword in &features.keywords {
            for record in self.store.lookup(PatternKind::Keyword, keyword)? {
                let weight = (record.usage_count as f64 / self.learning.keyword_saturation).min(1.0);
                let contribution = record.confidence * weight * self.learning.keyword_discount;
                *scores.entry(record.target_category.clone()).or_default() += contribution;
                matched.push(PatternMatch {
                    kind: PatternKind::Keyword,
                    value: keyword.clone(),
                    category: record.target_category,
                    contribution,
                });
            }
        }

        if scores.is_empty() {
            let category = fallback::classify(filename, &self.taxonomy);
            debug!(filename, %category, "no learned patterns, using fallback");
            return Ok(Suggestion {
                category,
                confidence: self.learning.fallback_confidence,
                matched: Vec::new(),
            });
        }

        // Highest score wins; ties resolve to the lexicographically
        // smallest category so results are deterministic.
        let (category, raw_score) = scores
            .into_iter()
            .max_by(|(cat_a, score_a), (cat_b, score_b)| {
                score_a
                    .partial_cmp(score_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| cat_b.cmp(cat_a))
            })
            .unwrap_or_else(|| (self.taxonomy.default_category.clone(), 0.0));

        matched.retain(|m| m.category == category);
        debug!(filename, %category, raw_score, "scored suggestion");

        Ok(Suggestion {
            category,
            confidence: raw_score.min(1.0),
            matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learn::Learner;

    fn setup() -> (Learner, Scorer) {
        let store = PatternStore::in_memory().unwrap();
        let learner = Learner::new(
            store.clone(),
            FeatureExtractor::default(),
            LearningConfig::default(),
        );
        let scorer = Scorer::new(
            store,
            FeatureExtractor::default(),
            LearningConfig::default(),
            TaxonomyConfig::default(),
        );
        (learner, scorer)
    }

    #[test]
    fn test_fresh_store_falls_back_with_fixed_confidence() {
        let (_, scorer) = setup();

        // No fallback rule matches this name
        let suggestion = scorer.suggest("zzz_qqq.xyz").unwrap();
        assert_eq!(suggestion.category, "downloads/misc");
        assert!((suggestion.confidence - 0.3).abs() < 1e-9);
        assert!(suggestion.matched.is_empty());

        // A matching fallback rule still reports the same fixed confidence
        let suggestion = scorer.suggest("mri_head.dcm").unwrap();
        assert_eq!(suggestion.category, "medical/imaging");
        assert!((suggestion.confidence - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_single_keyword_reinforcement_scores_expected_weight() {
        let (learner, scorer) = setup();
        learner
            .record_correction("invoice", "downloads/misc", "personal/finances", None)
            .unwrap();

        // keyword weight: 0.6 × min(1/5, 1) × 0.8 = 0.096
        let suggestion = scorer.suggest("2024_invoice.pdf").unwrap();
        assert_eq!(suggestion.category, "personal/finances");
        assert!((suggestion.confidence - 0.096).abs() < 1e-9);
        assert_eq!(suggestion.matched.len(), 1);
        assert_eq!(suggestion.matched[0].kind, PatternKind::Keyword);
    }

    #[test]
    fn test_keyword_outweighs_extension_at_low_usage() {
        let (learner, scorer) = setup();

        // "x.pdf" yields only the extension feature ("x" is too short);
        // "invoice" yields only the keyword feature.
        learner.record_correction("x.pdf", "a", "by_extension", None).unwrap();
        learner.record_correction("invoice", "a", "by_keyword", None).unwrap();

        // At usage=1 and confidence 0.6 the keyword's faster saturation
        // beats the extension: 0.6×(1/5)×0.8 = 0.096 vs 0.6×(1/10) = 0.06.
        let suggestion = scorer.suggest("invoice.pdf").unwrap();
        assert_eq!(suggestion.category, "by_keyword");
        assert!((suggestion.confidence - 0.096).abs() < 1e-9);
    }

    #[test]
    fn test_contributions_accumulate_across_features() {
        let (learner, scorer) = setup();
        learner
            .record_correction("blood_results.pdf", "downloads/misc", "medical/labs", None)
            .unwrap();

        // extension 0.6×0.1 + keywords 2×(0.6×0.2×0.8) = 0.06 + 0.192
        let suggestion = scorer.suggest("blood_results.pdf").unwrap();
        assert_eq!(suggestion.category, "medical/labs");
        assert!((suggestion.confidence - 0.252).abs() < 1e-9);
        assert_eq!(suggestion.matched.len(), 3);
    }

    #[test]
    fn test_confidence_clamped_to_one() {
        let (learner, scorer) = setup();
        // Saturate: many reinforcements push raw confidence well past 1.0
        for _ in 0..20 {
            learner
                .record_correction("genome_sequence_data.fastq", "downloads/misc", "medical/genomics", None)
                .unwrap();
        }

        let suggestion = scorer.suggest("genome_sequence_data.fastq").unwrap();
        assert_eq!(suggestion.category, "medical/genomics");
        assert!((suggestion.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_competing_categories_highest_score_wins() {
        let (learner, scorer) = setup();
        learner.record_correction("report.pdf", "a", "medical", None).unwrap();
        learner.record_correction("report.pdf", "a", "finance", None).unwrap();
        learner.record_correction("report.pdf", "a", "finance", None).unwrap();

        let suggestion = scorer.suggest("report.pdf").unwrap();
        assert_eq!(suggestion.category, "finance");
        // Explainability list only carries the winner's patterns
        assert!(suggestion.matched.iter().all(|m| m.category == "finance"));
    }

    #[test]
    fn test_never_fails_and_confidence_in_range() {
        let (learner, scorer) = setup();
        learner.record_correction("notes.txt", "a", "education", None).unwrap();

        for name in ["", "   ", "...", "a", "weird name!!.tar.gz", "notes.txt", "12345"] {
            let suggestion = scorer.suggest(name).unwrap();
            assert!(!suggestion.category.is_empty());
            assert!(suggestion.confidence >= 0.0 && suggestion.confidence <= 1.0);
        }
    }
}
