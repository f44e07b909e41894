// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Feature extraction from filenames
//!
//! The engine never reads file content; everything it learns comes from
//! two signal kinds derived here: the lowercased extension and a set of
//! normalized keyword tokens from the stem.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ExtractorConfig;

/// Signals extracted from a single filename
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileFeatures {
    /// Lowercased extension with leading dot (e.g. ".pdf"), if parseable
    pub extension: Option<String>,
    /// Normalized keyword tokens, de-duplicated, first occurrence order
    pub keywords: Vec<String>,
}

impl FileFeatures {
    pub fn is_empty(&self) -> bool {
        self.extension.is_none() && self.keywords.is_empty()
    }
}

/// Deterministic filename feature extractor
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract features from a filename. Never fails; an empty or blank
    /// name yields an empty feature set.
    pub fn extract(&self, filename: &str) -> FileFeatures {
        let trimmed = filename.trim();
        if trimmed.is_empty() {
            return FileFeatures::default();
        }

        let path = Path::new(trimmed);

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e.to_lowercase()));

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(trimmed)
            .to_lowercase();

        let mut keywords = Vec::new();
        for token in stem.split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.')) {
            if token.len() <= self.config.min_token_len {
                continue;
            }
            if token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if self.config.stop_words.iter().any(|w| w == token) {
                continue;
            }
            if !keywords.iter().any(|k| k == token) {
                keywords.push(token.to_string());
            }
        }

        FileFeatures { extension, keywords }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::default()
    }

    #[test]
    fn test_extension_lowercased_with_dot() {
        let features = extractor().extract("Report_Final.PDF");
        assert_eq!(features.extension.as_deref(), Some(".pdf"));
    }

    #[test]
    fn test_no_extension() {
        let features = extractor().extract("invoice");
        assert_eq!(features.extension, None);
        assert_eq!(features.keywords, vec!["invoice"]);
    }

    #[test]
    fn test_keyword_normalization() {
        let features = extractor().extract("Blood-Test Results_2024.pdf");
        assert_eq!(features.keywords, vec!["blood", "test", "results"]);
    }

    #[test]
    fn test_drops_short_numeric_and_stop_words() {
        let features = extractor().extract("the_ct_scan_for_2024_v2.png");
        // "the" and "for" are stop words, "ct" and "v2" are too short,
        // "2024" is pure-numeric
        assert_eq!(features.keywords, vec!["scan"]);
    }

    #[test]
    fn test_deduplicates_tokens() {
        let features = extractor().extract("invoice_invoice_copy.pdf");
        assert_eq!(features.keywords, vec!["invoice", "copy"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   ").is_empty());
    }

    #[test]
    fn test_dotted_stem_splits() {
        let features = extractor().extract("backup.config.old.json");
        assert_eq!(features.extension.as_deref(), Some(".json"));
        assert_eq!(features.keywords, vec!["backup", "config", "old"]);
    }
}
