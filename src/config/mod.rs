// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Filewise

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Learning/scoring tunables
    #[serde(default)]
    pub learning: LearningConfig,

    /// Feature extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Static fallback taxonomy used when nothing has been learned
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// Tunable constants for reinforcement and scoring.
///
/// The defaults reproduce the engine's documented behavior; none of them
/// is a calibrated probability.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LearningConfig {
    /// Confidence a brand-new pattern starts from, before its first step
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,

    /// Confidence increase per reinforcing correction
    #[serde(default = "default_reinforcement_step")]
    pub reinforcement_step: f64,

    /// usage_count at which an extension pattern's weight saturates
    #[serde(default = "default_extension_saturation")]
    pub extension_saturation: f64,

    /// usage_count at which a keyword pattern's weight saturates
    #[serde(default = "default_keyword_saturation")]
    pub keyword_saturation: f64,

    /// Fixed discount applied to keyword evidence relative to extensions
    #[serde(default = "default_keyword_discount")]
    pub keyword_discount: f64,

    /// Confidence reported for suggestions from the static fallback
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtractorConfig {
    /// Tokens of this length or shorter are discarded
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Tokens discarded regardless of length
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

/// Static keyword/extension taxonomy for the non-learned fallback path.
///
/// Rules are evaluated in order; the first match wins. Held as immutable
/// configuration so deployments can swap the taxonomy without code changes.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaxonomyConfig {
    #[serde(default = "default_fallback_rules")]
    pub rules: Vec<FallbackRule>,

    #[serde(default = "default_category")]
    pub default_category: String,
}

/// One fallback classification rule
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackRule {
    /// Matches when any keyword occurs in the lowercased filename
    Keywords { category: String, any_of: Vec<String> },
    /// Matches when the filename ends with any of these suffixes
    Extensions { category: String, any_of: Vec<String> },
}

// Default value functions
fn default_db_path() -> String { "filewise.db".to_string() }
fn default_base_confidence() -> f64 { 0.5 }
fn default_reinforcement_step() -> f64 { 0.1 }
fn default_extension_saturation() -> f64 { 10.0 }
fn default_keyword_saturation() -> f64 { 5.0 }
fn default_keyword_discount() -> f64 { 0.8 }
fn default_fallback_confidence() -> f64 { 0.3 }
fn default_min_token_len() -> usize { 2 }
fn default_category() -> String { "downloads/misc".to_string() }

fn default_stop_words() -> Vec<String> {
    vec!["the", "and", "for", "with", "from"]
        .into_iter().map(String::from).collect()
}

fn keywords_rule(category: &str, any_of: &[&str]) -> FallbackRule {
    FallbackRule::Keywords {
        category: category.to_string(),
        any_of: any_of.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_fallback_rules() -> Vec<FallbackRule> {
    vec![
        keywords_rule("medical/imaging", &["ct", "mri", "xray", "x-ray", "dicom", "scan", "imaging"]),
        keywords_rule("medical/labs", &["lab", "blood", "cbc", "results", "pathology", "biopsy"]),
        keywords_rule("medical/clinical_notes", &["clinical", "patient", "notes", "chart", "summary"]),
        keywords_rule("medical/genomics", &["genetic", "genomic", "dna", "gene", "sequence"]),
        keywords_rule("medical/medications", &["medication", "prescription", "drug", "pharmacy"]),
        keywords_rule("medical/research", &["research", "study", "trial", "paper"]),
        keywords_rule("medical", &["medical", "clinical", "patient", "doctor"]),
        keywords_rule("education", &["education", "study", "course", "lecture"]),
        FallbackRule::Extensions {
            category: "projects/code".to_string(),
            any_of: vec![".py", ".js", ".html", ".css", ".json"]
                .into_iter().map(String::from).collect(),
        },
        keywords_rule("screenshots", &["screenshot"]),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            learning: LearningConfig::default(),
            extractor: ExtractorConfig::default(),
            taxonomy: TaxonomyConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
            reinforcement_step: default_reinforcement_step(),
            extension_saturation: default_extension_saturation(),
            keyword_saturation: default_keyword_saturation(),
            keyword_discount: default_keyword_discount(),
            fallback_confidence: default_fallback_confidence(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            stop_words: default_stop_words(),
        }
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            rules: default_fallback_rules(),
            default_category: default_category(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::FilewiseError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.database.path, "filewise.db");
        assert_eq!(parsed.learning.reinforcement_step, 0.1);
        assert_eq!(parsed.taxonomy.default_category, "downloads/misc");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"database": {"path": "/tmp/test.db"}}"#).unwrap();
        assert_eq!(parsed.database.path, "/tmp/test.db");
        assert_eq!(parsed.learning.base_confidence, 0.5);
        assert!(!parsed.taxonomy.rules.is_empty());
    }
}
