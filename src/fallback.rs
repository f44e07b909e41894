// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Static fallback classifier used when nothing learned matches

use crate::config::{FallbackRule, TaxonomyConfig};

/// Classify a filename against the static taxonomy. Rules run in order,
/// first match wins; always returns a category.
pub fn classify(filename: &str, taxonomy: &TaxonomyConfig) -> String {
    let name_lower = filename.to_lowercase();

    for rule in &taxonomy.rules {
        match rule {
            FallbackRule::Keywords { category, any_of } => {
                if any_of.iter().any(|kw| name_lower.contains(kw.as_str())) {
                    return category.clone();
                }
            }
            FallbackRule::Extensions { category, any_of } => {
                if any_of.iter().any(|ext| name_lower.ends_with(ext.as_str())) {
                    return category.clone();
                }
            }
        }
    }

    taxonomy.default_category.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> TaxonomyConfig {
        TaxonomyConfig::default()
    }

    #[test]
    fn test_medical_imaging() {
        assert_eq!(classify("mri_brain_2023.dcm", &taxonomy()), "medical/imaging");
    }

    #[test]
    fn test_labs_keyword() {
        assert_eq!(classify("cbc_panel.pdf", &taxonomy()), "medical/labs");
    }

    #[test]
    fn test_code_extension() {
        assert_eq!(classify("deploy_script.py", &taxonomy()), "projects/code");
    }

    #[test]
    fn test_screenshot() {
        assert_eq!(classify("Screenshot 2024-01-15.png", &taxonomy()), "screenshots");
    }

    #[test]
    fn test_default_category() {
        assert_eq!(classify("holiday_playlist.mp3", &taxonomy()), "downloads/misc");
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        // "research" appears before the generic "education" rule
        assert_eq!(classify("research_course.pdf", &taxonomy()), "medical/research");
    }
}
