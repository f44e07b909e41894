// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Clarification questions to solicit extra labeled signal from the user
//!
//! Stateless and advisory: asking a question changes nothing. An answer
//! only matters once the caller routes it back through the learner.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A follow-up question with selectable answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Tags what future signal the answer would contribute
    pub learning_context: String,
}

fn question(prompt: String, options: &[&str], learning_context: &str) -> ClarifyingQuestion {
    ClarifyingQuestion {
        prompt,
        options: options.iter().map(|s| s.to_string()).collect(),
        learning_context: learning_context.to_string(),
    }
}

/// Generate at most two clarification questions for a suggestion.
/// Selection is driven by the suggested category and content hints in the
/// filename alone.
pub fn generate_questions(filename: &str, suggested_category: &str) -> Vec<ClarifyingQuestion> {
    let mut questions = Vec::new();
    let name_lower = filename.to_lowercase();
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    if suggested_category.contains("medical") {
        if ["report", "result", "summary"].iter().any(|t| name_lower.contains(t)) {
            questions.push(question(
                format!(
                    "Is '{}' a clinical document that should be easily accessible for patient care?",
                    filename
                ),
                &[
                    "Yes - High priority medical document",
                    "No - Reference/research material",
                    "Unsure",
                ],
                "document_priority",
            ));
        }

        if extension.as_deref() == Some("pdf") {
            questions.push(question(
                format!("What type of medical document is '{}'?", filename),
                &[
                    "Lab/Test Results",
                    "Clinical Notes",
                    "Research Paper",
                    "Patient Education",
                    "Insurance/Administrative",
                ],
                "medical_document_type",
            ));
        }
    } else if suggested_category.contains("projects") {
        questions.push(question(
            format!("Is '{}' part of an active project or archived work?", filename),
            &[
                "Active project - current work",
                "Archived - completed project",
                "Learning/tutorial material",
            ],
            "project_status",
        ));
    }

    questions.push(question(
        format!("How often do you expect to access '{}'?", filename),
        &["Daily/Weekly", "Monthly", "Rarely - archival", "Never - can delete"],
        "access_frequency",
    ));

    // Two at most, to avoid overwhelming the user
    questions.truncate(2);
    questions
}
