// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Filewise

use thiserror::Error;

/// Result type alias for Filewise operations
pub type Result<T> = std::result::Result<T, FilewiseError>;

/// Filewise error types
#[derive(Error, Debug)]
pub enum FilewiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
