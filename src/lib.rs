// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filewise: Adaptive Pattern-Learning Suggestion Engine
//!
//! Learns (filename pattern → category) associations from user corrections
//! and fuses them into advisory category suggestions with a confidence
//! value. Suggestions are advisory only; moving files is the caller's job.

pub mod clarify;
pub mod config;
pub mod error;
pub mod fallback;
pub mod features;
pub mod insights;
pub mod learn;
pub mod score;
pub mod store;

pub use config::AppConfig;
pub use error::{FilewiseError, Result};
