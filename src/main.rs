// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filewise CLI: Adaptive Pattern-Learning Suggestion Engine
//!
//! Thin command surface over the learning engine for the organizer
//! scripts that call it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use filewise::clarify::generate_questions;
use filewise::config::AppConfig;
use filewise::features::FeatureExtractor;
use filewise::insights::LearningInsights;
use filewise::learn::Learner;
use filewise::score::Scorer;
use filewise::store::PatternStore;
use filewise::Result;

/// Filewise CLI - Adaptive category suggestions for file organizers
#[derive(Parser, Debug)]
#[command(name = "filewise")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Pattern-learning category suggestion engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Suggest a category for a filename
    Suggest {
        /// Filename to classify
        filename: String,

        /// Also print clarification questions for the suggestion
        #[arg(long)]
        questions: bool,
    },

    /// Record a user correction (teaches the engine)
    Record {
        /// Filename the correction applies to
        filename: String,

        /// Category previously suggested or used
        original: String,

        /// Category the user actually wanted
        corrected: String,

        /// Optional free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Print clarification questions for a filename and category
    Questions {
        filename: String,

        /// Suggested category to tailor questions to (defaults to the
        /// engine's own suggestion)
        #[arg(long)]
        category: Option<String>,
    },

    /// Record the answer to a clarification question
    Answer {
        /// The question's learning context tag
        context: String,

        /// The selected option
        answer: String,

        /// Category the question was about
        #[arg(long)]
        category: Option<String>,
    },

    /// Show learning insights
    Insights,

    /// Store operations
    Db {
        #[command(subcommand)]
        action: DbCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    /// Show store statistics
    Stats,

    /// List learned patterns
    Patterns {
        /// Maximum number to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Vacuum the store (reclaim space)
    Vacuum,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Suggest { filename, questions } => {
            run_suggest(config, &filename, questions, &cli.format)
        }
        Commands::Record { filename, original, corrected, note } => {
            run_record(config, &filename, &original, &corrected, note.as_deref())
        }
        Commands::Questions { filename, category } => {
            run_questions(config, &filename, category, &cli.format)
        }
        Commands::Answer { context, answer, category } => {
            run_answer(config, &context, &answer, category.as_deref())
        }
        Commands::Insights => run_insights(config, &cli.format),
        Commands::Db { action } => run_db_command(config, action),
        Commands::Config { action } => run_config_command(config, action, &cli.config),
    }
}

fn open_store(config: &AppConfig) -> Result<PatternStore> {
    let store = PatternStore::open(&config.database.path)?;
    info!("Store opened: {}", config.database.path);
    Ok(store)
}

fn scorer(config: &AppConfig, store: PatternStore) -> Scorer {
    Scorer::new(
        store,
        FeatureExtractor::new(config.extractor.clone()),
        config.learning.clone(),
        config.taxonomy.clone(),
    )
}

fn learner(config: &AppConfig, store: PatternStore) -> Learner {
    Learner::new(
        store,
        FeatureExtractor::new(config.extractor.clone()),
        config.learning.clone(),
    )
}

/// Suggest a category for one filename
fn run_suggest(config: AppConfig, filename: &str, questions: bool, format: &str) -> Result<()> {
    let store = open_store(&config)?;
    let suggestion = scorer(&config, store).suggest(filename)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&suggestion)?);
        }
        _ => {
            println!(
                "{}: {} (confidence: {:.0}%)",
                filename,
                suggestion.category,
                suggestion.confidence * 100.0
            );
            for matched in &suggestion.matched {
                println!(
                    "  {} '{}' contributed {:.3}",
                    matched.kind, matched.value, matched.contribution
                );
            }
        }
    }

    if questions {
        print_questions(&generate_questions(filename, &suggestion.category), format)?;
    }

    Ok(())
}

/// Record a correction and reinforce its patterns
fn run_record(
    config: AppConfig,
    filename: &str,
    original: &str,
    corrected: &str,
    note: Option<&str>,
) -> Result<()> {
    let store = open_store(&config)?;
    let event = learner(&config, store).record_correction(filename, original, corrected, note)?;

    println!("Learned: {} -> {}", filename, corrected);
    if let Some(ref ext) = event.extension {
        println!("  reinforced extension '{}'", ext);
    }
    if !event.keywords.is_empty() {
        println!("  reinforced keywords: {}", event.keywords.join(", "));
    }

    Ok(())
}

/// Print clarification questions for a filename
fn run_questions(
    config: AppConfig,
    filename: &str,
    category: Option<String>,
    format: &str,
) -> Result<()> {
    let category = match category {
        Some(c) => c,
        None => {
            let store = open_store(&config)?;
            scorer(&config, store).suggest(filename)?.category
        }
    };

    print_questions(&generate_questions(filename, &category), format)
}

fn print_questions(
    questions: &[filewise::clarify::ClarifyingQuestion],
    format: &str,
) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(questions)?);
        }
        _ => {
            if questions.is_empty() {
                println!("No clarification questions");
                return Ok(());
            }
            println!("Clarification questions:");
            for (i, q) in questions.iter().enumerate() {
                println!("{}. {} [{}]", i + 1, q.prompt, q.learning_context);
                for (j, option) in q.options.iter().enumerate() {
                    println!("   {}) {}", j + 1, option);
                }
            }
        }
    }
    Ok(())
}

/// Record a clarification answer as a preference
fn run_answer(
    config: AppConfig,
    context: &str,
    answer: &str,
    category: Option<&str>,
) -> Result<()> {
    let store = open_store(&config)?;
    learner(&config, store).record_answer(context, answer, category)?;
    println!("Recorded answer for '{}'", context);
    Ok(())
}

/// Show learning insights
fn run_insights(config: AppConfig, format: &str) -> Result<()> {
    let store = open_store(&config)?;
    let insights = LearningInsights::gather(&store)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    if !insights.has_data() {
        println!("No learning data available yet");
        return Ok(());
    }

    println!("Learning Insights:");
    println!("  Total corrections: {}", insights.total_corrections);

    println!("  Most corrected categories:");
    for row in &insights.most_corrected {
        println!("    {} ({} corrections)", row.category, row.count);
    }

    println!("  Preferred categories:");
    for row in &insights.preferred_categories {
        println!("    {} ({} uses)", row.category, row.count);
    }

    println!("  Pattern strength:");
    for strength in &insights.pattern_strength {
        println!(
            "    {}: {} patterns, avg confidence {:.2}",
            strength.kind, strength.pattern_count, strength.avg_confidence
        );
    }

    Ok(())
}

/// Run store commands
fn run_db_command(config: AppConfig, action: DbCommands) -> Result<()> {
    let store = open_store(&config)?;

    match action {
        DbCommands::Stats => {
            let insights = LearningInsights::gather(&store)?;
            let pattern_total: i64 = insights.pattern_strength.iter()
                .map(|s| s.pattern_count)
                .sum();
            println!("Store Statistics:");
            println!("  Corrections: {}", insights.total_corrections);
            println!("  Patterns: {}", pattern_total);
        }
        DbCommands::Patterns { limit } => {
            let patterns = store.all_patterns()?;
            println!("Learned patterns:");
            for record in patterns.iter().take(limit) {
                println!(
                    "  {} '{}' -> {} (confidence {:.2}, used {}x)",
                    record.kind,
                    record.value,
                    record.target_category,
                    record.confidence,
                    record.usage_count
                );
            }
        }
        DbCommands::Vacuum => {
            store.vacuum()?;
            println!("Store vacuumed successfully");
        }
    }

    Ok(())
}

/// Run config commands
fn run_config_command(
    config: AppConfig,
    action: ConfigCommands,
    config_path: &std::path::Path,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            let default_config = AppConfig::default();
            default_config.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            println!("Configuration at {:?} is valid", config_path);
            println!("  Database: {}", config.database.path);
            println!("  Fallback rules: {}", config.taxonomy.rules.len());
            println!("  Reinforcement step: {}", config.learning.reinforcement_step);
        }
    }

    Ok(())
}
