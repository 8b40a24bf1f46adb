//! CLI definition and command dispatch for Word Vault.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the core.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--config`, `--db`, `--verbose`)
//! 2. Environment variables (`WV_CONFIG`, `WV_DB`, `WV_VERBOSE`)
//! 3. Config file (`~/.wv/config.yaml` or path from `--config`/`WV_CONFIG`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::ui::format::format_thousands;
use crate::ui::{table, ColorMode, MessageType, Progress, ProgressMode, Style};

use wv_core::{
    migrate, migration_status, Config, CoreError, SearchQuery, WordManager, WordStore,
    DEFAULT_BATCH_SIZE,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Word Vault – indexed word score store
#[derive(Parser, Debug)]
#[command(name = "wv")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "WV_VERBOSE")]
    pub verbose: bool,

    /// Suppress progress and informational messages
    #[arg(short, long, global = true, env = "WV_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.wv/config.yaml)
    #[arg(long, global = true, env = "WV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the store file (overrides the configured location)
    #[arg(long, global = true, env = "WV_DB")]
    pub db: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "WV_COLOR", default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch words for one or more lengths from the word API and merge them
    #[command(after_help = r#"EXAMPLES:
    # Fetch all 5-letter words
    wv fetch 5

    # Fetch several lengths in one run (sequential, polite to the API)
    wv fetch 3 4 5

    # Smaller pages for a flaky connection
    wv fetch 7 --page-size 25
"#)]
    Fetch {
        /// Word lengths to fetch
        #[arg(required = true)]
        lengths: Vec<u32>,

        /// Words per API page (default from config)
        #[arg(long)]
        page_size: Option<u32>,

        /// Output merge reports in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List all stored words of a length, alphabetically
    Words {
        /// Word length
        length: u32,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the top-scoring words
    #[command(after_help = r#"EXAMPLES:
    # Top 10 words overall
    wv top

    # Top 25 five-letter words
    wv top --length 5 --limit 25
"#)]
    Top {
        /// Restrict to one word length
        #[arg(long)]
        length: Option<u32>,

        /// Number of words to show
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Search words with composable filters (all filters AND together)
    #[command(after_help = r#"EXAMPLES:
    # Words containing "zz" worth 20+ points
    wv search --contains zz --min-points 20

    # Wildcard pattern: % = any run, _ = one character
    wv search --pattern "qu___"

    # Combine filters with a length restriction
    wv search --contains est --min-points 8 --length 6 --length 7
"#)]
    Search {
        /// Wildcard pattern against the word (% = any run, _ = one char)
        #[arg(long)]
        pattern: Option<String>,

        /// Literal substring the word must contain
        #[arg(long)]
        contains: Option<String>,

        /// Minimum points (inclusive)
        #[arg(long)]
        min_points: Option<i64>,

        /// Maximum points (inclusive)
        #[arg(long)]
        max_points: Option<i64>,

        /// Acceptable word length (repeatable)
        #[arg(long = "length", value_name = "LEN")]
        lengths: Vec<u32>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show a single stored word
    Show {
        /// The word to look up
        word: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate statistics (optionally scoped to one length)
    Stats {
        /// Restrict to one word length
        #[arg(long)]
        length: Option<u32>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the word count per length
    Lengths {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show the on-disk size of the store
    Size {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show store status (path, counts, size, migration state)
    #[command(after_help = r#"EXAMPLES:
    # Basic status
    wv status

    # Include migration state against a legacy JSON document
    wv status --legacy database.json

    # Get status as JSON for scripting
    wv status --json
"#)]
    Status {
        /// Legacy JSON document to compare against
        #[arg(long)]
        legacy: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Migrate a legacy JSON word document into the store
    #[command(after_help = r#"EXAMPLES:
    # One-shot migration (the source file is preserved, a copy is set aside)
    wv migrate database.json

    # Re-running is safe: migration rides the normal upsert path
    wv migrate database.json
"#)]
    Migrate {
        /// Path to the legacy JSON document
        file: PathBuf,

        /// Records per ingest batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Output the migration report in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the store indexes
    Reindex,

    /// Reclaim free space in the store file
    Vacuum,
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, initialize logging, and dispatch the command.
///
/// # Returns
///
/// Returns `ExitCode::SUCCESS` on success, or `ExitCode::FAILURE` on error.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    // - Always show warnings (for config issues, deprecations, etc.)
    // - Show debug info only when --verbose is set
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!(
        "wv_core={level},wv_db={level},wv_fetch={level},wv_cli={level}",
        level = log_level
    );

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .init();

    // Parse color mode from --color flag
    let color_mode = ColorMode::from_str(&cli.color).unwrap_or(ColorMode::Auto);
    let style = Style::new(color_mode);

    // Resolve configuration
    // Priority: --config flag > WV_CONFIG env > ~/.wv/config.yaml > defaults
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let hint = if let Some(path) = &cli.config {
                format!("Check your config at {}", path.display())
            } else {
                "Check your config at ~/.wv/config.yaml".to_string()
            };
            eprintln!(
                "{}",
                style.error_with_context(
                    "Failed to load configuration",
                    Some(&e.to_string()),
                    Some(&hint),
                )
            );
            return ExitCode::FAILURE;
        }
    };

    // Apply store path override if specified via --db or WV_DB
    let config = match &cli.db {
        Some(path) => config.with_database_path(path),
        None => config,
    };
    tracing::debug!("Using store at {:?}", config.database_path);

    // Dispatch to command handler
    let result = match cli.command {
        Command::Fetch {
            lengths,
            page_size,
            json,
        } => handle_fetch(
            &style, &config, lengths, page_size, cli.quiet, json, color_mode,
        ),
        Command::Words { length, json } => handle_words(&style, &config, length, json),
        Command::Top {
            length,
            limit,
            json,
        } => handle_top(&style, &config, length, limit, json),
        Command::Search {
            pattern,
            contains,
            min_points,
            max_points,
            lengths,
            json,
        } => handle_search(
            &style, &config, pattern, contains, min_points, max_points, lengths, json,
        ),
        Command::Show { word, json } => handle_show(&style, &config, word, json),
        Command::Stats { length, json } => handle_stats(&style, &config, length, json),
        Command::Lengths { json } => handle_lengths(&style, &config, json),
        Command::Size { json } => handle_size(&style, &config, json),
        Command::Status { legacy, json } => handle_status(&style, &config, legacy, json),
        Command::Migrate {
            file,
            batch_size,
            json,
        } => handle_migrate(
            &style, &config, file, batch_size, cli.quiet, json, color_mode,
        ),
        Command::Reindex => handle_reindex(&style, &config, cli.quiet, color_mode),
        Command::Vacuum => handle_vacuum(&style, &config, cli.quiet, color_mode),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style.message(MessageType::Err, &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Open the store configured for this invocation.
fn open_store(config: &Config) -> Result<WordStore, CoreError> {
    Ok(WordStore::open(&config.database_path)?)
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_fetch(
    style: &Style,
    config: &Config,
    lengths: Vec<u32>,
    page_size: Option<u32>,
    quiet: bool,
    json: bool,
    color_mode: ColorMode,
) -> Result<(), CoreError> {
    let mut config = config.clone();
    if let Some(size) = page_size {
        config.api.page_size = size.max(1);
    }

    let mut manager = WordManager::open(&config)?;
    let mode = ProgressMode::detect(quiet, json, color_mode);

    let mut current: Option<(u32, Progress)> = None;
    let reports = manager.refresh_lengths(&lengths, |length, p| {
        let needs_new = current.as_ref().map(|(l, _)| *l != length).unwrap_or(true);
        if needs_new {
            if let Some((_, bar)) = current.take() {
                bar.finish_clear();
            }
            current = Some((
                length,
                Progress::bar(
                    u64::from(p.total_pages),
                    &format!("Fetching {length}-letter words"),
                    mode,
                ),
            ));
        }
        if let Some((_, bar)) = &current {
            bar.set_position(u64::from(p.page));
            bar.set_message(&format!(
                "Fetching {length}-letter words ({} of {} words)",
                p.words_so_far, p.total_words
            ));
        }
    });
    if let Some((_, bar)) = current.take() {
        bar.finish_clear();
    }
    let reports = reports?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).unwrap_or_default()
        );
    } else {
        for report in &reports {
            let outcome = if report.complete { "complete" } else { "partial" };
            println!(
                "{}",
                style.message(
                    MessageType::Ok,
                    &format!(
                        "Merged {} {}-letter words ({} rows affected, {} update)",
                        format_thousands(report.merge.submitted),
                        report.length,
                        report.merge.affected,
                        outcome
                    )
                )
            );
            println!(
                "{}",
                style.message_detail(
                    "Stored",
                    &format!(
                        "{} -> {} words of length {}",
                        format_thousands(report.merge.before),
                        format_thousands(report.merge.after),
                        report.length
                    )
                )
            );
        }
        if reports.len() < lengths.len() {
            println!(
                "{}",
                style.message(
                    MessageType::Warn,
                    &format!(
                        "Stopped after {} of {} lengths",
                        reports.len(),
                        lengths.len()
                    )
                )
            );
        }
    }

    manager.close()?;
    Ok(())
}

fn handle_words(style: &Style, config: &Config, length: u32, json: bool) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let records = store.get_by_length(length)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).unwrap_or_default()
        );
        return Ok(());
    }

    if records.is_empty() {
        println!(
            "{}",
            style.message(
                MessageType::Info,
                &format!("No {length}-letter words stored")
            )
        );
        println!(
            "{}",
            style.message(
                MessageType::Hint,
                &format!("Run `wv fetch {length}` to pull them from the word API")
            )
        );
        return Ok(());
    }

    println!("{}", table::render_words_table(&records));
    println!();
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "{} words of length {}",
                format_thousands(records.len() as u64),
                length
            )
        )
    );
    Ok(())
}

fn handle_top(
    style: &Style,
    config: &Config,
    length: Option<u32>,
    limit: usize,
    json: bool,
) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let records = store.top_by_points(length, limit)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).unwrap_or_default()
        );
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", style.message(MessageType::Info, "The store is empty"));
        return Ok(());
    }

    let scope = match length {
        Some(len) => format!("top {} words of length {}", records.len(), len),
        None => format!("top {} words", records.len()),
    };
    println!("{}", table::render_words_table(&records));
    println!();
    println!("{}", style.message(MessageType::Ok, &scope));
    Ok(())
}

fn handle_search(
    style: &Style,
    config: &Config,
    pattern: Option<String>,
    contains: Option<String>,
    min_points: Option<i64>,
    max_points: Option<i64>,
    lengths: Vec<u32>,
    json: bool,
) -> Result<(), CoreError> {
    let query = SearchQuery {
        pattern,
        contains,
        min_points,
        max_points,
        lengths,
    };

    let store = open_store(config)?;
    let records = store.search(&query)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).unwrap_or_default()
        );
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", style.message(MessageType::Info, "No words matched"));
        return Ok(());
    }

    println!("{}", table::render_words_table(&records));
    println!();
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!("{} words matched", format_thousands(records.len() as u64))
        )
    );
    Ok(())
}

fn handle_show(style: &Style, config: &Config, word: String, json: bool) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let record = store.get_word(&word)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).unwrap_or_default()
        );
        return Ok(());
    }

    println!("{}", style.key_value("Word", &record.word));
    println!("{}", style.key_value("Length", &record.length.to_string()));
    println!("{}", style.key_value("Points", &record.points.to_string()));
    println!(
        "{}",
        style.key_value("Dictionaries", &record.flags.to_string())
    );
    println!(
        "{}",
        style.key_value("Created", &record.created_at.to_rfc3339())
    );
    println!(
        "{}",
        style.key_value("Updated", &record.updated_at.to_rfc3339())
    );
    Ok(())
}

fn handle_stats(
    style: &Style,
    config: &Config,
    length: Option<u32>,
    json: bool,
) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let stats = store.statistics(length)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).unwrap_or_default()
        );
        return Ok(());
    }

    let title = match length {
        Some(len) => format!("STATS (length {len})"),
        None => "STATS".to_string(),
    };
    println!("{}", style.section(&title));
    println!("{}", table::render_stats_table(&stats));
    Ok(())
}

fn handle_lengths(style: &Style, config: &Config, json: bool) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let distribution = store.length_distribution()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&distribution).unwrap_or_default()
        );
        return Ok(());
    }

    if distribution.is_empty() {
        println!("{}", style.message(MessageType::Info, "The store is empty"));
        return Ok(());
    }

    let total: u64 = distribution.values().sum();
    println!("{}", table::render_lengths_table(&distribution));
    println!();
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "{} words across {} lengths",
                format_thousands(total),
                distribution.len()
            )
        )
    );
    Ok(())
}

fn handle_size(style: &Style, config: &Config, json: bool) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let size = store.database_size()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&size).unwrap_or_default());
        return Ok(());
    }

    println!(
        "{}",
        style.key_value("Store", &size.path.display().to_string())
    );
    println!(
        "{}",
        style.key_value("Size", &format!("{} ({} bytes)", size.human, size.bytes))
    );
    Ok(())
}

fn handle_status(
    style: &Style,
    config: &Config,
    legacy: Option<PathBuf>,
    json: bool,
) -> Result<(), CoreError> {
    let store = open_store(config)?;
    let count = store.count()?;
    let size = store.database_size()?;
    let schema_version = store.metadata("schema_version")?;
    let migrated_from = store.metadata("migrated_from")?;
    let migration = match &legacy {
        Some(path) => Some(migration_status(&store, path)?),
        None => None,
    };

    if json {
        let status = serde_json::json!({
            "store": size.path.clone(),
            "words": count,
            "size": size,
            "schemaVersion": schema_version,
            "migratedFrom": migrated_from,
            "migration": migration,
        });
        println!("{}", serde_json::to_string_pretty(&status).unwrap_or_default());
        return Ok(());
    }

    println!("{}", style.section("STATUS"));
    println!(
        "{}",
        style.key_value("Store", &size.path.display().to_string())
    );
    println!("{}", style.key_value("Words", &format_thousands(count)));
    println!("{}", style.key_value("Size", &size.human));
    if let Some(version) = schema_version {
        println!("{}", style.key_value("Schema version", &version));
    }
    if let Some(source) = migrated_from {
        println!("{}", style.key_value("Migrated from", &source));
    }
    if let Some(status) = migration {
        println!("{}", style.key_value("Migration", &status.to_string()));
    }
    Ok(())
}

fn handle_migrate(
    style: &Style,
    config: &Config,
    file: PathBuf,
    batch_size: usize,
    quiet: bool,
    json: bool,
    color_mode: ColorMode,
) -> Result<(), CoreError> {
    let mut store = open_store(config)?;
    let mode = ProgressMode::detect(quiet, json, color_mode);

    let spinner = Progress::spinner(&format!("Migrating {}", file.display()), mode);
    let report = migrate(&mut store, &file, batch_size);
    spinner.finish_clear();
    let report = report?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "Migrated {} legacy records ({} rows affected)",
                format_thousands(report.source_records),
                format_thousands(report.rows_affected)
            )
        )
    );
    println!(
        "{}",
        style.message_detail("Status", &report.status.to_string())
    );
    println!(
        "{}",
        style.message_detail("Backup", &report.backup_path.display().to_string())
    );
    Ok(())
}

fn handle_reindex(
    style: &Style,
    config: &Config,
    quiet: bool,
    color_mode: ColorMode,
) -> Result<(), CoreError> {
    let mut store = open_store(config)?;
    let mode = ProgressMode::detect(quiet, false, color_mode);

    let spinner = Progress::spinner("Rebuilding indexes...", mode);
    let result = store.rebuild_indexes();
    spinner.finish_clear();
    result?;

    println!("{}", style.message(MessageType::Ok, "Indexes rebuilt"));
    Ok(())
}

fn handle_vacuum(
    style: &Style,
    config: &Config,
    quiet: bool,
    color_mode: ColorMode,
) -> Result<(), CoreError> {
    let mut store = open_store(config)?;
    let before = store.database_size()?;
    let mode = ProgressMode::detect(quiet, false, color_mode);

    let spinner = Progress::spinner("Reclaiming space...", mode);
    let result = store.reclaim_space();
    spinner.finish_clear();
    result?;

    let after = store.database_size()?;
    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!("Space reclaimed ({} -> {})", before.human, after.human)
        )
    );
    Ok(())
}
