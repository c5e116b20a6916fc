//! Command-line surface for the per-user memory store.
//!
//! Maps one subcommand to each store operation and renders results as plain
//! text, including the export format with human-readable timestamps.

use anyhow::Result;
use camino::Utf8PathBuf;
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use recall_store::{Memory, MemoryStore, StoreConfig};

#[derive(Parser)]
#[command(name = "recall", version, about = "Per-user memory store for chat agents")]
struct Cli {
    /// Directory holding per-user memory documents
    #[arg(long, global = true)]
    data_dir: Option<Utf8PathBuf>,

    /// Maximum memories kept per user
    #[arg(long, global = true, default_value_t = 100)]
    max_memories: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new memory for a user
    Add {
        user: String,
        content: String,
        /// Importance rank; higher survives eviction longer
        #[arg(long, default_value_t = 2)]
        importance: i32,
        /// Validity window in seconds
        #[arg(long, default_value_t = 86_400)]
        valid_secs: i64,
    },
    /// Search a user's memories by keyword
    Search { user: String, keyword: String },
    /// Replace a memory's content and importance
    Update {
        user: String,
        id: u64,
        content: String,
        #[arg(long, default_value_t = 2)]
        importance: i32,
    },
    /// Delete a memory by id
    Delete { user: String, id: u64 },
    /// Export a user's memories, optionally filtered by keyword
    Export {
        user: String,
        keyword: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::default();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.max_memories = cli.max_memories;
    let store = MemoryStore::new(config);

    match cli.command {
        Command::Add {
            user,
            content,
            importance,
            valid_secs,
        } => {
            let id = store.create(&user, &content, importance, valid_secs)?;
            println!(
                "memory added, id: {id}, content: {content}, importance: {importance}, valid for {valid_secs}s"
            );
        }
        Command::Search { user, keyword } => {
            let hits = store.search(&user, &keyword)?;
            if hits.is_empty() {
                println!("no matching memories");
            } else {
                println!("found matching memories:");
                for hit in hits {
                    println!(
                        "ID: {}, score: {:.2}, content: {}, importance: {}",
                        hit.id, hit.score, hit.content, hit.importance
                    );
                }
            }
        }
        Command::Update {
            user,
            id,
            content,
            importance,
        } => {
            if store.update(&user, id, &content, importance)? {
                println!("memory updated, id: {id}, content: {content}, importance: {importance}");
            } else {
                println!("no memory with id {id}");
            }
        }
        Command::Delete { user, id } => {
            if store.delete(&user, id)? {
                println!("memory deleted, id: {id}");
            } else {
                println!("no memory with id {id}");
            }
        }
        Command::Export { user, keyword } => {
            let memories = store.list(&user, keyword.as_deref())?;
            for line in export_lines(&user, keyword.as_deref(), &memories) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Render the export as one line per record, with a header describing the
/// selection.
fn export_lines(user: &str, keyword: Option<&str>, memories: &[Memory]) -> Vec<String> {
    if memories.is_empty() {
        return match keyword {
            Some(keyword) => vec![format!("no memories matching '{keyword}'")],
            None => vec!["no memories yet".to_string()],
        };
    }

    let mut lines = vec![match keyword {
        Some(keyword) => format!("memories for {user} matching '{keyword}':"),
        None => format!("all memories for {user}:"),
    }];

    for memory in memories {
        lines.push(format!(
            "ID: {}, time: {}, content: {}, importance: {}",
            memory.id,
            format_timestamp(memory.created_at),
            memory.content,
            memory.importance
        ));
    }

    lines
}

/// Epoch seconds as local `YYYY-MM-DD HH:MM:SS`.
fn format_timestamp(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => secs.to_string(),
    }
}
