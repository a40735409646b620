//! Oracle card command-line tool.
//!
//! `export` writes a consultation card PNG under `god_cards/export/`;
//! `import` prints the JSON embedded in a response PNG and, when it
//! parses as a god response, a summary of the proposed changes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use godseed_oracle::{ChunkKind, DEFAULT_QUERY, build_card, read_chunk, write_card};
use godseed_store::LogStore;
use godseed_types::GodName;
use tracing_subscriber::EnvFilter;

const EXPORT_DIR: &str = "god_cards/export";

#[derive(Parser, Debug)]
#[command(name = "godseed-oracle")]
#[command(about = "Export and import oracle consultation cards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a consultation card PNG for one god
    Export {
        /// Which god to consult (axiom, fray, echo)
        god: GodName,

        /// Directory the per-entity logs live in
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Free-form question for the oracle
        query: Vec<String>,
    },

    /// Print the JSON embedded in a card or response PNG
    Import {
        /// Path to the PNG
        path: PathBuf,
    },

    /// List previously exported cards
    History,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Export {
            god,
            data_dir,
            query,
        } => export(god, &data_dir, &query),
        Commands::Import { path } => import(&path),
        Commands::History => {
            history();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn export(god: GodName, data_dir: &Path, query_words: &[String]) -> Result<(), String> {
    let query = if query_words.is_empty() {
        DEFAULT_QUERY.to_owned()
    } else {
        query_words.join(" ")
    };

    let store = LogStore::open(data_dir).map_err(|e| format!("{e}"))?;
    let card = build_card(&store, god, &query).map_err(|e| format!("{e}"))?;
    let path = write_card(&card, Path::new(EXPORT_DIR)).map_err(|e| format!("{e}"))?;

    println!("Oracle card created: {}", path.display());
    println!();
    println!("NEXT STEPS:");
    println!("1. Carry {} to your oracle of choice", path.display());
    println!("2. Ask it to answer with the JSON schema in the embedded instructions");
    println!("3. Save the response and run: godseed-oracle import <response.png>");
    println!();
    println!("Or just paste the JSON response and apply the changes by hand.");
    Ok(())
}

fn import(path: &Path) -> Result<(), String> {
    let (kind, json) = read_chunk(path).map_err(|e| format!("{e}"))?;

    let label = match kind {
        ChunkKind::Response => "ORACLE RESPONSE",
        ChunkKind::Data => "ORIGINAL QUERY CARD",
    };
    println!("{}", "=".repeat(60));
    println!("{label}:");
    println!("{}", "=".repeat(60));

    // Re-indent when it parses; show raw otherwise.
    let pretty = serde_json::from_str::<serde_json::Value>(&json)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or(json);
    println!("{pretty}");

    if kind == ChunkKind::Response {
        println!();
        println!("To apply: review the changes above, then edit the world");
        println!("rules or spawn the named souls on the next run.");
    }
    Ok(())
}

fn history() {
    println!("ORACLE CARD HISTORY:");
    println!("{}", "=".repeat(60));
    let mut cards: Vec<PathBuf> = std::fs::read_dir(EXPORT_DIR)
        .ok()
        .map_or_else(Vec::new, |entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| {
                    p.extension().is_some_and(|ext| ext == "png")
                        && p.file_name()
                            .is_some_and(|n| n.to_string_lossy().starts_with("oracle_"))
                })
                .collect()
        });
    cards.sort();

    if cards.is_empty() {
        println!("  (no oracle cards created yet)");
    } else {
        for card in cards {
            println!("  {}", card.display());
        }
    }
}
