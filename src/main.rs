//! ABNF language server entry point.

mod cli;
mod lsp;

use std::path::Path;

use abnf_lsp::AbnfDatabase;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { log_level } => {
            let log = init_tracing(log_level.as_deref());
            if let Err(e) = lsp::serve(log) {
                eprintln!("LSP server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Index { file, tree } => {
            init_tracing(None);
            if let Err(e) = index_file(&file, tree) {
                eprintln!("Error reading {}: {e}", file.display());
                std::process::exit(1);
            }
        }
    }
}

/// Log to stderr, keeping stdout for the protocol. The returned handle can
/// additionally forward events to an LSP client.
fn init_tracing(log_level: Option<&str>) -> lsp::LspLayerHandle {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let (client_layer, handle) = lsp::LspLayer::new();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(client_layer)
        .init();

    handle
}

fn index_file(path: &Path, show_tree: bool) -> std::io::Result<()> {
    let text = std::fs::read_to_string(path)?;
    let document = path.display().to_string();

    let mut db = AbnfDatabase::default();
    let Some(index) = db.upsert(&document, &text) else {
        println!("No syntax tree for {document}");
        return Ok(());
    };

    println!("=== Indexing: {document} ===\n");

    println!("Definitions ({}):", index.definitions().len());
    for definition in index.definitions() {
        let start = index.node(definition.node).start_position();
        println!(
            "  {} at {}:{}",
            definition.name,
            start.row + 1,
            start.column + 1
        );
    }

    println!("\nReferences ({} names):", index.references().len());
    for (name, ids) in index.references() {
        let places: Vec<_> = ids
            .iter()
            .map(|id| {
                let start = index.node(*id).start_position();
                format!("{}:{}", start.row + 1, start.column + 1)
            })
            .collect();
        println!("  {name}: {}", places.join(", "));
    }

    if show_tree {
        println!("\n=== Syntax Tree ===");
        println!("{}", index.tree().root_node().to_sexp());
    }

    if index.tree().root_node().has_error() {
        tracing::warn!(document = %document, "Grammar contains syntax errors");
    }

    Ok(())
}
