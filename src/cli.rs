//! Command-line interface for the ABNF language server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "abnf-lsp")]
#[command(about = "Language server for ABNF (RFC 5234) grammars", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Language Server Protocol (LSP) server on stdio
    #[command(alias = "lsp")]
    Serve {
        /// Log filter, e.g. `debug` or `abnf_lsp=trace`; overrides RUST_LOG
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Print the rule definitions and references found in a grammar file
    Index {
        file: PathBuf,
        /// Also print the concrete syntax tree
        #[arg(long)]
        tree: bool,
    },
}
