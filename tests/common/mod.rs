//! Common test utilities for CLI tests.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

/// Write `text` into a temporary `.abnf` file.
pub fn grammar_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".abnf").expect("Failed to create temp file");
    file.write_all(text.as_bytes())
        .expect("Failed to write grammar");
    file
}

/// Run the `abnf-lsp` binary with `args`.
pub fn run_cli(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_abnf-lsp"))
        .args(args)
        .output()
        .expect("Failed to execute abnf-lsp")
}
