//! Editor features answered from a [`DocumentIndex`](crate::index::DocumentIndex).
//!
//! Each handler takes a byte offset into the indexed text. "Nothing here" is
//! an empty answer, never an error.

mod completion;
mod hover;
mod navigation;
mod rename;
mod symbols;

pub use completion::{CompletionEntry, CompletionKind, completions};
pub use hover::{HoverContent, HoverInfo, hover};
pub use navigation::{find_references, goto_definition};
pub use rename::{InvalidRuleName, RenameEdit, prepare_rename, rename, validate_rule_name};
pub use symbols::{RuleSymbol, document_symbols};

use abnf_syntax::Span;

/// A span inside a particular document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub document: String,
    pub span: Span,
}
