//! Error-tolerant concrete syntax trees for ABNF (RFC 5234, with the RFC 7405
//! `%s`/`%i` string prefixes).
//!
//! The tree mirrors what a tree-sitter grammar would produce: every token is a
//! leaf, whitespace and line breaks are implicit, and malformed input is kept
//! in `ERROR` nodes instead of failing the parse.
//!
//! ```ignore
//! let mut parser = abnf_syntax::Parser::new();
//! let tree = parser.parse("greeting = \"hello\" SP name\r\n");
//! assert_eq!(tree.root_node().child(0).unwrap().kind(), SyntaxKind::Rule);
//! ```

mod grammar;
mod kind;
mod lexer;
mod parser;
mod span;
mod tree;


pub use crate::kind::SyntaxKind;
pub use crate::span::{Point, Span};
pub use crate::tree::{NodeId, SyntaxNode, SyntaxTree};

/// The terminal rules defined in RFC 5234 Appendix B.1.
pub const CORE_RULE_NAMES: [&str; 16] = [
    "ALPHA", "BIT", "CHAR", "CR", "CRLF", "CTL", "DIGIT", "DQUOTE", "HEXDIG", "HTAB", "LF",
    "LWSP", "OCTET", "SP", "VCHAR", "WSP",
];

/// Rule names are case-insensitive, so `alpha` names the same core rule as `ALPHA`.
pub fn is_core_rule_name(name: &str) -> bool {
    CORE_RULE_NAMES
        .iter()
        .any(|core| core.eq_ignore_ascii_case(name))
}

/// Default bound on `(...)`/`[...]` nesting before groups degrade into `ERROR` nodes.
pub const DEFAULT_NESTING_LIMIT: usize = 128;

/// A reusable ABNF parser.
#[derive(Clone, Debug)]
pub struct Parser {
    nesting_limit: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            nesting_limit: DEFAULT_NESTING_LIMIT,
        }
    }

    pub fn set_nesting_limit(&mut self, limit: usize) {
        self.nesting_limit = limit;
    }

    pub fn nesting_limit(&self) -> usize {
        self.nesting_limit
    }

    /// Parse a complete document. Never fails; syntax errors end up in `ERROR` nodes.
    pub fn parse(&mut self, text: &str) -> SyntaxTree {
        let mut p = parser::Parser::new(text, self.nesting_limit);
        grammar::source_file(&mut p);
        p.build_tree()
    }
}
