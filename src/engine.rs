//! Boundary to the grammar engine that turns text into a syntax tree.

use abnf_syntax::SyntaxTree;

/// Something that can parse ABNF text into a concrete syntax tree.
///
/// Malformed grammars still produce a tree with `ERROR` nodes. `None` is
/// reserved for the engine itself failing, in which case the document has
/// no index until the next successful parse.
pub trait GrammarEngine {
    fn parse(&mut self, text: &str) -> Option<SyntaxTree>;
}

impl GrammarEngine for abnf_syntax::Parser {
    fn parse(&mut self, text: &str) -> Option<SyntaxTree> {
        Some(abnf_syntax::Parser::parse(self, text))
    }
}
