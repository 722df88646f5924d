/// Node and token kinds of an ABNF syntax tree.
///
/// Names returned by [`SyntaxKind::as_str`] follow the tree-sitter
/// convention: snake_case for named nodes, the literal spelling for
/// punctuation, and `ERROR` for recovered regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    // Composite nodes
    SourceFile,
    Rule,
    Rulename,
    CoreRulename,
    DefinedAs,
    Elements,
    Alternation,
    Concatenation,
    Repetition,
    Repeat,
    Group,
    Optional,
    Error,

    // Leaves
    Identifier,
    CharVal,
    NumVal,
    ProseVal,
    Comment,
    Number,
    Equals,
    IncrementalEquals,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Star,
    Unknown,

    // Trivia and sentinels, never stored in a tree
    Whitespace,
    Newline,
    Eof,
    Tombstone,
}

impl SyntaxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::SourceFile => "source_file",
            SyntaxKind::Rule => "rule",
            SyntaxKind::Rulename => "rulename",
            SyntaxKind::CoreRulename => "core_rulename",
            SyntaxKind::DefinedAs => "defined_as",
            SyntaxKind::Elements => "elements",
            SyntaxKind::Alternation => "alternation",
            SyntaxKind::Concatenation => "concatenation",
            SyntaxKind::Repetition => "repetition",
            SyntaxKind::Repeat => "repeat",
            SyntaxKind::Group => "group",
            SyntaxKind::Optional => "option",
            SyntaxKind::Error => "ERROR",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::CharVal => "char_val",
            SyntaxKind::NumVal => "num_val",
            SyntaxKind::ProseVal => "prose_val",
            SyntaxKind::Comment => "comment",
            SyntaxKind::Number => "number",
            SyntaxKind::Equals => "=",
            SyntaxKind::IncrementalEquals => "=/",
            SyntaxKind::Slash => "/",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Star => "*",
            SyntaxKind::Unknown => "unknown",
            SyntaxKind::Whitespace => "whitespace",
            SyntaxKind::Newline => "newline",
            SyntaxKind::Eof => "end",
            SyntaxKind::Tombstone => "tombstone",
        }
    }

    /// Whether a node of this kind shows up in [`to_sexp`](crate::SyntaxNode::to_sexp).
    pub fn is_named(self) -> bool {
        !matches!(
            self,
            SyntaxKind::Number
                | SyntaxKind::Equals
                | SyntaxKind::IncrementalEquals
                | SyntaxKind::Slash
                | SyntaxKind::LParen
                | SyntaxKind::RParen
                | SyntaxKind::LBracket
                | SyntaxKind::RBracket
                | SyntaxKind::Star
                | SyntaxKind::Unknown
        )
    }

    /// A name node: the head of a rule or a reference inside a body.
    pub fn is_name(self) -> bool {
        matches!(self, SyntaxKind::Rulename | SyntaxKind::CoreRulename)
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
