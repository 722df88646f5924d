use crate::kind::SyntaxKind;
use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: SyntaxKind,
    pub(crate) span: Span,
    /// The token begins in column 0. In ABNF this marks the start of a new rule.
    pub(crate) line_start: bool,
}

pub(crate) struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Consume up to and including `close` on the current line.
    /// Returns false when the line (or input) ends first.
    fn eat_delimited(&mut self, close: char) -> bool {
        while let Some(c) = self.peek() {
            if matches!(c, '\n' | '\r') {
                return false;
            }
            self.pos += c.len_utf8();
            if c == close {
                return true;
            }
        }
        false
    }

    pub(crate) fn next_token(&mut self) -> Token {
        let start = self.pos;
        let line_start = start == 0 || matches!(self.text.as_bytes()[start - 1], b'\n' | b'\r');

        let Some(c) = self.bump() else {
            return Token {
                kind: SyntaxKind::Eof,
                span: Span::empty(start),
                line_start,
            };
        };

        let kind = match c {
            ' ' | '\t' => {
                self.eat_while(|c| matches!(c, ' ' | '\t'));
                SyntaxKind::Whitespace
            }
            // CRLF, LF and a lone CR all end a line.
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
                SyntaxKind::Newline
            }
            '\n' => SyntaxKind::Newline,
            ';' => {
                self.eat_while(|c| !matches!(c, '\n' | '\r'));
                SyntaxKind::Comment
            }
            c if c.is_ascii_alphabetic() => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '-');
                SyntaxKind::Identifier
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_digit());
                SyntaxKind::Number
            }
            '=' => {
                if self.peek() == Some('/') {
                    self.bump();
                    SyntaxKind::IncrementalEquals
                } else {
                    SyntaxKind::Equals
                }
            }
            '/' => SyntaxKind::Slash,
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            '*' => SyntaxKind::Star,
            '"' => self.quoted(),
            '<' => {
                if self.eat_delimited('>') {
                    SyntaxKind::ProseVal
                } else {
                    SyntaxKind::Unknown
                }
            }
            '%' => self.percent(),
            _ => SyntaxKind::Unknown,
        };

        Token {
            kind,
            span: Span::new(start, self.pos),
            line_start,
        }
    }

    fn quoted(&mut self) -> SyntaxKind {
        if self.eat_delimited('"') {
            SyntaxKind::CharVal
        } else {
            SyntaxKind::Unknown
        }
    }

    /// After `%`: a case-sensitivity prefixed string (RFC 7405) or a numeric value.
    fn percent(&mut self) -> SyntaxKind {
        match (self.peek(), self.peek_nth(1)) {
            (Some('s' | 'S' | 'i' | 'I'), Some('"')) => {
                self.bump();
                self.bump();
                self.quoted()
            }
            (Some('b' | 'B' | 'd' | 'D' | 'x' | 'X'), Some(next)) if next.is_ascii_alphanumeric() => {
                self.bump();
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
                SyntaxKind::NumVal
            }
            _ => SyntaxKind::Unknown,
        }
    }
}
