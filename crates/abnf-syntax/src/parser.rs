use drop_bomb::DropBomb;

use crate::kind::SyntaxKind;
use crate::lexer::{Lexer, Token};
use crate::span::Span;
use crate::tree::{SyntaxTree, TreeBuilder};

pub(crate) struct Parser<'t> {
    text: &'t str,
    /// Significant tokens and comments; whitespace and line breaks are dropped.
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    pub(crate) depth: usize,
    pub(crate) nesting_limit: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str, nesting_limit: usize) -> Self {
        let mut lexer = Lexer::new(text);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            match token.kind {
                SyntaxKind::Whitespace | SyntaxKind::Newline => {}
                SyntaxKind::Eof => {
                    tokens.push(token);
                    break;
                }
                _ => tokens.push(token),
            }
        }

        Self {
            text,
            tokens,
            pos: 0,
            events: Vec::new(),
            depth: 0,
            nesting_limit,
        }
    }

    fn skip_comments(&self) -> usize {
        let mut pos = self.pos;
        while self.tokens[pos].kind == SyntaxKind::Comment {
            pos += 1;
        }
        pos
    }

    /// The next significant token, regardless of rule boundaries.
    pub(crate) fn current(&self) -> Token {
        self.tokens[self.skip_comments()]
    }

    pub(crate) fn current_text(&self) -> &'t str {
        let span = self.current().span;
        &self.text[span.start..span.end]
    }

    /// Kind of the next token within the current rule.
    ///
    /// A token in column 0 starts the next rule, so it reads as end of input here.
    pub(crate) fn peek(&self) -> SyntaxKind {
        let token = self.current();
        if token.line_start {
            SyntaxKind::Eof
        } else {
            token.kind
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    /// Emit pending comments into whichever node is currently open.
    pub(crate) fn flush_trivia(&mut self) {
        while self.tokens[self.pos].kind == SyntaxKind::Comment {
            let Token { kind, span, .. } = self.tokens[self.pos];
            self.events.push(Event::Token { kind, span });
            self.pos += 1;
        }
    }

    pub(crate) fn bump(&mut self) {
        self.flush_trivia();
        let Token { kind, span, .. } = self.tokens[self.pos];
        if kind == SyntaxKind::Eof {
            return;
        }
        self.events.push(Event::Token { kind, span });
        self.pos += 1;
    }

    pub(crate) fn start(&mut self) -> Marker {
        // The root has no parent to receive leading comments yet.
        if !self.events.is_empty() {
            self.flush_trivia();
        }
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn build_tree(self) -> SyntaxTree {
        let mut builder = TreeBuilder::new(self.text);
        for event in self.events {
            match event {
                Event::Start {
                    kind: SyntaxKind::Tombstone,
                } => {}
                Event::Start { kind } => builder.start_node(kind),
                Event::Token { kind, span } => builder.token(kind, span),
                Event::Finish => builder.finish_node(),
            }
        }
        builder.finish()
    }
}

enum Event {
    Start { kind: SyntaxKind },
    Token { kind: SyntaxKind, span: Span },
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start {
        kind: SyntaxKind::Tombstone,
    };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(position: u32) -> Marker {
        Marker {
            position,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) {
        self.bomb.defuse();

        if let Event::Start { kind: slot } = &mut p.events[self.position as usize] {
            *slot = kind;
        }

        p.events.push(Event::Finish);
    }

    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();

        if self.position as usize == p.events.len() - 1 {
            p.events.pop();
        }
    }
}
