//! Recursive descent over the RFC 5234 rule list grammar.
//!
//! ```text
//! rulelist      = 1*( rule / (*c-wsp c-nl) )
//! rule          = rulename defined-as elements c-nl
//! elements      = alternation *c-wsp
//! alternation   = concatenation *(*c-wsp "/" *c-wsp concatenation)
//! concatenation = repetition *(1*c-wsp repetition)
//! repetition    = [repeat] element
//! element       = rulename / group / option / char-val / num-val / prose-val
//! ```

use crate::is_core_rule_name;
use crate::kind::SyntaxKind::{self, *};
use crate::parser::Parser;

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();
    loop {
        let token = p.current();
        match token.kind {
            Eof => break,
            Identifier if token.line_start => rule(p),
            _ => junk_line(p),
        }
    }
    p.flush_trivia();
    m.complete(p, SourceFile);
}

/// Anything that does not start with a rule name in column 0, up to the next such line.
fn junk_line(p: &mut Parser<'_>) {
    let m = p.start();
    loop {
        if p.current().kind == Identifier {
            name(p);
        } else {
            p.bump();
        }
        if p.at(Eof) {
            break;
        }
    }
    m.complete(p, Error);
}

fn rule(p: &mut Parser<'_>) {
    let m = p.start();
    name(p);
    if p.at(Equals) || p.at(IncrementalEquals) {
        let defined_as = p.start();
        p.bump();
        defined_as.complete(p, DefinedAs);
    }
    elements(p);
    m.complete(p, Rule);
}

fn name(p: &mut Parser<'_>) {
    let kind = if is_core_rule_name(p.current_text()) {
        CoreRulename
    } else {
        Rulename
    };
    let m = p.start();
    p.bump();
    m.complete(p, kind);
}

fn elements(p: &mut Parser<'_>) {
    let m = p.start();
    loop {
        alternation(p);
        if p.at(Eof) {
            break;
        }
        let stray = p.start();
        p.bump();
        stray.complete(p, Error);
    }
    m.complete(p, Elements);
}

fn alternation(p: &mut Parser<'_>) {
    let m = p.start();
    concatenation(p);
    if !p.at(Slash) {
        m.abandon(p);
        return;
    }
    while p.at(Slash) {
        p.bump();
        concatenation(p);
    }
    m.complete(p, Alternation);
}

fn concatenation(p: &mut Parser<'_>) {
    let m = p.start();
    let mut count = 0;
    while starts_element(p.peek()) {
        repetition(p);
        count += 1;
    }
    if count >= 2 {
        m.complete(p, Concatenation);
    } else {
        m.abandon(p);
    }
}

fn starts_element(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        Identifier | LParen | LBracket | CharVal | NumVal | ProseVal | Number | Star
    )
}

fn repetition(p: &mut Parser<'_>) {
    if !p.at(Number) && !p.at(Star) {
        element(p);
        return;
    }

    let m = p.start();
    let repeat = p.start();
    if p.at(Number) {
        p.bump();
    }
    if p.at(Star) {
        p.bump();
        if p.at(Number) {
            p.bump();
        }
    }
    repeat.complete(p, Repeat);
    element(p);
    m.complete(p, Repetition);
}

fn element(p: &mut Parser<'_>) {
    match p.peek() {
        Identifier => name(p),
        LParen => group(p, Group, RParen),
        LBracket => group(p, Optional, RBracket),
        CharVal | NumVal | ProseVal => p.bump(),
        _ => {}
    }
}

fn group(p: &mut Parser<'_>, kind: SyntaxKind, close: SyntaxKind) {
    let m = p.start();
    p.bump();
    if p.depth >= p.nesting_limit {
        m.complete(p, Error);
        return;
    }

    p.depth += 1;
    alternation(p);
    p.depth -= 1;

    if p.at(close) {
        p.bump();
    }
    m.complete(p, kind);
}
