use abnf_syntax::{Span, SyntaxKind};

use crate::builtins::{CoreRule, core_rule};
use crate::index::DocumentIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverInfo {
    /// The name the cursor is on.
    pub span: Span,
    pub content: HoverContent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoverContent {
    CoreRule(&'static CoreRule),
    Rule {
        name: String,
        /// Body of the defining production, verbatim. Empty when the rule has none.
        body: String,
        references: usize,
    },
}

/// Documentation for the name at `offset`.
///
/// Core rules always describe themselves, even when the document redefines
/// them. User rules show their first definition.
pub fn hover(index: &DocumentIndex, offset: usize) -> Option<HoverInfo> {
    let target = index.target_at(offset)?;
    let name = target.text();

    let content = if let Some(core) = core_rule(name) {
        HoverContent::CoreRule(core)
    } else {
        let definition = index.definition_of(name)?;
        let body = index
            .node(definition.node)
            .parent()
            .and_then(|rule| {
                rule.children()
                    .find(|child| child.kind() == SyntaxKind::Elements)
            })
            .map(|elements| elements.text().trim().to_owned())
            .unwrap_or_default();
        HoverContent::Rule {
            name: definition.name.clone(),
            body,
            references: index.references_of(name).len(),
        }
    };

    Some(HoverInfo {
        span: target.span(),
        content,
    })
}
