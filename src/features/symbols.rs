use abnf_syntax::Span;

use crate::index::DocumentIndex;

/// One outline entry per rule definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSymbol {
    pub name: String,
    /// The whole production.
    pub range: Span,
    /// Just the head name.
    pub selection_range: Span,
}

pub fn document_symbols(index: &DocumentIndex) -> Vec<RuleSymbol> {
    index
        .definitions()
        .iter()
        .map(|definition| {
            let head = index.node(definition.node);
            let range = head.parent().map_or(head.span(), |rule| rule.span());
            RuleSymbol {
                name: definition.name.clone(),
                range,
                selection_range: head.span(),
            }
        })
        .collect()
}
