use std::collections::HashSet;

use crate::builtins::CORE_RULES;
use crate::index::{DocumentIndex, name_key};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    Rule,
    CoreRule,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionEntry {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: &'static str,
    pub documentation: Option<&'static str>,
}

/// Every rule defined in the document followed by every core rule.
///
/// The cursor context is not considered; the editor filters by prefix.
pub fn completions(index: &DocumentIndex) -> Vec<CompletionEntry> {
    let mut seen = HashSet::new();
    let rules = index
        .definitions()
        .iter()
        .filter(|definition| seen.insert(name_key(&definition.name)))
        .map(|definition| CompletionEntry {
            label: definition.name.clone(),
            kind: CompletionKind::Rule,
            detail: "ABNF rule",
            documentation: None,
        });

    let core = CORE_RULES.iter().map(|rule| CompletionEntry {
        label: rule.name.to_owned(),
        kind: CompletionKind::CoreRule,
        detail: "Core rule (RFC 5234)",
        documentation: Some(rule.description),
    });

    rules.chain(core).collect()
}
