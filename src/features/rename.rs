use abnf_syntax::Span;

use crate::builtins::is_core_rule;
use crate::index::DocumentIndex;

/// Replace the text at `span` with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameEdit {
    pub span: Span,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidRuleName {
    #[display("Rule name is empty")]
    Empty,
    #[display("Rule name must start with a letter, found {found:?}")]
    LeadingCharacter { found: char },
    #[display("Rule name may only contain letters, digits and '-', found {found:?}")]
    Character { found: char },
    #[display("{name} is a core rule")]
    CoreRule { name: String },
}

/// Check `name` against `rulename = ALPHA *(ALPHA / DIGIT / "-")`.
pub fn validate_rule_name(name: &str) -> Result<(), InvalidRuleName> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(InvalidRuleName::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(InvalidRuleName::LeadingCharacter { found: first });
    }
    if let Some(found) = chars.find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(InvalidRuleName::Character { found });
    }
    if is_core_rule(name) {
        return Err(InvalidRuleName::CoreRule {
            name: name.to_owned(),
        });
    }
    Ok(())
}

/// Span and current spelling of a renamable name at `offset`.
///
/// Only rules defined in the document can be renamed; core rules and
/// undefined names cannot.
pub fn prepare_rename(index: &DocumentIndex, offset: usize) -> Option<(Span, String)> {
    let target = index.target_at(offset)?;
    index.definition_of(target.text())?;
    Some((target.span(), target.text().to_owned()))
}

/// Edits renaming every definition head and reference of the rule at `offset`.
///
/// Returns `Ok(None)` when there is nothing renamable under the cursor.
pub fn rename(
    index: &DocumentIndex,
    offset: usize,
    new_name: &str,
) -> Result<Option<Vec<RenameEdit>>, InvalidRuleName> {
    validate_rule_name(new_name)?;

    let Some(target) = index.target_at(offset) else {
        return Ok(None);
    };
    let name = target.text();
    if index.definition_of(name).is_none() {
        return Ok(None);
    }

    let heads = index.definitions_of(name).map(|definition| definition.node);
    let mut spans: Vec<Span> = heads
        .chain(index.references_of(name).iter().copied())
        .map(|id| index.node(id).span())
        .collect();
    spans.sort();

    Ok(Some(
        spans
            .into_iter()
            .map(|span| RenameEdit {
                span,
                new_text: new_name.to_owned(),
            })
            .collect(),
    ))
}
