use crate::features::Location;
use crate::index::DocumentIndex;

/// Location of the first definition of the rule named at `offset`.
pub fn goto_definition(index: &DocumentIndex, offset: usize) -> Option<Location> {
    let target = index.target_at(offset)?;
    let definition = index.definition_of(target.text())?;
    Some(Location {
        document: definition.document.clone(),
        span: index.node(definition.node).span(),
    })
}

/// Every use of the rule named at `offset`, in encounter order.
///
/// With `include_declaration`, the definition heads come first.
pub fn find_references(
    index: &DocumentIndex,
    offset: usize,
    include_declaration: bool,
) -> Vec<Location> {
    let Some(target) = index.target_at(offset) else {
        return Vec::new();
    };
    let name = target.text();

    let mut locations = Vec::new();
    if include_declaration {
        locations.extend(index.definitions_of(name).map(|definition| Location {
            document: definition.document.clone(),
            span: index.node(definition.node).span(),
        }));
    }
    locations.extend(index.references_of(name).iter().map(|id| Location {
        document: index.document().to_owned(),
        span: index.node(*id).span(),
    }));
    locations
}
