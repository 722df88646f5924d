//! Classification of rule names into definitions and references.

use std::collections::BTreeMap;

use abnf_syntax::{NodeId, SyntaxKind, SyntaxNode, SyntaxTree};
use ropey::Rope;

use crate::builtins::is_core_rule;
use crate::resolve;

/// Key under which a rule name is stored. ABNF rule names are case-insensitive.
pub fn name_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// A name node in head position of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDefinition {
    /// Spelling as written at this definition.
    pub name: String,
    pub node: NodeId,
    pub document: String,
}

/// Everything known about one parsed document.
///
/// The tree is never mutated. An edit produces a whole new index.
pub struct DocumentIndex {
    document: String,
    text: Rope,
    tree: SyntaxTree,
    definitions: Vec<RuleDefinition>,
    /// Positions in `definitions`, keyed by lower-cased name.
    definitions_by_name: BTreeMap<String, Vec<usize>>,
    references: BTreeMap<String, Vec<NodeId>>,
}

/// Walk `tree` once and record every definition and reference it contains.
pub fn index(tree: SyntaxTree, document: impl Into<String>) -> DocumentIndex {
    let document = document.into();
    let mut collector = Collector {
        document: &document,
        definitions: Vec::new(),
        definitions_by_name: BTreeMap::new(),
        references: BTreeMap::new(),
    };
    collector.visit(tree.root_node());

    let Collector {
        definitions,
        definitions_by_name,
        references,
        ..
    } = collector;

    DocumentIndex {
        text: Rope::from_str(tree.source()),
        document,
        tree,
        definitions,
        definitions_by_name,
        references,
    }
}

struct Collector<'a> {
    document: &'a str,
    definitions: Vec<RuleDefinition>,
    definitions_by_name: BTreeMap<String, Vec<usize>>,
    references: BTreeMap<String, Vec<NodeId>>,
}

impl Collector<'_> {
    fn visit(&mut self, node: SyntaxNode<'_>) {
        if node.kind() == SyntaxKind::Rule {
            for head in node.children().filter(|child| child.kind().is_name()) {
                if is_core_rule(head.text()) {
                    continue;
                }
                self.definitions_by_name
                    .entry(name_key(head.text()))
                    .or_default()
                    .push(self.definitions.len());
                self.definitions.push(RuleDefinition {
                    name: head.text().to_owned(),
                    node: head.id(),
                    document: self.document.to_owned(),
                });
            }
        }

        if node.kind().is_name() && !is_head(node) {
            self.references
                .entry(name_key(node.text()))
                .or_default()
                .push(node.id());
        }

        for child in node.children() {
            self.visit(child);
        }
    }
}

fn is_head(node: SyntaxNode<'_>) -> bool {
    node.parent()
        .is_some_and(|parent| parent.kind() == SyntaxKind::Rule)
}

impl DocumentIndex {
    pub fn document(&self) -> &str {
        &self.document
    }

    /// The indexed text, for converting editor positions.
    pub fn text(&self) -> &Rope {
        &self.text
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        self.tree.node(id)
    }

    /// All definitions in source order, duplicates included.
    pub fn definitions(&self) -> &[RuleDefinition] {
        &self.definitions
    }

    /// All referencing name nodes, keyed by lower-cased name.
    pub fn references(&self) -> &BTreeMap<String, Vec<NodeId>> {
        &self.references
    }

    pub fn definitions_of<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a RuleDefinition> + use<'a> {
        self.definitions_by_name
            .get(&name_key(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&position| &self.definitions[position])
    }

    /// The first definition of `name`, which lookups resolve to.
    pub fn definition_of(&self, name: &str) -> Option<&RuleDefinition> {
        self.definitions_of(name).next()
    }

    pub fn references_of(&self, name: &str) -> &[NodeId] {
        self.references
            .get(&name_key(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The name node under the byte `offset`, if any.
    pub fn target_at(&self, offset: usize) -> Option<SyntaxNode<'_>> {
        resolve::target_at(&self.tree, offset)
    }
}

impl std::fmt::Debug for DocumentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("document", &self.document)
            .field("definitions", &self.definitions)
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}
