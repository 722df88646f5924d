//! Per-document cache of parsed and indexed grammars.

use std::collections::HashMap;

use crate::engine::GrammarEngine;
use crate::index::{DocumentIndex, index};

/// Owns the grammar engine and the latest index of every open document.
///
/// Entries are replaced wholesale. A reader sees either the previous index
/// or the new one, never a mix.
pub struct AbnfDatabase<E = abnf_syntax::Parser> {
    engine: E,
    documents: HashMap<String, DocumentIndex>,
}

impl Default for AbnfDatabase {
    fn default() -> Self {
        Self::new(abnf_syntax::Parser::new())
    }
}

impl<E: GrammarEngine> AbnfDatabase<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            documents: HashMap::new(),
        }
    }

    /// Parse and index `text`, replacing any previous entry for `document`.
    ///
    /// When the engine fails the old entry is dropped as well, so queries
    /// answer nothing until the next successful parse.
    pub fn upsert(&mut self, document: &str, text: &str) -> Option<&DocumentIndex> {
        let Some(tree) = self.engine.parse(text) else {
            tracing::warn!(document, "Grammar engine produced no tree");
            self.documents.remove(document);
            return None;
        };

        let index = index(tree, document);
        tracing::debug!(
            document,
            definitions = index.definitions().len(),
            referenced_names = index.references().len(),
            "Indexed document"
        );

        // The previous entry is released only once the new one is in place.
        let previous = self.documents.insert(document.to_owned(), index);
        drop(previous);
        self.documents.get(document)
    }

    pub fn get(&self, document: &str) -> Option<&DocumentIndex> {
        self.documents.get(document)
    }

    pub fn invalidate(&mut self, document: &str) {
        if self.documents.remove(document).is_some() {
            tracing::debug!(document, "Dropped document index");
        }
    }

    pub fn dispose_all(&mut self) {
        tracing::debug!(count = self.documents.len(), "Dropping all document indexes");
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
