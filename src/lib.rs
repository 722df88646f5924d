//! Language services for ABNF (RFC 5234) grammars.
//!
//! A document is parsed by a [`GrammarEngine`], its rule names are split into
//! definitions and references by [`index::index`], and the result is cached
//! per document in an [`AbnfDatabase`]. The [`features`] module answers editor
//! queries from a cached [`DocumentIndex`].

pub mod builtins;
pub mod database;
pub mod engine;
pub mod features;
pub mod index;
pub mod resolve;

pub use crate::database::AbnfDatabase;
pub use crate::engine::GrammarEngine;
pub use crate::index::{DocumentIndex, RuleDefinition};
