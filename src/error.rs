//! Error types for grammar loading and tree interaction
//!
//! Fatal conditions are `Err` values ([`GrammarError`], [`SelectError`]).
//! Recoverable conditions found while loading, building or resolving are
//! carried as [`Diagnostic`] values next to the result, so nothing is lost
//! but nothing aborts either.

use crate::derivation::NodeId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading a grammar document
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The document is structurally unusable (missing `abstract`, wrong field types, ...)
    #[error("Malformed grammar: {reason}")]
    MalformedGrammar { reason: String },

    /// The text is not valid JSON
    #[error("Malformed grammar: invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The grammar file could not be read
    #[error("Cannot read grammar file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GrammarError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GrammarError::MalformedGrammar {
            reason: reason.into(),
        }
    }

    /// Whether this error means the document itself is malformed
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            GrammarError::MalformedGrammar { .. } | GrammarError::Json(_)
        )
    }
}

/// Errors reported by interactive operations on a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The chosen function is absent from the active concrete grammar
    #[error("No function '{function}' in concrete grammar '{language}'")]
    NoSuchFunction { function: String, language: String },

    /// The node reference does not belong to the current tree
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// Display mode refers to a concrete grammar that was not loaded
    #[error("No concrete grammar '{0}'")]
    NoConcreteGrammar(String),
}

/// Non-fatal conditions collected during load, build and resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A category is referenced but no function produces it; it renders as a leaf
    UnknownCategory { category: String },
    /// A category reference points past the function's argument list
    OutOfRangeSlot { slot: usize, arity: usize },
    /// A sequence symbol with a tag we don't interpret; rendered as a token
    UnknownSymbol { tag: String },
    /// A concrete production with no function id (a coercion); left out of alternatives
    ProductionWithoutFunction { category: String, tag: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownCategory { category } => {
                write!(f, "category '{category}' has no functions")
            }
            Diagnostic::OutOfRangeSlot { slot, arity } => {
                write!(f, "slot {slot} out of range for {arity} argument(s)")
            }
            Diagnostic::UnknownSymbol { tag } => write!(f, "unknown symbol type '{tag}'"),
            Diagnostic::ProductionWithoutFunction { category, tag } => {
                write!(f, "'{tag}' production of '{category}' has no function id")
            }
        }
    }
}
