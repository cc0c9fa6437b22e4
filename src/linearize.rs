//! Linearization resolver
//!
//! Turns the symbolic sequence tables of a concrete grammar into readable
//! strings. Everything here is pure: no knowledge of the derivation tree,
//! and nothing is resolved until a caller asks for a specific function.
//!
//! A sequence is a list of [`Symbol`]s. Each symbol contributes one piece of
//! text and the pieces are joined with a single space:
//!
//! - `Literal("the")` contributes `the`
//! - `CategoryRef(1)` contributes the name of the function's second argument category
//! - `Token(["4", "2"])` contributes `42`

use crate::error::Diagnostic;
use crate::grammar::{ConcreteFunction, ConcreteGrammar};
use log::warn;
use serde_json::Value;

/// One element of a linearization sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// Fixed surface text
    Literal(String),
    /// Positional reference to an argument category of the owning function
    CategoryRef(usize),
    /// Opaque token data, rendered as concatenated text
    Token(Vec<Value>),
}

/// An ordered list of symbols
pub type Sequence = Vec<Symbol>;

/// All sequences of a concrete grammar, indexed by linearization index
pub type SequenceTable = Vec<Sequence>;

/// Resolve a sequence against the argument category names of its function
///
/// Out-of-range category references render as `{slot}` instead of failing.
pub fn resolve_sequence(sequence: &[Symbol], argument_categories: &[String]) -> String {
    resolve_sequence_checked(sequence, argument_categories).0
}

/// Like [`resolve_sequence`] but also returns what went wrong along the way
pub fn resolve_sequence_checked(
    sequence: &[Symbol],
    argument_categories: &[String],
) -> (String, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let parts: Vec<String> = sequence
        .iter()
        .map(|symbol| match symbol {
            Symbol::Literal(text) => text.clone(),
            Symbol::CategoryRef(slot) => match argument_categories.get(*slot) {
                Some(name) => name.clone(),
                None => {
                    warn!(
                        "category reference {} out of range ({} argument(s))",
                        slot,
                        argument_categories.len()
                    );
                    diagnostics.push(Diagnostic::OutOfRangeSlot {
                        slot: *slot,
                        arity: argument_categories.len(),
                    });
                    format!("{{{}}}", slot)
                }
            },
            Symbol::Token(values) => values.iter().map(token_text).collect(),
        })
        .collect();

    (parts.join(" "), diagnostics)
}

/// Resolve every linearization record of a concrete function, in order
///
/// Indices that fall outside the sequence table resolve to an empty string.
/// Out-of-range category references found in any record are returned
/// alongside the strings, once each.
pub fn resolve_function_linearizations(
    function: &ConcreteFunction,
    table: &[Sequence],
    argument_categories: &[String],
) -> (Vec<String>, Vec<Diagnostic>) {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let linearizations = function
        .linearization_indices
        .iter()
        .map(|&index| match table.get(index) {
            Some(sequence) => {
                let (text, found) = resolve_sequence_checked(sequence, argument_categories);
                for diagnostic in found {
                    if !diagnostics.contains(&diagnostic) {
                        diagnostics.push(diagnostic);
                    }
                }
                text
            }
            None => {
                warn!(
                    "function '{}' points at missing sequence {}",
                    function.name, index
                );
                String::new()
            }
        })
        .collect();
    (linearizations, diagnostics)
}

/// Resolve a function of `concrete` by name, or `None` when it isn't there
pub fn linearize_function(
    concrete: &ConcreteGrammar,
    name: &str,
    argument_categories: &[String],
) -> Option<(Vec<String>, Vec<Diagnostic>)> {
    let function = concrete.function_by_name(name)?;
    Some(resolve_function_linearizations(
        function,
        concrete.sequences(),
        argument_categories,
    ))
}

/// Collapse several linearizations into a single display label
///
/// Repeated strings (common when records differ only in inherent features)
/// are shown once.
pub fn display_label(linearizations: &[String], separator: &str) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for lin in linearizations {
        if !distinct.contains(&lin.as_str()) {
            distinct.push(lin);
        }
    }
    distinct.join(separator)
}

fn token_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
