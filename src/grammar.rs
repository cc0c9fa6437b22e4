//! Grammar model
//!
//! An immutable, validated view of one loaded grammar document: an abstract
//! grammar plus zero or more concrete grammars.
//!
//! The raw document is JSON of this shape:
//!
//! ```text
//! {
//!   "abstract":  { "name": .., "startcat": .., "funs": { Name: { "args": [..], "cat": .. } } },
//!   "concretes": { Id: { "flags": { "language": .. }, "productions": {..},
//!                        "functions": [..], "sequences": [..], "categories": {..},
//!                        "totalfids": .. } }
//! }
//! ```
//!
//! [`Grammar::from_value`] is the only place that looks at raw JSON. Anything
//! structurally wrong is rejected there with [`GrammarError::MalformedGrammar`];
//! code past this point can rely on the typed model.

pub mod abstract_syntax;
pub mod concrete;

pub use abstract_syntax::{AbstractGrammar, Function};
pub use concrete::{CategoryRange, ConcreteFunction, ConcreteGrammar, Production};

use crate::error::{Diagnostic, GrammarError};
use crate::linearize::{Sequence, Symbol};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A loaded grammar document
#[derive(Debug, Clone)]
pub struct Grammar {
    abstract_grammar: AbstractGrammar,
    concretes: Vec<ConcreteGrammar>,
    diagnostics: Vec<Diagnostic>,
}

impl Grammar {
    /// Assemble a grammar from already-typed parts
    pub fn new(abstract_grammar: AbstractGrammar, concretes: Vec<ConcreteGrammar>) -> Self {
        Grammar {
            abstract_grammar,
            concretes,
            diagnostics: Vec::new(),
        }
    }

    /// Parse and validate a grammar document from JSON text
    pub fn from_json_str(source: &str) -> Result<Self, GrammarError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(value)
    }

    /// Read a grammar document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    /// Validate an already-parsed JSON document
    pub fn from_value(value: Value) -> Result<Self, GrammarError> {
        let Value::Object(mut document) = value else {
            return Err(GrammarError::malformed("document is not a JSON object"));
        };

        let abstract_value = document
            .remove("abstract")
            .ok_or_else(|| GrammarError::malformed("missing 'abstract'"))?;
        let abstract_grammar = parse_abstract(abstract_value)?;

        let mut diagnostics = Vec::new();
        let concretes = match document.remove("concretes") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(map)) => parse_concretes(map, &mut diagnostics)?,
            Some(_) => return Err(GrammarError::malformed("'concretes' is not an object")),
        };

        debug!(
            "loaded grammar '{}': {} functions, {} concrete grammar(s)",
            abstract_grammar.name,
            abstract_grammar.functions().len(),
            concretes.len()
        );

        Ok(Grammar {
            abstract_grammar,
            concretes,
            diagnostics,
        })
    }

    pub fn abstract_grammar(&self) -> &AbstractGrammar {
        &self.abstract_grammar
    }

    pub fn start_category(&self) -> &str {
        &self.abstract_grammar.start_category
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.abstract_grammar.function(name)
    }

    /// Names of the abstract functions producing `category`, in declaration order
    pub fn functions_for_category(&self, category: &str) -> Vec<&str> {
        self.abstract_grammar.functions_for_category(category)
    }

    pub fn has_functions(&self, category: &str) -> bool {
        self.abstract_grammar.has_functions(category)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.abstract_grammar.categories()
    }

    /// Language tags of all concrete grammars, in declaration order
    pub fn concrete_language_tags(&self) -> Vec<&str> {
        self.concretes
            .iter()
            .map(|c| c.language_tag.as_str())
            .collect()
    }

    pub fn concrete_ids(&self) -> Vec<&str> {
        self.concretes.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn concretes(&self) -> &[ConcreteGrammar] {
        &self.concretes
    }

    pub fn concrete(&self, id: &str) -> Option<&ConcreteGrammar> {
        self.concretes.iter().find(|c| c.id == id)
    }

    pub fn concrete_by_language(&self, tag: &str) -> Option<&ConcreteGrammar> {
        self.concretes.iter().find(|c| c.language_tag == tag)
    }

    /// Recoverable problems noticed while loading
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[derive(Deserialize)]
struct RawFunction {
    cat: String,
    args: Vec<String>,
}

fn parse_abstract(value: Value) -> Result<AbstractGrammar, GrammarError> {
    let Value::Object(mut fields) = value else {
        return Err(GrammarError::malformed("'abstract' is not an object"));
    };

    let name = match fields.remove("name") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(name)) => name,
        Some(_) => return Err(GrammarError::malformed("'abstract.name' is not a string")),
    };
    let start_category = match fields.remove("startcat") {
        Some(Value::String(cat)) => cat,
        Some(_) => return Err(GrammarError::malformed("'abstract.startcat' is not a string")),
        None => return Err(GrammarError::malformed("missing 'abstract.startcat'")),
    };
    let funs = match fields.remove("funs") {
        Some(Value::Object(funs)) => funs,
        Some(_) => return Err(GrammarError::malformed("'abstract.funs' is not an object")),
        None => return Err(GrammarError::malformed("missing 'abstract.funs'")),
    };

    let mut functions = Vec::with_capacity(funs.len());
    for (fun_name, fun_value) in funs {
        let raw: RawFunction = serde_json::from_value(fun_value).map_err(|e| {
            GrammarError::malformed(format!("'abstract.funs.{}': {}", fun_name, e))
        })?;
        functions.push(Function::new(fun_name, raw.cat, raw.args));
    }

    Ok(AbstractGrammar::new(name, start_category, functions))
}

#[derive(Deserialize, Default)]
struct RawFlags {
    language: Option<String>,
}

#[derive(Deserialize)]
struct RawProduction {
    #[serde(rename = "type", default)]
    tag: String,
    /// Absent on coercions, which don't name a function
    #[serde(default)]
    fid: Option<usize>,
}

#[derive(Deserialize)]
struct RawConcreteFunction {
    name: String,
    #[serde(default)]
    lins: Vec<usize>,
}

#[derive(Deserialize)]
struct RawSymbol {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    args: Vec<Value>,
}

#[derive(Deserialize)]
struct RawCategoryRange {
    start: i64,
    end: i64,
}

#[derive(Deserialize)]
struct RawConcrete {
    #[serde(default)]
    flags: RawFlags,
    #[serde(default)]
    productions: HashMap<String, Vec<RawProduction>>,
    #[serde(default)]
    functions: Vec<RawConcreteFunction>,
    #[serde(default)]
    sequences: Vec<Vec<RawSymbol>>,
    #[serde(default)]
    categories: HashMap<String, RawCategoryRange>,
    totalfids: Option<usize>,
}

fn parse_concretes(
    map: Map<String, Value>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<ConcreteGrammar>, GrammarError> {
    let mut concretes = Vec::with_capacity(map.len());
    for (id, value) in map {
        let raw: RawConcrete = serde_json::from_value(value)
            .map_err(|e| GrammarError::malformed(format!("'concretes.{}': {}", id, e)))?;
        concretes.push(build_concrete(id, raw, diagnostics)?);
    }
    Ok(concretes)
}

fn build_concrete(
    id: String,
    raw: RawConcrete,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ConcreteGrammar, GrammarError> {
    let language_tag = raw.flags.language.unwrap_or_else(|| id.clone());

    let functions = raw
        .functions
        .into_iter()
        .map(|f| ConcreteFunction {
            name: f.name,
            linearization_indices: f.lins,
        })
        .collect();

    let mut sequences = Vec::with_capacity(raw.sequences.len());
    for (index, raw_sequence) in raw.sequences.into_iter().enumerate() {
        let mut sequence: Sequence = Vec::with_capacity(raw_sequence.len());
        for raw_symbol in raw_sequence {
            sequence.push(convert_symbol(&id, index, raw_symbol, diagnostics)?);
        }
        sequences.push(sequence);
    }

    let mut concrete = ConcreteGrammar::new(id.clone(), language_tag, functions, sequences);
    for (category, productions) in raw.productions {
        let mut kept = Vec::with_capacity(productions.len());
        for production in productions {
            match production.fid {
                Some(function_index) => kept.push(Production { function_index }),
                None => {
                    warn!(
                        "{}: skipping '{}' production of '{}' without a function id",
                        id, production.tag, category
                    );
                    let diagnostic = Diagnostic::ProductionWithoutFunction {
                        category: category.clone(),
                        tag: production.tag,
                    };
                    if !diagnostics.contains(&diagnostic) {
                        diagnostics.push(diagnostic);
                    }
                }
            }
        }
        concrete = concrete.with_productions(category, kept);
    }
    for (category, range) in raw.categories {
        concrete = concrete.with_category_range(
            category,
            CategoryRange {
                start: range.start,
                end: range.end,
            },
        );
    }
    if let Some(total) = raw.totalfids {
        concrete = concrete.with_total_fids(total);
    }
    Ok(concrete)
}

fn convert_symbol(
    concrete_id: &str,
    sequence_index: usize,
    raw: RawSymbol,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Symbol, GrammarError> {
    match raw.tag.as_str() {
        "SymKS" => {
            let words: Vec<String> = raw
                .args
                .iter()
                .map(|arg| match arg {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Ok(Symbol::Literal(words.join(" ")))
        }
        "SymCat" => {
            let slot = raw.args.first().and_then(Value::as_u64).ok_or_else(|| {
                GrammarError::malformed(format!(
                    "'concretes.{}.sequences[{}]': SymCat without a slot index",
                    concrete_id, sequence_index
                ))
            })?;
            Ok(Symbol::CategoryRef(slot as usize))
        }
        "SymLit" => Ok(Symbol::Token(raw.args)),
        other => {
            warn!(
                "{}: sequence {} uses unsupported symbol type '{}'",
                concrete_id, sequence_index, other
            );
            let diagnostic = Diagnostic::UnknownSymbol {
                tag: other.to_string(),
            };
            if !diagnostics.contains(&diagnostic) {
                diagnostics.push(diagnostic);
            }
            Ok(Symbol::Token(raw.args))
        }
    }
}
