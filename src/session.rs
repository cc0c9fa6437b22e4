//! Interactive tree state
//!
//! A [`Session`] owns one loaded [`Grammar`] and the derivation tree built
//! from it. The user edits the tree node by node:
//!
//! - [`Session::list_alternatives`]: what could realize a category node
//! - [`Session::select`]: relabel a node with one of those alternatives
//! - [`Session::reset`]: go back to the label the node had before its first edit
//!
//! Every mutation is local to the node it names: labels change, tree
//! structure never does.
//!
//! [`Explorer`] holds the active session. Loading a new document replaces it
//! only when the document is valid; a failed load leaves the previous session
//! exactly as it was.

use crate::derivation::{self, DerivationTree, NodeId, NodeKind};
use crate::error::{Diagnostic, GrammarError, SelectError};
use crate::grammar::Grammar;
use crate::linearize::{display_label, linearize_function};
use crate::snapshot::TreeSnapshot;
use log::{debug, warn};
use serde_json::Value;
use std::path::Path;

/// Separator used when a function has several distinct linearizations
pub const DEFAULT_LINEARIZATION_SEPARATOR: &str = " | ";

/// Which grammar supplies alternatives and labels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Function names of the abstract grammar
    #[default]
    Abstract,
    /// Linearizations of the concrete grammar with this id
    Concrete(String),
}

/// One grammar and the tree the user is exploring
#[derive(Debug, Clone)]
pub struct Session {
    grammar: Grammar,
    tree: DerivationTree,
    mode: DisplayMode,
    separator: String,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    /// Build a session rooted at the grammar's start category
    pub fn new(grammar: Grammar) -> Self {
        let start = grammar.start_category().to_string();
        Self::with_start_category(grammar, &start)
    }

    /// Build a session rooted at an arbitrary category
    pub fn with_start_category(grammar: Grammar, category: &str) -> Self {
        let report = derivation::build(grammar.abstract_grammar(), category);
        let mut diagnostics = grammar.diagnostics().to_vec();
        diagnostics.extend(report.diagnostics);
        Session {
            grammar,
            tree: report.tree,
            mode: DisplayMode::Abstract,
            separator: DEFAULT_LINEARIZATION_SEPARATOR.to_string(),
            diagnostics,
        }
    }

    pub fn set_linearization_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn tree(&self) -> &DerivationTree {
        &self.tree
    }

    pub fn mode(&self) -> &DisplayMode {
        &self.mode
    }

    /// Load-time, build-time and selection-time conditions, in the order
    /// they were found
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Switch between abstract and concrete display
    ///
    /// Labels already on the tree are left as they are.
    pub fn set_mode(&mut self, mode: DisplayMode) -> Result<(), SelectError> {
        if let DisplayMode::Concrete(id) = &mode {
            if self.grammar.concrete(id).is_none() {
                return Err(SelectError::NoConcreteGrammar(id.clone()));
            }
        }
        debug!("display mode: {:?}", mode);
        self.mode = mode;
        Ok(())
    }

    /// Select a concrete grammar by id or language tag; `None` means abstract
    pub fn set_language(&mut self, language: Option<&str>) -> Result<(), SelectError> {
        let mode = match language {
            None => DisplayMode::Abstract,
            Some(wanted) => {
                let concrete = self
                    .grammar
                    .concrete(wanted)
                    .or_else(|| self.grammar.concrete_by_language(wanted))
                    .ok_or_else(|| SelectError::NoConcreteGrammar(wanted.to_string()))?;
                DisplayMode::Concrete(concrete.id.clone())
            }
        };
        self.set_mode(mode)
    }

    /// Candidate labels for a node, in grammar order
    ///
    /// Only category nodes have alternatives; everything else yields an empty list.
    pub fn list_alternatives(&self, id: NodeId) -> Vec<String> {
        let Some(node) = self.tree.node(id) else {
            return Vec::new();
        };
        if node.kind != NodeKind::Category {
            return Vec::new();
        }
        let names = match &self.mode {
            DisplayMode::Abstract => self.grammar.functions_for_category(&node.name),
            DisplayMode::Concrete(concrete_id) => match self.grammar.concrete(concrete_id) {
                Some(concrete) => concrete.functions_for_category(&node.name),
                None => Vec::new(),
            },
        };
        names.into_iter().map(str::to_string).collect()
    }

    /// Relabel a node with the chosen function
    ///
    /// The node's label before its first edit is remembered for [`Session::reset`].
    /// In concrete mode the label is the function's linearization; a function
    /// unknown to the concrete grammar leaves the tree untouched. Bad category
    /// references met while linearizing end up in [`Session::diagnostics`].
    pub fn select(&mut self, id: NodeId, chosen: &str) -> Result<(), SelectError> {
        if !self.tree.contains(id) {
            return Err(SelectError::UnknownNode(id));
        }

        let (label, found) = match &self.mode {
            DisplayMode::Abstract => (chosen.to_string(), Vec::new()),
            DisplayMode::Concrete(concrete_id) => self.concrete_label(concrete_id, chosen)?,
        };
        for diagnostic in found {
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }

        let node = self
            .tree
            .node_mut(id)
            .ok_or(SelectError::UnknownNode(id))?;
        if node.original_display_name.is_none() {
            node.original_display_name = Some(node.display_name.clone());
        }
        debug!("select {} '{}' -> '{}'", id, node.display_name, label);
        node.display_name = label;
        Ok(())
    }

    fn concrete_label(
        &self,
        concrete_id: &str,
        function_name: &str,
    ) -> Result<(String, Vec<Diagnostic>), SelectError> {
        let concrete = self
            .grammar
            .concrete(concrete_id)
            .ok_or_else(|| SelectError::NoConcreteGrammar(concrete_id.to_string()))?;
        let arguments = self
            .grammar
            .function(function_name)
            .map(|f| f.argument_categories.clone())
            .unwrap_or_default();

        match linearize_function(concrete, function_name, &arguments) {
            Some((linearizations, diagnostics)) => {
                Ok((display_label(&linearizations, &self.separator), diagnostics))
            }
            None => {
                warn!(
                    "function '{}' not found in concrete grammar '{}'",
                    function_name, concrete_id
                );
                Err(SelectError::NoSuchFunction {
                    function: function_name.to_string(),
                    language: concrete.language_tag.clone(),
                })
            }
        }
    }

    /// Restore the label a node had before it was first edited
    ///
    /// Returns whether anything was restored. The remembered original is kept,
    /// so select/reset can be repeated any number of times.
    pub fn reset(&mut self, id: NodeId) -> bool {
        let Some(node) = self.tree.node_mut(id) else {
            return false;
        };
        match &node.original_display_name {
            Some(original) => {
                debug!("reset {} '{}' -> '{}'", id, node.display_name, original);
                node.display_name = original.clone();
                true
            }
            None => false,
        }
    }

    /// Reset every edited node; returns how many were touched
    pub fn reset_all(&mut self) -> usize {
        let edited = self.tree.edited_nodes();
        for &id in &edited {
            self.reset(id);
        }
        edited.len()
    }

    pub fn edited_nodes(&self) -> Vec<NodeId> {
        self.tree.edited_nodes()
    }

    /// Immutable view of the current tree for rendering
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::from_tree(&self.tree)
    }
}

/// Holder of the active session
#[derive(Debug, Default)]
pub struct Explorer {
    session: Option<Session>,
}

impl Explorer {
    pub fn new() -> Self {
        Explorer { session: None }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Load a document from JSON text, replacing the active session on success
    pub fn load_str(&mut self, source: &str) -> Result<&mut Session, GrammarError> {
        let grammar = Grammar::from_json_str(source)?;
        Ok(self.install(grammar))
    }

    /// Load an already-parsed document
    pub fn load_value(&mut self, value: Value) -> Result<&mut Session, GrammarError> {
        let grammar = Grammar::from_value(value)?;
        Ok(self.install(grammar))
    }

    /// Load a document from disk
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Session, GrammarError> {
        let grammar = Grammar::from_file(path)?;
        Ok(self.install(grammar))
    }

    fn install(&mut self, grammar: Grammar) -> &mut Session {
        self.session.insert(Session::new(grammar))
    }
}
