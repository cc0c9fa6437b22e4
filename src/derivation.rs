//! Derivation trees
//!
//! A [`DerivationTree`] is an arena of [`DerivationNode`]s addressed by
//! [`NodeId`]. Ids are plain indices into the arena, so they stay valid for
//! the whole session and survive any number of relabelings and redraws.
//!
//! ## Building
//!
//! [`build`] expands a category depth-first:
//!
//! ```text
//! S                  category node
//! └── Pred           one function node per function producing S
//!     ├── NP         one category child per argument, expanded in turn
//!     └── VP
//! ```
//!
//! Recursion is cut per path: a category that is already being expanded
//! further up the *same* path becomes a childless leaf. A category leaves the
//! path once its subtree is done, so it can appear fully expanded again on
//! independent branches. The builder keeps its own work stack, so deep
//! grammars cost heap, not call stack.
//!
//! Within one category node, an argument category is expanded only the first
//! time it appears among its function children; later occurrences are kept
//! as childless leaves marked `shared`.

use crate::error::Diagnostic;
use crate::grammar::AbstractGrammar;
use log::debug;
use std::collections::HashSet;
use std::fmt;

/// Stable identifier of a node within one [`DerivationTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a node is a choice point (category) or a production (function)
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum NodeKind {
    Category,
    Function,
}

/// One node of a derivation tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationNode {
    /// Grammar name this node stands for; never changes
    pub name: String,
    /// Current label
    pub display_name: String,
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Label before the first user override; `None` means never edited
    pub original_display_name: Option<String>,
    /// Repeated argument category left unexpanded under the same category node
    pub shared: bool,
}

impl DerivationNode {
    fn new(name: &str, kind: NodeKind, parent: Option<NodeId>) -> Self {
        DerivationNode {
            name: name.to_string(),
            display_name: name.to_string(),
            kind,
            children: Vec::new(),
            parent,
            original_display_name: None,
            shared: false,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.original_display_name.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena-backed derivation tree
#[derive(Debug, Clone)]
pub struct DerivationTree {
    nodes: Vec<DerivationNode>,
    root: NodeId,
}

impl DerivationTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&DerivationNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DerivationNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        if !self.contains(self.root) {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.children(id).iter().map(|&child| (child, depth + 1)));
        }
        deepest
    }

    /// Depth-first, pre-order walk over node ids
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    /// All nodes whose label has been overridden at least once
    pub fn edited_nodes(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|&id| self.nodes[id.0].is_edited())
            .collect()
    }

    fn push(&mut self, node: DerivationNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }
}

/// Result of [`build`]: the tree plus anything worth reporting
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub tree: DerivationTree,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the initial derivation tree for `category`
pub fn build(grammar: &AbstractGrammar, category: &str) -> BuildReport {
    // The root is always the first node pushed
    let mut tree = DerivationTree {
        nodes: Vec::new(),
        root: NodeId(0),
    };
    let mut diagnostics = Vec::new();
    let mut builder = Builder {
        grammar,
        path: HashSet::new(),
        steps: vec![Step::Category {
            name: category,
            parent: None,
            shared: false,
        }],
    };
    builder.run(&mut tree, &mut diagnostics);

    debug!(
        "built derivation tree for '{}': {} nodes, depth {}",
        category,
        tree.len(),
        tree.depth()
    );

    BuildReport { tree, diagnostics }
}

/// Pending work of the builder, popped in pre-order
enum Step<'a> {
    /// Push a category node and schedule its functions
    Category {
        name: &'a str,
        parent: Option<NodeId>,
        shared: bool,
    },
    /// Push a function node and schedule its arguments; `true` marks a shared leaf
    Function {
        name: &'a str,
        parent: NodeId,
        arguments: Vec<(&'a str, bool)>,
    },
    /// All of a category's functions are done: it leaves the path
    Leave(&'a str),
}

/// Depth-first expansion driven by an explicit stack
///
/// `path` holds the categories being expanded between the root and the
/// current step. A category enters it when its functions are scheduled and
/// leaves it once they are all built.
struct Builder<'a> {
    grammar: &'a AbstractGrammar,
    path: HashSet<&'a str>,
    steps: Vec<Step<'a>>,
}

impl<'a> Builder<'a> {
    fn run(&mut self, tree: &mut DerivationTree, diagnostics: &mut Vec<Diagnostic>) {
        while let Some(step) = self.steps.pop() {
            match step {
                Step::Category {
                    name,
                    parent,
                    shared,
                } => {
                    let mut node = DerivationNode::new(name, NodeKind::Category, parent);
                    node.shared = shared;
                    let id = tree.push(node);
                    if !shared {
                        self.expand_category(name, id, diagnostics);
                    }
                }
                Step::Function {
                    name,
                    parent,
                    arguments,
                } => {
                    let node = DerivationNode::new(name, NodeKind::Function, Some(parent));
                    let id = tree.push(node);
                    for &(argument, shared) in arguments.iter().rev() {
                        self.steps.push(Step::Category {
                            name: argument,
                            parent: Some(id),
                            shared,
                        });
                    }
                }
                Step::Leave(category) => {
                    self.path.remove(category);
                }
            }
        }
    }

    fn expand_category(
        &mut self,
        category: &'a str,
        id: NodeId,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        // Self-recursion along this path: stop here
        if self.path.contains(category) {
            return;
        }

        let functions = self.grammar.functions_for_category(category);
        if functions.is_empty() {
            let diagnostic = Diagnostic::UnknownCategory {
                category: category.to_string(),
            };
            if !diagnostics.contains(&diagnostic) {
                diagnostics.push(diagnostic);
            }
            return;
        }

        self.path.insert(category);
        self.steps.push(Step::Leave(category));

        let grammar = self.grammar;
        let mut expanded: HashSet<&str> = HashSet::new();
        let scheduled: Vec<Step<'a>> = functions
            .into_iter()
            .map(|function_name| {
                let arguments = grammar
                    .function(function_name)
                    .map(|function| {
                        function
                            .argument_categories
                            .iter()
                            .map(|argument| {
                                let shared = !expanded.insert(argument.as_str());
                                (argument.as_str(), shared)
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Step::Function {
                    name: function_name,
                    parent: id,
                    arguments,
                }
            })
            .collect();
        self.steps.extend(scheduled.into_iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Function;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn labels(tree: &DerivationTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.node(id).unwrap().display_name.clone())
            .collect()
    }

    #[test]
    fn test_leaf_category_has_no_children() {
        let grammar = AbstractGrammar::new("G", "S", vec![]);
        let report = build(&grammar, "S");
        let root = report.tree.node(report.tree.root()).unwrap();
        assert_eq!(root.kind, NodeKind::Category);
        assert!(root.children.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnknownCategory {
                category: "S".into()
            }]
        );
    }

    #[test]
    fn test_direct_self_recursion_is_cut() {
        let grammar = AbstractGrammar::new(
            "G",
            "NP",
            vec![
                Function::new("Conj", "NP", args(&["NP", "NP"])),
                Function::new("John", "NP", vec![]),
            ],
        );
        let tree = build(&grammar, "NP").tree;
        let root = tree.root();
        assert_eq!(labels(&tree, tree.children(root)), vec!["Conj", "John"]);

        let conj = tree.children(root)[0];
        let conj_args = tree.children(conj);
        assert_eq!(labels(&tree, conj_args), vec!["NP", "NP"]);
        for &arg in conj_args {
            assert!(tree.children(arg).is_empty());
        }
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_repeated_argument_is_shared_leaf() {
        let grammar = AbstractGrammar::new(
            "G",
            "S",
            vec![
                Function::new("Both", "S", args(&["A", "A"])),
                Function::new("One", "S", args(&["A"])),
                Function::new("MkA", "A", args(&["B"])),
            ],
        );
        let tree = build(&grammar, "S").tree;
        let both = tree.children(tree.root())[0];
        let one = tree.children(tree.root())[1];

        let first = tree.node(tree.children(both)[0]).unwrap();
        let second = tree.node(tree.children(both)[1]).unwrap();
        let third = tree.node(tree.children(one)[0]).unwrap();
        assert!(!first.shared && first.has_children());
        assert!(second.shared && !second.has_children());
        assert!(third.shared && !third.has_children());
    }

    #[test]
    fn test_parent_links_and_preorder() {
        let grammar = AbstractGrammar::new(
            "G",
            "S",
            vec![
                Function::new("Pred", "S", args(&["NP", "VP"])),
                Function::new("John", "NP", vec![]),
            ],
        );
        let tree = build(&grammar, "S").tree;
        let order: Vec<String> = tree
            .iter()
            .map(|id| tree.node(id).unwrap().display_name.clone())
            .collect();
        assert_eq!(order, vec!["S", "Pred", "NP", "John", "VP"]);

        let pred = tree.children(tree.root())[0];
        assert_eq!(tree.parent(pred), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_category_expands_again_on_sibling_branch() {
        let grammar = AbstractGrammar::new(
            "G",
            "S",
            vec![
                Function::new("Pair", "S", args(&["A", "B"])),
                Function::new("MkA", "A", args(&["B"])),
                Function::new("MkB", "B", args(&["A"])),
            ],
        );
        let tree = build(&grammar, "S").tree;
        let pair = tree.children(tree.root())[0];
        let [a, b] = tree.children(pair) else {
            panic!("Pair should have two arguments");
        };
        // S > Pair > A > MkA > B > MkB > A (cut)
        let inner_b = tree.children(tree.children(*a)[0])[0];
        let cut_a = tree.children(tree.children(inner_b)[0])[0];
        assert!(!tree.node(cut_a).unwrap().has_children());
        // B is expanded again once A's subtree is done
        assert_eq!(labels(&tree, tree.children(*b)), vec!["MkB"]);
        assert_eq!(tree.depth(), 7);
    }

    #[test]
    fn test_deep_chain_builds_without_recursion() {
        let levels = 5_000;
        let functions: Vec<Function> = (0..levels)
            .map(|i| {
                let next = vec![format!("C{}", i + 1)];
                Function::new(format!("F{}", i), format!("C{}", i), next)
            })
            .collect();
        let grammar = AbstractGrammar::new("Chain", "C0", functions);
        let report = build(&grammar, "C0");

        assert_eq!(report.tree.len(), 2 * levels + 1);
        assert_eq!(report.tree.depth(), 2 * levels + 1);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnknownCategory {
                category: format!("C{}", levels)
            }]
        );
        assert_eq!(report.tree.iter().count(), 2 * levels + 1);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(3).to_string(), "#3");
    }
}
