//! # treevis
//!
//! Explore derivation trees of a grammar: load an abstract grammar (and
//! optionally concrete grammars for several languages), build the tree rooted
//! at the start category, then swap which function realizes each category
//! and revert back to the original choice.
//!
//! Layers, leaves first:
//!
//! - [`grammar`]: validated, read-only model of a grammar document
//! - [`linearize`]: turns concrete sequence tables into strings
//! - [`derivation`]: arena tree and the cycle-safe tree builder
//! - [`session`]: the interactive, per-session tree state
//! - [`snapshot`] and [`formats`]: immutable views for renderers and serializers
//! - [`settings`]: layered configuration

pub mod derivation;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod linearize;
pub mod session;
pub mod settings;
pub mod snapshot;

pub use derivation::{build, BuildReport, DerivationNode, DerivationTree, NodeId, NodeKind};
pub use error::{Diagnostic, GrammarError, SelectError};
pub use grammar::Grammar;
pub use session::{DisplayMode, Explorer, Session};
pub use snapshot::TreeSnapshot;
