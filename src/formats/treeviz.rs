//! Treeviz formatter for derivation trees
//!
//! One line per node, with the tree structure drawn by connectors:
//!
//! ```text
//! ◇ S
//! └─ ƒ Pred
//!   ├─ ◇ NP
//!   │ └─ ƒ John
//!   └─ ◇ VP
//!     └─ ƒ Run
//! ```
//!
//! Icons:
//!     Category: ◇
//!     Function: ƒ
//!
//! Labels that were changed by a selection end with ` *`. Long labels
//! (linearizations can be whole sentences) are truncated.

use super::{FormatError, Formatter};
use crate::derivation::NodeKind;
use crate::snapshot::TreeSnapshot;

const MAX_LABEL_CHARS: usize = 60;

pub fn node_icon(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Category => "◇",
        NodeKind::Function => "ƒ",
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn node_line(snapshot: &TreeSnapshot) -> String {
    let mark = if snapshot.edited { " *" } else { "" };
    format!(
        "{} {}{}",
        node_icon(snapshot.kind),
        truncate(&snapshot.display_name, MAX_LABEL_CHARS),
        mark
    )
}

pub fn to_treeviz_str(snapshot: &TreeSnapshot) -> String {
    let mut result = format!("{}\n", node_line(snapshot));
    // (node, prefix of its line, whether it is the last of its siblings)
    let mut pending: Vec<(&TreeSnapshot, String, bool)> = Vec::new();
    push_children(&mut pending, &snapshot.children, "");

    while let Some((child, prefix, is_last)) = pending.pop() {
        let connector = if is_last { "└─" } else { "├─" };
        result.push_str(&format!("{}{} {}\n", prefix, connector, node_line(child)));

        let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        push_children(&mut pending, &child.children, &new_prefix);
    }
    result
}

fn push_children<'a>(
    pending: &mut Vec<(&'a TreeSnapshot, String, bool)>,
    children: &'a [TreeSnapshot],
    prefix: &str,
) {
    let last = children.len().saturating_sub(1);
    for (i, child) in children.iter().enumerate().rev() {
        pending.push((child, prefix.to_string(), i == last));
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, snapshot: &TreeSnapshot) -> Result<String, FormatError> {
        Ok(to_treeviz_str(snapshot))
    }

    fn description(&self) -> &str {
        "Indented one-line-per-node tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }

    #[test]
    fn test_icons() {
        assert_eq!(node_icon(NodeKind::Category), "◇");
        assert_eq!(node_icon(NodeKind::Function), "ƒ");
    }
}
