use core::fmt;
use std::fmt::Display;

use smol_str::SmolStr;

use crate::syntax_tree::ConcreteTree;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ConcreteNodeId(pub(super) usize);

/// An untyped node of the concrete tree
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ConcreteNode {
    pub kind: ConcreteNodeKind,
    pub token: SmolStr,
    pub file: SmolStr,
    pub line: u32,
    pub children: Vec<ConcreteNodeId>,
    /// Only used for navigation, the parent owns this node via its `children`
    pub parent: Option<ConcreteNodeId>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConcreteNodeKind {
    Word,
    Quote,
    Variable,
    VariableAssignment,
    Import,
    LeftBrace,
    RightBrace,
    Colon,
}

impl fmt::Display for ConcreteNodeKind {
    #[allow(clippy::use_debug)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

pub struct NodeDisplay<'a> {
    pub(super) tree: &'a ConcreteTree,
    pub(super) node_id: ConcreteNodeId,
    pub(super) indent: usize,
}

impl NodeDisplay<'_> {
    fn writeln(&self, f: &mut fmt::Formatter<'_>, value: impl Display) -> fmt::Result {
        write!(f, "{:indent$}{}", "", value, indent = self.indent * 2)?;
        writeln!(f)
    }
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node = &self.tree[self.node_id];
        self.writeln(
            f,
            format_args!(
                "{}@{}: '{}'",
                node.kind,
                node.line,
                node.token.escape_default()
            ),
        )?;

        for child in &node.children {
            fmt::Display::fmt(
                &NodeDisplay {
                    tree: self.tree,
                    node_id: *child,
                    indent: self.indent + 1,
                },
                f,
            )?;
        }

        Ok(())
    }
}
