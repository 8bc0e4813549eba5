use std::{fmt::Display, ops::Index};

use smol_str::SmolStr;

use crate::{
    error::ParseErrorKind,
    node::{ConcreteNode, ConcreteNodeId, ConcreteNodeKind, NodeDisplay},
};

/// Arena of the concrete nodes of a single script
#[derive(Debug, Default, Clone)]
pub struct ConcreteTree {
    nodes: Vec<ConcreteNode>,
    /// The top-level nodes, in source order
    pub roots: Vec<ConcreteNodeId>,
    pub errors: Vec<ParseErrorKind>,
    pub file: SmolStr,
}

impl ConcreteTree {
    pub fn new(file: impl Into<SmolStr>) -> Self {
        ConcreteTree {
            file: file.into(),
            ..Default::default()
        }
    }

    /// Appends a new node to the children of `parent`, or to the roots if there is no parent
    pub fn insert(
        &mut self,
        parent: Option<ConcreteNodeId>,
        kind: ConcreteNodeKind,
        token: impl Into<SmolStr>,
        line: u32,
    ) -> ConcreteNodeId {
        let id = ConcreteNodeId(self.nodes.len());
        self.nodes.push(ConcreteNode {
            kind,
            token: token.into(),
            file: self.file.clone(),
            line,
            children: Vec::new(),
            parent,
        });

        match parent {
            Some(ConcreteNodeId(parent)) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, ConcreteNodeId(idx): ConcreteNodeId) -> &ConcreteNode {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn debug_fmt(&self) -> impl Display + '_ {
        DebugRoots { tree: self }
    }
}

impl Index<ConcreteNodeId> for ConcreteTree {
    type Output = ConcreteNode;

    fn index(&self, value: ConcreteNodeId) -> &Self::Output {
        self.get(value)
    }
}

struct DebugRoots<'a> {
    tree: &'a ConcreteTree,
}

impl Display for DebugRoots<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for root in &self.tree.roots {
            NodeDisplay {
                tree: self.tree,
                node_id: *root,
                indent: 0,
            }
            .fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        node::ConcreteNodeKind,
        parser::{parse, parse_chunk},
    };

    use super::ConcreteTree;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn does_not_crash(s in "\\PC*") {
            parse(&s, "fuzz");
        }

        #[test]
        fn chunk_does_not_crash(s in "\\PC*") {
            parse_chunk(&s, "fuzz", 1);
        }

        #[test]
        fn debug_fmt_does_not_crash(s in "[a-z{}:$\" \n]*") {
            let tree = parse(&s, "fuzz");
            let _ = tree.debug_fmt().to_string();
        }
    }

    #[test]
    fn empty_input() {
        let tree = parse("", "empty");
        assert!(tree.roots.is_empty());
        assert!(tree.errors.is_empty());
    }

    #[test]
    fn programmatic_insert() {
        let mut tree = ConcreteTree::new("built");
        let property = tree.insert(None, ConcreteNodeKind::Word, "ambient", 3);
        let value = tree.insert(Some(property), ConcreteNodeKind::Word, "1", 3);

        assert_eq!(tree.roots, [property]);
        assert_eq!(tree[property].children, [value]);
        assert_eq!(tree[value].parent, Some(property));
        assert_eq!(tree[value].file, "built");
    }
}
