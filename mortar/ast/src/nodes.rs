use std::ops::{Index, IndexMut};

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Variables that are local to an object
pub type Variables = FxHashMap<SmolStr, SmolStr>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractNode {
    pub file: SmolStr,
    pub line: u32,
    /// Non-owning link to the node that lists this node as child or value
    pub parent: Option<NodeId>,
    pub kind: AbstractNodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractNodeKind {
    Atom(Atom),
    Property(Property),
    Object(Object),
    Import(Import),
    VariableAccess(VariableAccess),
}

/// A literal value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub value: SmolStr,
    /// The keyword id of `value`
    pub id: Option<u32>,
}

/// A name followed by a list of values, like `ambient 1 0 0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: SmolStr,
    pub id: Option<u32>,
    pub values: Vec<NodeId>,
}

/// A brace delimited block, like `material name : base { ... }`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object {
    pub class: SmolStr,
    /// May be empty
    pub name: SmolStr,
    pub id: Option<u32>,
    /// Abstract objects are never translated, but can be inherited from
    pub is_abstract: bool,
    /// Names of the objects this object inherits from, in declaration order
    pub bases: Vec<SmolStr>,
    /// Values between the name and the colon or brace
    pub values: Vec<NodeId>,
    pub variables: Variables,
    pub children: Vec<NodeId>,
    /// Non-object nodes inherited from a base.
    /// They are moved to the front of `children` once all bases are applied.
    pub overrides: Vec<NodeId>,
    /// Set once the bases of this object were overlaid onto it
    pub bases_applied: bool,
}

impl Object {
    pub fn variable(&self, name: &str) -> Option<&SmolStr> {
        self.variables.get(name)
    }

    pub fn set_variable(&mut self, name: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        self.variables.insert(name.into(), value.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// An object name or `*`
    pub target: SmolStr,
    pub source: SmolStr,
}

/// A reference to a variable, without the leading `$`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAccess {
    pub name: SmolStr,
}

/// Arena which owns every abstract node of a compilation.
///
/// Nodes are never removed from the arena. Removing a node from the tree
/// means removing its id from the list of its parent.
#[derive(Debug, Default, Clone)]
pub struct AbstractTree {
    nodes: Vec<AbstractNode>,
    /// The top-level nodes of the main script
    pub roots: Vec<NodeId>,
}

impl AbstractTree {
    pub fn push(&mut self, node: AbstractNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, NodeId(idx): NodeId) -> &AbstractNode {
        &self.nodes[idx]
    }

    pub fn get_mut(&mut self, NodeId(idx): NodeId) -> &mut AbstractNode {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn object(&self, id: NodeId) -> Option<&Object> {
        match &self[id].kind {
            AbstractNodeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: NodeId) -> Option<&mut Object> {
        match &mut self[id].kind {
            AbstractNodeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn property(&self, id: NodeId) -> Option<&Property> {
        match &self[id].kind {
            AbstractNodeKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn property_mut(&mut self, id: NodeId) -> Option<&mut Property> {
        match &mut self[id].kind {
            AbstractNodeKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn atom(&self, id: NodeId) -> Option<&Atom> {
        match &self[id].kind {
            AbstractNodeKind::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        self.object(id).is_some()
    }

    /// The nearest object that contains `id`, not including `id` itself
    pub fn enclosing_object(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self[id].parent;
        while let Some(node) = current {
            if self.is_object(node) {
                return Some(node);
            }
            current = self[node].parent;
        }
        None
    }

    /// Finds the last object with the name `name` in `nodes`
    pub fn find_object(&self, nodes: &[NodeId], name: &str) -> Option<NodeId> {
        nodes
            .iter()
            .rev()
            .copied()
            .find(|id| self.object(*id).is_some_and(|object| object.name == name))
    }

    /// Copies the subtree at `id` and attaches the copy to `parent`.
    ///
    /// The copy does not get added to the children of `parent`,
    /// pending overrides are not copied.
    pub fn deep_clone(&mut self, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let mut node = self[id].clone();
        node.parent = parent;
        let (values, children) = match &mut node.kind {
            AbstractNodeKind::Property(property) => (std::mem::take(&mut property.values), vec![]),
            AbstractNodeKind::Object(object) => {
                object.overrides.clear();
                (
                    std::mem::take(&mut object.values),
                    std::mem::take(&mut object.children),
                )
            }
            _ => (vec![], vec![]),
        };
        let new_id = self.push(node);

        let values: Vec<_> = values
            .into_iter()
            .map(|value| self.deep_clone(value, Some(new_id)))
            .collect();
        let children: Vec<_> = children
            .into_iter()
            .map(|child| self.deep_clone(child, Some(new_id)))
            .collect();

        match &mut self[new_id].kind {
            AbstractNodeKind::Property(property) => property.values = values,
            AbstractNodeKind::Object(object) => {
                object.values = values;
                object.children = children;
            }
            _ => {}
        }
        new_id
    }
}

impl Index<NodeId> for AbstractTree {
    type Output = AbstractNode;

    fn index(&self, value: NodeId) -> &Self::Output {
        self.get(value)
    }
}

impl IndexMut<NodeId> for AbstractTree {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        self.get_mut(index)
    }
}
