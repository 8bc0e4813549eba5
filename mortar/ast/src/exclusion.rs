use crate::{AbstractTree, NodeId};

/// Decides whether an object of a class has no name token.
///
/// For excluded classes the token after the class is treated as a value,
/// e.g. `emitter Point` inside a particle system is an unnamed emitter of type `Point`.
pub trait NameExclusion {
    /// `parent` is the object the new object gets added to
    fn is_name_excluded(&self, class: &str, tree: &AbstractTree, parent: Option<NodeId>) -> bool;
}

/// The exclusions of the builtin resource scripts
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNameExclusion;

impl NameExclusion for DefaultNameExclusion {
    fn is_name_excluded(&self, class: &str, tree: &AbstractTree, parent: Option<NodeId>) -> bool {
        let container = match class {
            "emitter" | "affector" => "particle_system",
            "pass" => "compositor",
            "texture_source" => "texture_unit",
            _ => return false,
        };
        has_ancestor_of_class(tree, parent, container)
    }
}

/// Walks up the chain of objects starting at `node`
fn has_ancestor_of_class(tree: &AbstractTree, mut node: Option<NodeId>, class: &str) -> bool {
    while let Some(id) = node {
        let Some(object) = tree.object(id) else {
            return false;
        };
        if object.class == class {
            return true;
        }
        node = tree[id].parent;
    }
    false
}
