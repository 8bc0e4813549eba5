//! Applies the bases of objects.
//!
//! Overlaying a base onto an object merges the content of the base into the object.
//! Child objects of the object override the base children with the same class and name,
//! unnamed children are paired by position. A child name containing `*` is a pattern
//! which gets expanded into one copy per matching base child.

use mortar_ast::{AbstractTree, NodeId};
use mortar_error::{CompileError, CompileErrorCode};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Diagnostics, ScriptCompiler};

impl ScriptCompiler {
    /// Applies the bases of every object in `nodes` and their children.
    ///
    /// Bases are looked up in `top` first and in the import table afterwards.
    /// A base declared after the object that uses it gets its own bases applied first.
    pub(crate) fn process_objects(&mut self, tree: &mut AbstractTree, nodes: &[NodeId], top: &[NodeId]) {
        let mut applying = Vec::new();
        self.apply_bases(tree, nodes, top, &mut applying);
    }

    /// `applying` holds the objects whose bases are currently being applied
    fn apply_bases(
        &mut self,
        tree: &mut AbstractTree,
        nodes: &[NodeId],
        top: &[NodeId],
        applying: &mut Vec<NodeId>,
    ) {
        for &node in nodes {
            let Some(object) = tree.object(node) else {
                continue;
            };

            if !object.bases_applied {
                let bases = object.bases.clone();
                applying.push(node);
                for base in &bases {
                    let source = tree
                        .find_object(top, base)
                        .or_else(|| tree.find_object(&self.imports.table, base));
                    match source {
                        None => self.report_at(
                            tree,
                            node,
                            CompileErrorCode::ObjectBaseNotFound,
                            format!("base object '{base}' not found"),
                        ),
                        Some(source) if is_self_or_ancestor(tree, source, node) => self.report_at(
                            tree,
                            node,
                            CompileErrorCode::ObjectBaseNotFound,
                            format!("object cannot inherit from itself or an enclosing object '{base}'"),
                        ),
                        Some(source) if applying.contains(&source) => self.report_at(
                            tree,
                            node,
                            CompileErrorCode::ObjectBaseNotFound,
                            format!("circular inheritance through '{base}'"),
                        ),
                        Some(source) => {
                            if tree.object(source).is_some_and(|object| !object.bases_applied) {
                                self.apply_bases(tree, &[source], top, applying);
                            }
                            overlay(tree, source, node, &mut self.diagnostics);
                        }
                    }
                }
                applying.pop();
                if let Some(object) = tree.object_mut(node) {
                    object.bases_applied = true;
                }
            }

            let children = tree.object(node).map(|object| object.children.clone()).unwrap_or_default();
            self.apply_bases(tree, &children, top, applying);

            if let Some(object) = tree.object_mut(node) {
                let overrides = std::mem::take(&mut object.overrides);
                object.children.splice(0..0, overrides);
            }
        }
    }
}

fn is_self_or_ancestor(tree: &AbstractTree, candidate: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == candidate {
            return true;
        }
        current = tree[id].parent;
    }
    false
}

/// A child object of the base
struct Candidate {
    node: NodeId,
    /// The child of the destination that overrides this candidate
    paired: Option<NodeId>,
}

/// Converts a child name with `*` into a regex that matches the whole name
fn wildcard_pattern(name: &str) -> Option<Regex> {
    if !name.contains('*') {
        return None;
    }
    let pattern = format!("^{}$", regex::escape(name).replace(r"\*", ".*"));
    Regex::new(&pattern).ok()
}

/// Merges the object `source` into the object `dest`.
///
/// Non-object children of `source` are copied into the overrides of `dest`,
/// so they end up in front of the content of `dest`.
pub(crate) fn overlay(tree: &mut AbstractTree, source: NodeId, dest: NodeId, diagnostics: &mut Diagnostics) {
    let Some(base) = tree.object(source) else {
        return;
    };
    let variables = base.variables.clone();
    let base_children = base.children.clone();

    if let Some(object) = tree.object_mut(dest) {
        for (name, value) in variables {
            object.variables.entry(name).or_insert(value);
        }
    }

    let mut candidates = Vec::new();
    for child in base_children {
        if tree.is_object(child) {
            candidates.push(Candidate { node: child, paired: None });
        } else {
            let copy = tree.deep_clone(child, Some(dest));
            if let Some(object) = tree.object_mut(dest) {
                object.overrides.push(copy);
            }
        }
    }

    let mut paired = FxHashSet::default();
    let min_index = pair_by_name(tree, dest, &mut candidates, &mut paired, diagnostics);
    pair_by_position(tree, dest, &mut candidates, &paired, &min_index);

    let mut cursor = 0;
    for candidate in candidates {
        match candidate.paired {
            Some(target) => {
                overlay(tree, candidate.node, target, diagnostics);
                if let Some(position) = children(tree, dest).iter().position(|child| *child == target) {
                    cursor = position + 1;
                }
            }
            None => {
                let copy = tree.deep_clone(candidate.node, Some(dest));
                if let Some(object) = tree.object_mut(dest) {
                    let position = cursor.min(object.children.len());
                    object.children.insert(position, copy);
                }
                cursor += 1;
            }
        }
    }
}

fn children(tree: &AbstractTree, node: NodeId) -> &[NodeId] {
    match tree.object(node) {
        Some(object) => &object.children,
        None => &[],
    }
}

/// Pairs the child objects of `dest` with the candidates of the same class and name.
///
/// Returns, for every child object of `dest`, the index of the first candidate
/// that may still be paired with it by position.
fn pair_by_name(
    tree: &mut AbstractTree,
    dest: NodeId,
    candidates: &mut [Candidate],
    paired: &mut FxHashSet<NodeId>,
    diagnostics: &mut Diagnostics,
) -> FxHashMap<NodeId, usize> {
    let mut min_index = FxHashMap::default();
    let mut max_index = 0;
    let mut position = 0;

    while position < children(tree, dest).len() {
        let child = children(tree, dest)[position];
        let Some(object) = tree.object(child) else {
            position += 1;
            continue;
        };
        let class = object.class.clone();
        let name = object.name.clone();
        min_index.insert(child, max_index);

        let Some(pattern) = wildcard_pattern(&name) else {
            if !name.is_empty() {
                let found = candidates.iter_mut().enumerate().find(|(_, candidate)| {
                    tree.object(candidate.node)
                        .is_some_and(|base| base.class == class && base.name == name)
                });
                match found {
                    Some((_, candidate)) if candidate.paired.is_some() => {
                        report_duplicate(tree, child, &name, diagnostics);
                    }
                    Some((index, candidate)) => {
                        candidate.paired = Some(child);
                        paired.insert(child);
                        max_index = max_index.max(index);
                        min_index.insert(child, max_index);
                    }
                    None => {}
                }
            }
            position += 1;
            continue;
        };

        let mut inserted = 0;
        for (index, candidate) in candidates.iter_mut().enumerate() {
            let Some(base) = tree.object(candidate.node) else {
                continue;
            };
            if base.class != class || !pattern.is_match(&base.name) {
                continue;
            }
            if candidate.paired.is_some() {
                report_duplicate(tree, child, &base.name.clone(), diagnostics);
                continue;
            }

            let base_name = base.name.clone();
            let copy = tree.deep_clone(child, Some(dest));
            if let Some(object) = tree.object_mut(copy) {
                object.name = base_name;
            }
            if let Some(object) = tree.object_mut(dest) {
                object.children.insert(position + inserted, copy);
            }
            inserted += 1;

            candidate.paired = Some(copy);
            paired.insert(copy);
            max_index = max_index.max(index);
            min_index.insert(copy, max_index);
        }

        // the pattern object only serves as template for the copies
        if let Some(object) = tree.object_mut(dest) {
            object.children.remove(position + inserted);
        }
        position += inserted;
    }

    min_index
}

/// Pairs the unnamed child objects of `dest` with unnamed candidates of the same class, in order
fn pair_by_position(
    tree: &AbstractTree,
    dest: NodeId,
    candidates: &mut [Candidate],
    paired: &FxHashSet<NodeId>,
    min_index: &FxHashMap<NodeId, usize>,
) {
    for &child in children(tree, dest) {
        let Some(object) = tree.object(child) else {
            continue;
        };
        if !object.name.is_empty() || paired.contains(&child) {
            continue;
        }

        let start = min_index.get(&child).copied().unwrap_or(0);
        let candidate = candidates.iter_mut().skip(start).find(|candidate| {
            candidate.paired.is_none()
                && tree
                    .object(candidate.node)
                    .is_some_and(|base| base.name.is_empty() && base.class == object.class)
        });
        if let Some(candidate) = candidate {
            candidate.paired = Some(child);
        }
    }
}

fn report_duplicate(tree: &AbstractTree, node: NodeId, name: &str, diagnostics: &mut Diagnostics) {
    let node = &tree[node];
    diagnostics.report(
        CompileError::new(CompileErrorCode::DuplicateOverride, node.file.clone(), node.line)
            .with_message(format!("'{name}' is overridden more than once")),
    );
}

#[cfg(test)]
mod tests {
    use super::wildcard_pattern;

    #[test]
    fn wildcard_patterns() {
        assert!(wildcard_pattern("name").is_none());

        let pattern = wildcard_pattern("a*").unwrap();
        assert!(pattern.is_match("a1"));
        assert!(pattern.is_match("a"));
        assert!(!pattern.is_match("ba1"));

        let pattern = wildcard_pattern("*").unwrap();
        assert!(pattern.is_match(""));
        assert!(pattern.is_match("anything"));

        let pattern = wildcard_pattern("tex.*").unwrap();
        assert!(pattern.is_match("tex.diffuse"));
        assert!(!pattern.is_match("texture"));
    }
}
