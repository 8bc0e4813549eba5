//! Replaces variable references with the nodes of the variable value

use mortar_ast::{AbstractNodeKind, AbstractTree, NodeId};
use mortar_error::CompileErrorCode;
use mortar_parser::parse_chunk;
use smol_str::SmolStr;

use crate::ScriptCompiler;

/// The node lists that may contain variable references
enum Lists {
    /// Abstract objects keep their references, they are expanded in the objects that inherit them
    Skip,
    Object,
    Property,
    Variable(SmolStr),
}

impl ScriptCompiler {
    /// Expands every variable reference in `nodes` and the nodes below them
    pub(crate) fn process_variables(&mut self, tree: &mut AbstractTree, nodes: &mut Vec<NodeId>) {
        let mut expanding = Vec::new();
        self.expand_list(tree, nodes, &mut expanding);
    }

    fn expand_list(&mut self, tree: &mut AbstractTree, nodes: &mut Vec<NodeId>, expanding: &mut Vec<SmolStr>) {
        let mut expanded = Vec::with_capacity(nodes.len());

        for node in std::mem::take(nodes) {
            let lists = match &tree[node].kind {
                AbstractNodeKind::Object(object) if object.is_abstract => Lists::Skip,
                AbstractNodeKind::Object(_) => Lists::Object,
                AbstractNodeKind::Property(_) => Lists::Property,
                AbstractNodeKind::VariableAccess(access) => Lists::Variable(access.name.clone()),
                _ => Lists::Skip,
            };

            match lists {
                Lists::Skip => expanded.push(node),
                Lists::Object => {
                    let Some(object) = tree.object_mut(node) else {
                        continue;
                    };
                    let mut values = std::mem::take(&mut object.values);
                    let mut children = std::mem::take(&mut object.children);
                    self.expand_list(tree, &mut values, expanding);
                    self.expand_list(tree, &mut children, expanding);
                    if let Some(object) = tree.object_mut(node) {
                        object.values = values;
                        object.children = children;
                    }
                    expanded.push(node);
                }
                Lists::Property => {
                    let Some(property) = tree.property_mut(node) else {
                        continue;
                    };
                    let mut values = std::mem::take(&mut property.values);
                    self.expand_list(tree, &mut values, expanding);
                    if let Some(property) = tree.property_mut(node) {
                        property.values = values;
                    }
                    expanded.push(node);
                }
                Lists::Variable(name) => {
                    self.expand_variable(tree, node, name, expanding, &mut expanded);
                }
            }
        }

        *nodes = expanded;
    }

    /// Appends the nodes of the value of the variable `name` to `out`.
    /// Nothing gets appended if the variable is undefined.
    fn expand_variable(
        &mut self,
        tree: &mut AbstractTree,
        reference: NodeId,
        name: SmolStr,
        expanding: &mut Vec<SmolStr>,
        out: &mut Vec<NodeId>,
    ) {
        let Some(value) = self.lookup_variable(tree, reference, &name) else {
            self.report_at(
                tree,
                reference,
                CompileErrorCode::UndefinedVariable,
                format!("${name}"),
            );
            return;
        };

        if expanding.contains(&name) {
            self.report_at(
                tree,
                reference,
                CompileErrorCode::RecursiveVariable,
                format!("${name} refers to itself"),
            );
            return;
        }

        let (file, line, parent) = {
            let node = &tree[reference];
            (node.file.clone(), node.line, node.parent)
        };
        tracing::trace!("Expanding ${name} in {file}({line})");

        let chunk = parse_chunk(&value, &file, line);
        self.report_parse_errors(&chunk);
        let mut nodes = self.build(tree, &chunk);
        for node in &nodes {
            tree[*node].parent = parent;
        }

        expanding.push(name);
        self.expand_list(tree, &mut nodes, expanding);
        expanding.pop();

        out.extend(nodes);
    }

    /// Looks up `name` in the enclosing objects of `node`, innermost first,
    /// and in the environment afterwards
    fn lookup_variable(&self, tree: &AbstractTree, node: NodeId, name: &str) -> Option<SmolStr> {
        let mut scope = tree.enclosing_object(node);
        while let Some(object_id) = scope {
            if let Some(value) = tree.object(object_id).and_then(|object| object.variable(name)) {
                return Some(value.clone());
            }
            scope = tree.enclosing_object(object_id);
        }
        self.environment.get(name).cloned()
    }
}
