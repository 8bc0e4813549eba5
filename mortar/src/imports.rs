//! Resolves `import target from source` statements

use indexmap::map::Entry;
use mortar_ast::{AbstractNodeKind, AbstractTree, NodeId};
use mortar_common::{Code, FxIndexMap};
use mortar_error::{CompileError, CompileErrorCode};
use mortar_parser::parse;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::{ScriptCompiler, ScriptSource};

/// Whether resolved import statements stay in the node list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImportMode {
    Keep,
    Strip,
}

/// The objects requested from a single source
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ImportRequest {
    All,
    Named(Vec<SmolStr>),
}

#[derive(Debug, Default)]
pub(crate) struct ImportState {
    /// The processed top-level nodes of every source that was loaded.
    /// Sources that could not be loaded are stored as `None`.
    pub loaded: FxIndexMap<SmolStr, Option<Vec<NodeId>>>,
    /// Requests that were not moved into the import table yet
    pub requests: FxIndexMap<SmolStr, ImportRequest>,
    /// The imported objects which can be used as bases
    pub table: Vec<NodeId>,
    /// Sources which are currently being resolved
    pub in_progress: FxHashSet<SmolStr>,
}

impl ImportState {
    pub fn clear(&mut self) {
        self.loaded.clear();
        self.requests.clear();
        self.table.clear();
        self.in_progress.clear();
    }

    /// Records that `target` should be imported from `source`.
    ///
    /// Importing `*` replaces every named request of the source,
    /// named requests after a `*` are already covered by it.
    pub fn request(&mut self, source: SmolStr, target: SmolStr) {
        if target == "*" {
            self.requests.insert(source, ImportRequest::All);
            return;
        }

        match self.requests.entry(source) {
            Entry::Occupied(mut entry) => match entry.get_mut() {
                ImportRequest::All => {}
                ImportRequest::Named(names) => {
                    if !names.contains(&target) {
                        names.push(target);
                    }
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(ImportRequest::Named(vec![target]));
            }
        }
    }
}

impl ScriptCompiler {
    /// Loads the sources of every import in `nodes` and fills the import table.
    ///
    /// The first node is never treated as an import.
    pub(crate) fn process_imports(
        &mut self,
        tree: &mut AbstractTree,
        nodes: &mut Vec<NodeId>,
        mode: ImportMode,
    ) {
        if nodes.first().is_some_and(|node| is_import(tree, *node)) {
            let node = &tree[nodes[0]];
            tracing::warn!(
                "{}({}): import statements on the first node are ignored",
                node.file,
                node.line
            );
        }

        let mut index = 1;
        while index < nodes.len() {
            let node = nodes[index];
            let AbstractNodeKind::Import(import) = &tree[node].kind else {
                index += 1;
                continue;
            };
            let import = import.clone();

            self.load_import(tree, node, &import.source);
            self.check_import_target(tree, node, &import.source, &import.target);
            self.imports.request(import.source, import.target);

            match mode {
                ImportMode::Keep => index += 1,
                ImportMode::Strip => {
                    nodes.remove(index);
                }
            }
        }

        self.resolve_requests(tree);
    }

    /// Loads and processes `source`, unless it was loaded before
    fn load_import(&mut self, tree: &mut AbstractTree, import: NodeId, source: &SmolStr) {
        if self.imports.loaded.contains_key(source) {
            return;
        }

        if self.imports.in_progress.contains(source) {
            self.report_at(
                tree,
                import,
                CompileErrorCode::CircularImport,
                format!("'{source}' is already being imported"),
            );
            return;
        }

        if let Some(listener) = self.diagnostics.listener_mut() {
            listener.import_file(source);
        }

        let group = self.resource_group.clone();
        let script = self
            .loader
            .as_mut()
            .and_then(|loader| loader.load(source, &group));
        let Some(script) = script else {
            self.report_at(
                tree,
                import,
                CompileErrorCode::ReferenceToNonExistingObject,
                format!("could not load '{source}'"),
            );
            self.imports.loaded.insert(source.clone(), None);
            return;
        };

        let concrete = match script {
            ScriptSource::Text(text) => {
                let concrete = parse(&text, source);
                self.compile_context.add_input_file(Code {
                    source: text,
                    path: source.clone(),
                });
                concrete
            }
            ScriptSource::Tree(concrete) => concrete,
        };
        tracing::debug!("Loaded import '{source}'");
        self.report_parse_errors(&concrete);

        self.imports.in_progress.insert(source.clone());
        let mut nodes = self.build(tree, &concrete);
        self.process_imports(tree, &mut nodes, ImportMode::Keep);
        let top = nodes.clone();
        self.process_objects(tree, &nodes, &top);
        self.imports.in_progress.remove(source);

        self.imports.loaded.insert(source.clone(), Some(nodes));
    }

    fn check_import_target(
        &mut self,
        tree: &AbstractTree,
        import: NodeId,
        source: &str,
        target: &str,
    ) {
        if target == "*" {
            return;
        }
        let Some(Some(nodes)) = self.imports.loaded.get(source) else {
            return;
        };
        if tree.find_object(nodes, target).is_none() {
            self.report_at(
                tree,
                import,
                CompileErrorCode::ReferenceToNonExistingObject,
                format!("'{source}' does not contain '{target}'"),
            );
        }
    }

    /// Moves the requested objects into the import table
    fn resolve_requests(&mut self, tree: &AbstractTree) {
        let requests = std::mem::take(&mut self.imports.requests);
        for (source, request) in requests {
            let Some(Some(nodes)) = self.imports.loaded.get(&source) else {
                continue;
            };

            let imported: Vec<NodeId> = match request {
                ImportRequest::All => nodes.clone(),
                ImportRequest::Named(names) => names
                    .iter()
                    .filter_map(|name| tree.find_object(nodes, name))
                    .collect(),
            };

            let table = &mut self.imports.table;
            let new: Vec<NodeId> = imported
                .into_iter()
                .filter(|node| !table.contains(node))
                .collect();
            table.splice(0..0, new);
        }
    }

    pub(crate) fn report_at(
        &mut self,
        tree: &AbstractTree,
        node: NodeId,
        code: CompileErrorCode,
        message: String,
    ) {
        let node = &tree[node];
        self.diagnostics
            .report(CompileError::new(code, node.file.clone(), node.line).with_message(message));
    }
}

fn is_import(tree: &AbstractTree, node: NodeId) -> bool {
    matches!(tree[node].kind, AbstractNodeKind::Import(_))
}
