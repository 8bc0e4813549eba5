use mortar_ast::{AbstractTree, AstBuilder, Environment, KeywordTable, NodeId};
use mortar_common::{Code, CompileContext};
use mortar_error::CompileError;
use mortar_parser::{parse, ConcreteTree};
use smol_str::SmolStr;

use crate::{
    imports::{ImportMode, ImportState},
    listener::ListenerExclusion,
    CompilerListener, Diagnostics, ImportLoader, TranslateContext, TranslatorLookup,
};

/// Selects the passes that [`ScriptCompiler::compile`] runs before translating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub imports: bool,
    pub objects: bool,
    pub variables: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            imports: true,
            objects: true,
            variables: true,
        }
    }
}

/// Compiles scripts into abstract nodes and hands them to the translators.
///
/// A compiler can be reused, every call to one of the `compile` methods starts
/// with an empty error list, environment and import cache.
pub struct ScriptCompiler {
    /// Keeps the text of every compiled script, so errors can be rendered
    pub compile_context: CompileContext,
    pub(crate) keywords: KeywordTable,
    pub(crate) loader: Option<Box<dyn ImportLoader>>,
    pub(crate) translators: Box<dyn TranslatorLookup>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) environment: Environment,
    pub(crate) imports: ImportState,
    pub(crate) resource_group: SmolStr,
    tree: AbstractTree,
}

impl ScriptCompiler {
    pub fn new(translators: impl TranslatorLookup + 'static) -> Self {
        ScriptCompiler {
            compile_context: CompileContext::default(),
            keywords: KeywordTable::default(),
            loader: None,
            translators: Box::new(translators),
            diagnostics: Diagnostics::default(),
            environment: Environment::default(),
            imports: ImportState::default(),
            resource_group: SmolStr::default(),
            tree: AbstractTree::default(),
        }
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn with_loader(mut self, loader: impl ImportLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl CompilerListener + 'static) -> Self {
        self.diagnostics.set_listener(Some(Box::new(listener)));
        self
    }

    pub fn set_translators(&mut self, translators: impl TranslatorLookup + 'static) {
        self.translators = Box::new(translators);
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn keywords_mut(&mut self) -> &mut KeywordTable {
        &mut self.keywords
    }

    /// The errors of the last compilation
    pub fn errors(&self) -> &[CompileError] {
        self.diagnostics.errors()
    }

    /// The global variables of the last compilation
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// The tree of the last call to [`ScriptCompiler::compile_str`] or [`ScriptCompiler::compile_concrete`].
    /// Its roots are the nodes that were handed to the translators.
    pub fn tree(&self) -> &AbstractTree {
        &self.tree
    }

    /// Renders every error of the last compilation
    pub fn format_errors(&self) -> Vec<String> {
        self.errors()
            .iter()
            .map(|error| error.format(&self.compile_context))
            .collect()
    }

    fn reset(&mut self, group: &str) {
        self.compile_context.compilation_id = self.compile_context.compilation_id.next();
        self.diagnostics.clear();
        self.environment.clear();
        self.imports.clear();
        self.resource_group = group.into();
    }

    /// Parses `source` and compiles it.
    /// Returns `true` if no errors were reported.
    pub fn compile_str(&mut self, source: &str, file: &str, group: &str) -> bool {
        self.compile_context.add_input_file(Code {
            source: source.into(),
            path: file.into(),
        });
        let concrete = parse(source, file);
        self.compile_concrete(&concrete, group)
    }

    /// Compiles a parsed script.
    ///
    /// Import statements are removed from the top-level nodes once they were resolved.
    pub fn compile_concrete(&mut self, concrete: &ConcreteTree, group: &str) -> bool {
        self.reset(group);
        tracing::debug!(
            compilation = self.compile_context.compilation_id.0,
            group,
            "Compiling '{}'",
            concrete.file
        );

        self.report_parse_errors(concrete);
        if let Some(listener) = self.diagnostics.listener_mut() {
            listener.pre_conversion(concrete);
        }

        let mut tree = AbstractTree::default();
        let mut nodes = self.build(&mut tree, concrete);

        self.imports.in_progress.insert(concrete.file.clone());
        self.run_passes(&mut tree, &mut nodes, CompileOptions::default(), ImportMode::Strip);
        tree.roots = nodes;

        let translate = self
            .diagnostics
            .listener_mut()
            .map_or(true, |listener| listener.post_conversion(&tree, &tree.roots));
        if translate {
            self.translate(&tree, &tree.roots);
        } else {
            tracing::debug!("Translation skipped by the listener");
        }

        self.imports.clear();
        self.tree = tree;
        self.diagnostics.is_empty()
    }

    /// Runs the selected passes on the roots of `tree` and translates them.
    /// Returns `true` if no errors were reported.
    pub fn compile(&mut self, tree: &mut AbstractTree, group: &str, options: CompileOptions) -> bool {
        self.reset(group);
        tracing::debug!(
            compilation = self.compile_context.compilation_id.0,
            group,
            ?options,
            "Compiling {} nodes",
            tree.roots.len()
        );

        let mut nodes = std::mem::take(&mut tree.roots);
        self.run_passes(tree, &mut nodes, options, ImportMode::Keep);
        self.translate(tree, &nodes);
        tree.roots = nodes;
        self.diagnostics.is_empty()
    }

    /// Converts a parsed script into abstract nodes without running any pass.
    ///
    /// Top-level assignments go into the environment, which gets cleared
    /// by the next compilation.
    pub fn build_tree(&mut self, concrete: &ConcreteTree) -> AbstractTree {
        self.report_parse_errors(concrete);
        let mut tree = AbstractTree::default();
        tree.roots = self.build(&mut tree, concrete);
        tree
    }

    fn run_passes(
        &mut self,
        tree: &mut AbstractTree,
        nodes: &mut Vec<NodeId>,
        options: CompileOptions,
        mode: ImportMode,
    ) {
        if options.imports {
            self.process_imports(tree, nodes, mode);
            tracing::debug!(
                "Imports resolved, {} objects imported",
                self.imports.table.len()
            );
        }
        self.imports.in_progress.clear();

        if options.objects {
            let top = nodes.clone();
            self.process_objects(tree, nodes, &top);
            tracing::debug!("Bases applied");
        }
        if options.variables {
            self.process_variables(tree, nodes);
            tracing::debug!("Variables expanded");
        }
    }

    pub(crate) fn report_parse_errors(&mut self, concrete: &ConcreteTree) {
        self.diagnostics.extend(
            concrete
                .errors
                .iter()
                .map(|error| error.to_compile_error(&concrete.file)),
        );
    }

    /// Converts the top-level nodes of `concrete` into nodes of `tree`
    pub(crate) fn build(&mut self, tree: &mut AbstractTree, concrete: &ConcreteTree) -> Vec<NodeId> {
        let exclusion = ListenerExclusion {
            listener: self.diagnostics.listener(),
        };
        let mut builder = AstBuilder::new(tree, &self.keywords, &mut self.environment, &exclusion);
        let nodes = builder.build(concrete);
        let errors = std::mem::take(&mut builder.errors);
        self.diagnostics.extend(errors);
        nodes
    }

    fn translate(&mut self, tree: &AbstractTree, nodes: &[NodeId]) {
        for &node in nodes {
            if tree.object(node).is_some_and(|object| object.is_abstract) {
                continue;
            }
            let Some(translator) = self.translators.translator(tree, node) else {
                continue;
            };
            let mut ctx = TranslateContext::new(
                tree,
                &self.keywords,
                &self.resource_group,
                &mut self.diagnostics,
            );
            translator.translate(&mut ctx, node);
        }
    }
}
