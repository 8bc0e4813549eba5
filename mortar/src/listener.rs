use mortar_ast::{AbstractTree, DefaultNameExclusion, NameExclusion, NodeId};
use mortar_error::CompileError;
use mortar_parser::ConcreteTree;

/// Hooks into a compilation. Every method has a default that does nothing.
pub trait CompilerListener {
    /// Called before the imported script `source` gets loaded
    fn import_file(&mut self, _source: &str) {}

    /// Called with the parsed script, before it gets converted into abstract nodes
    fn pre_conversion(&mut self, _tree: &ConcreteTree) {}

    /// Called once all passes ran, before the nodes get translated.
    /// Returning `false` skips the translation.
    fn post_conversion(&mut self, _tree: &AbstractTree, _nodes: &[NodeId]) -> bool {
        true
    }

    /// Called for every error.
    /// Returning `true` suppresses the default log message, the error is recorded either way.
    fn handle_error(&mut self, _error: &CompileError) -> bool {
        false
    }

    /// Overrides whether objects of `class` have a name when added to `parent`.
    /// `None` falls back to the builtin rules.
    fn is_name_excluded(
        &self,
        _class: &str,
        _tree: &AbstractTree,
        _parent: Option<NodeId>,
    ) -> Option<bool> {
        None
    }
}

/// Asks the listener first and uses the builtin exclusions otherwise
pub(crate) struct ListenerExclusion<'a> {
    pub listener: Option<&'a dyn CompilerListener>,
}

impl NameExclusion for ListenerExclusion<'_> {
    fn is_name_excluded(&self, class: &str, tree: &AbstractTree, parent: Option<NodeId>) -> bool {
        self.listener
            .and_then(|listener| listener.is_name_excluded(class, tree, parent))
            .unwrap_or_else(|| DefaultNameExclusion.is_name_excluded(class, tree, parent))
    }
}
