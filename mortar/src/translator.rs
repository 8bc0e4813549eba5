//! Hands the compiled nodes to user supplied translators

use mortar_ast::{keywords, AbstractNodeKind, AbstractTree, KeywordTable, NodeId};
use mortar_error::{CompileError, CompileErrorCode};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::Diagnostics;

/// Everything a [`Translator`] may access while translating a node
pub struct TranslateContext<'a> {
    pub tree: &'a AbstractTree,
    pub keywords: &'a KeywordTable,
    pub resource_group: &'a str,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> TranslateContext<'a> {
    pub fn new(
        tree: &'a AbstractTree,
        keywords: &'a KeywordTable,
        resource_group: &'a str,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        TranslateContext {
            tree,
            keywords,
            resource_group,
            diagnostics,
        }
    }

    /// Reports an error at the location of `node`
    pub fn error(&mut self, code: CompileErrorCode, node: NodeId) {
        let node = &self.tree[node];
        self.diagnostics
            .report(CompileError::new(code, node.file.clone(), node.line));
    }

    pub fn error_with_message(
        &mut self,
        code: CompileErrorCode,
        node: NodeId,
        message: impl Into<String>,
    ) {
        let node = &self.tree[node];
        self.diagnostics.report(
            CompileError::new(code, node.file.clone(), node.line).with_message(message),
        );
    }

    /// The values of a property or object, empty for every other node
    pub fn values(&self, node: NodeId) -> &'a [NodeId] {
        let tree = self.tree;
        match &tree[node].kind {
            AbstractNodeKind::Property(property) => &property.values,
            AbstractNodeKind::Object(object) => &object.values,
            _ => &[],
        }
    }

    /// Reads `node` as a string, reporting [`CompileErrorCode::StringExpected`] otherwise
    pub fn string(&mut self, node: NodeId) -> Option<&'a str> {
        let tree = self.tree;
        match tree.atom(node) {
            Some(atom) => Some(atom.value.as_str()),
            None => {
                self.error(CompileErrorCode::StringExpected, node);
                None
            }
        }
    }

    /// Reads `node` as a number, reporting [`CompileErrorCode::NumberExpected`] otherwise
    pub fn number(&mut self, node: NodeId) -> Option<f32> {
        let value = self
            .tree
            .atom(node)
            .and_then(|atom| atom.value.parse::<f32>().ok());
        if value.is_none() {
            self.error(CompileErrorCode::NumberExpected, node);
        }
        value
    }

    /// Reads one of the boolean keywords, like `on` or `false`
    pub fn boolean(&mut self, node: NodeId) -> Option<bool> {
        match self.tree.atom(node).and_then(|atom| atom.id) {
            Some(keywords::ID_ON) => Some(true),
            Some(keywords::ID_OFF) => Some(false),
            _ => {
                self.error(CompileErrorCode::InvalidParameters, node);
                None
            }
        }
    }
}

/// Converts a compiled node into some resource
pub trait Translator {
    fn translate(&mut self, ctx: &mut TranslateContext<'_>, node: NodeId);
}

/// Selects the translator for a top-level node
pub trait TranslatorLookup {
    /// Returns `None` if the node should be skipped
    fn translator(&mut self, tree: &AbstractTree, node: NodeId) -> Option<&mut dyn Translator>;
}

/// A [`TranslatorLookup`] that picks translators by object class or property name
#[derive(Default)]
pub struct TranslatorRegistry {
    objects: FxHashMap<SmolStr, Box<dyn Translator>>,
    properties: FxHashMap<SmolStr, Box<dyn Translator>>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_object(
        &mut self,
        class: impl Into<SmolStr>,
        translator: impl Translator + 'static,
    ) -> Option<Box<dyn Translator>> {
        self.objects.insert(class.into(), Box::new(translator))
    }

    pub fn register_property(
        &mut self,
        name: impl Into<SmolStr>,
        translator: impl Translator + 'static,
    ) -> Option<Box<dyn Translator>> {
        self.properties.insert(name.into(), Box::new(translator))
    }

    #[must_use]
    pub fn with_object(mut self, class: &str, translator: impl Translator + 'static) -> Self {
        self.register_object(class, translator);
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: &str, translator: impl Translator + 'static) -> Self {
        self.register_property(name, translator);
        self
    }
}

impl TranslatorLookup for TranslatorRegistry {
    fn translator(&mut self, tree: &AbstractTree, node: NodeId) -> Option<&mut dyn Translator> {
        let translator = match &tree[node].kind {
            AbstractNodeKind::Object(object) => self.objects.get_mut(object.class.as_str()),
            AbstractNodeKind::Property(property) => {
                self.properties.get_mut(property.name.as_str())
            }
            _ => None,
        }?;
        Some(translator.as_mut())
    }
}

/// Signature of a function that applies a single property to `T`
pub type PropertyHandler<T> = fn(&mut T, &mut TranslateContext<'_>, NodeId);

/// Maps property names to the functions that handle them.
///
/// Translators for objects usually keep one of these to
/// process the children of the translated object.
pub struct PropertyHandlers<T> {
    handlers: FxHashMap<SmolStr, PropertyHandler<T>>,
}

impl<T> Default for PropertyHandlers<T> {
    fn default() -> Self {
        PropertyHandlers {
            handlers: FxHashMap::default(),
        }
    }
}

impl<T> PropertyHandlers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, handler: PropertyHandler<T>) -> Self {
        self.register(name, handler);
        self
    }

    pub fn register(&mut self, name: impl Into<SmolStr>, handler: PropertyHandler<T>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<PropertyHandler<T>> {
        self.handlers.get(name).copied()
    }

    /// Calls the handler of the property `node`.
    ///
    /// Reports [`CompileErrorCode::UnexpectedToken`] if there is no such handler
    /// and returns whether a handler was found.
    pub fn dispatch(&self, target: &mut T, ctx: &mut TranslateContext<'_>, node: NodeId) -> bool {
        let tree = ctx.tree;
        let Some(property) = tree.property(node) else {
            return false;
        };
        match self.get(&property.name) {
            Some(handler) => {
                handler(target, ctx, node);
                true
            }
            None => {
                let message = format!("unknown property '{}'", property.name);
                ctx.error_with_message(CompileErrorCode::UnexpectedToken, node, message);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mortar_ast::{AbstractNode, Atom, Property};

    use super::*;

    #[derive(Default)]
    struct Pass {
        depth_check: Option<bool>,
        lighting: Option<bool>,
    }

    fn depth_check(pass: &mut Pass, ctx: &mut TranslateContext<'_>, node: NodeId) {
        if let [value] = ctx.values(node) {
            pass.depth_check = ctx.boolean(*value);
        }
    }

    fn lighting(pass: &mut Pass, ctx: &mut TranslateContext<'_>, node: NodeId) {
        if let [value] = ctx.values(node) {
            pass.lighting = ctx.boolean(*value);
        }
    }

    fn property(tree: &mut AbstractTree, name: &str, value: &str, id: Option<u32>) -> NodeId {
        let property = tree.push(AbstractNode {
            file: "test".into(),
            line: 1,
            parent: None,
            kind: AbstractNodeKind::Property(Property {
                name: name.into(),
                id: None,
                values: vec![],
            }),
        });
        let atom = tree.push(AbstractNode {
            file: "test".into(),
            line: 1,
            parent: Some(property),
            kind: AbstractNodeKind::Atom(Atom {
                value: value.into(),
                id,
            }),
        });
        tree.property_mut(property).unwrap().values.push(atom);
        property
    }

    #[test]
    fn dispatches_properties_by_name() {
        let mut tree = AbstractTree::default();
        let depth = property(&mut tree, "depth_check", "off", Some(keywords::ID_OFF));
        let light = property(&mut tree, "lighting", "yes", Some(keywords::ID_ON));
        let unknown = property(&mut tree, "fog", "on", Some(keywords::ID_ON));

        let handlers = PropertyHandlers::<Pass>::new()
            .with("depth_check", depth_check)
            .with("lighting", lighting);
        let keywords = KeywordTable::default();
        let mut diagnostics = Diagnostics::default();
        let mut ctx = TranslateContext::new(&tree, &keywords, "General", &mut diagnostics);

        let mut pass = Pass::default();
        assert!(handlers.dispatch(&mut pass, &mut ctx, depth));
        assert!(handlers.dispatch(&mut pass, &mut ctx, light));
        assert!(!handlers.dispatch(&mut pass, &mut ctx, unknown));

        assert_eq!(pass.depth_check, Some(false));
        assert_eq!(pass.lighting, Some(true));
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(
            diagnostics.errors()[0].code,
            CompileErrorCode::UnexpectedToken
        );
    }

    #[test]
    fn reports_wrong_value_types() {
        let mut tree = AbstractTree::default();
        let width = property(&mut tree, "width", "wide", None);
        let value = tree.property(width).unwrap().values[0];

        let keywords = KeywordTable::default();
        let mut diagnostics = Diagnostics::default();
        let mut ctx = TranslateContext::new(&tree, &keywords, "General", &mut diagnostics);

        assert_eq!(ctx.number(value), None);
        assert_eq!(ctx.string(value), Some("wide"));
        assert_eq!(ctx.string(width), None);
        assert_eq!(ctx.boolean(value), None);

        let codes: Vec<_> = diagnostics.errors().iter().map(|error| error.code).collect();
        assert_eq!(
            codes,
            [
                CompileErrorCode::NumberExpected,
                CompileErrorCode::StringExpected,
                CompileErrorCode::InvalidParameters
            ]
        );
    }
}
