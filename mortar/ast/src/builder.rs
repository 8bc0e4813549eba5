use mortar_error::{CompileError, CompileErrorCode};
use mortar_parser::{ConcreteNode, ConcreteNodeId, ConcreteNodeKind, ConcreteTree};
use smol_str::SmolStr;

use crate::{
    AbstractNode, AbstractNodeKind, AbstractTree, Atom, Environment, Import, KeywordTable,
    NameExclusion, NodeId, Object, Property, VariableAccess,
};

/// Contains the state that is used while converting concrete nodes into abstract nodes
pub struct AstBuilder<'a> {
    pub tree: &'a mut AbstractTree,
    pub keywords: &'a KeywordTable,
    /// Receives the top-level variable assignments
    pub environment: &'a mut Environment,
    pub exclusion: &'a dyn NameExclusion,
    pub errors: Vec<CompileError>,
    /// The node that newly created nodes get attached to
    current: Option<NodeId>,
}

impl<'a> AstBuilder<'a> {
    pub fn new(
        tree: &'a mut AbstractTree,
        keywords: &'a KeywordTable,
        environment: &'a mut Environment,
        exclusion: &'a dyn NameExclusion,
    ) -> Self {
        AstBuilder {
            tree,
            keywords,
            environment,
            exclusion,
            errors: Vec::new(),
            current: None,
        }
    }

    /// Converts every top-level node of `concrete`.
    /// Returns the created top-level nodes, in source order.
    pub fn build(&mut self, concrete: &ConcreteTree) -> Vec<NodeId> {
        self.build_nodes(concrete, &concrete.roots)
    }

    pub fn build_nodes(&mut self, concrete: &ConcreteTree, nodes: &[ConcreteNodeId]) -> Vec<NodeId> {
        self.current = None;
        let mut top_level = Vec::new();
        for node in nodes {
            self.handle_node(concrete, *node, &mut top_level);
        }
        top_level
    }

    fn handle_node(&mut self, concrete: &ConcreteTree, id: ConcreteNodeId, top_level: &mut Vec<NodeId>) {
        let node = &concrete[id];
        let created = match node.kind {
            ConcreteNodeKind::Import if self.current.is_none() => self.handle_import(concrete, node),
            ConcreteNodeKind::VariableAssignment => {
                self.handle_assignment(concrete, node);
                None
            }
            ConcreteNodeKind::Variable if node.children.is_empty() => {
                Some(self.handle_variable(node))
            }
            _ if node.children.is_empty() => Some(self.handle_atom(node)),
            _ if is_object(concrete, node) => self.handle_object(concrete, node),
            _ => Some(self.handle_property(concrete, node)),
        };

        if let Some(created) = created {
            self.attach(created, top_level);
        }
    }

    /// Adds `node` to the current parent, or to the top level
    fn attach(&mut self, node: NodeId, top_level: &mut Vec<NodeId>) {
        let Some(current) = self.current else {
            top_level.push(node);
            return;
        };

        match &mut self.tree[current].kind {
            AbstractNodeKind::Property(property) => property.values.push(node),
            AbstractNodeKind::Object(object) => object.children.push(node),
            _ => unreachable!("Only properties and objects can be the current node"),
        }
    }

    fn error(&mut self, code: CompileErrorCode, node: &ConcreteNode) {
        self.errors
            .push(CompileError::new(code, node.file.clone(), node.line));
    }

    fn push(&mut self, node: &ConcreteNode, kind: AbstractNodeKind) -> NodeId {
        self.tree.push(AbstractNode {
            file: node.file.clone(),
            line: node.line,
            parent: self.current,
            kind,
        })
    }

    /// Checks that a statement has exactly a target and a value
    fn check_arity(&mut self, node: &ConcreteNode) -> bool {
        match node.children.len() {
            2 => true,
            0 | 1 => {
                self.error(CompileErrorCode::StringExpected, node);
                false
            }
            _ => {
                self.error(CompileErrorCode::FewerParametersExpected, node);
                false
            }
        }
    }

    fn handle_import(&mut self, concrete: &ConcreteTree, node: &ConcreteNode) -> Option<NodeId> {
        if !self.check_arity(node) {
            return None;
        }

        let target = concrete[node.children[0]].token.clone();
        let source = concrete[node.children[1]].token.clone();
        Some(self.push(node, AbstractNodeKind::Import(Import { target, source })))
    }

    fn handle_assignment(&mut self, concrete: &ConcreteTree, node: &ConcreteNode) {
        if !self.check_arity(node) {
            return;
        }

        let variable = &concrete[node.children[0]];
        if variable.kind != ConcreteNodeKind::Variable {
            self.error(CompileErrorCode::VariableExpected, variable);
            return;
        }

        let name = variable_name(&variable.token);
        let value = concrete[node.children[1]].token.clone();
        match self.current.and_then(|current| self.tree.object_mut(current)) {
            Some(object) => object.set_variable(name, value),
            None => {
                self.environment.insert(name, value);
            }
        }
    }

    fn handle_variable(&mut self, node: &ConcreteNode) -> NodeId {
        let name = variable_name(&node.token);
        self.push(
            node,
            AbstractNodeKind::VariableAccess(VariableAccess { name }),
        )
    }

    fn handle_atom(&mut self, node: &ConcreteNode) -> NodeId {
        let atom = Atom {
            value: node.token.clone(),
            id: self.keywords.lookup(&node.token),
        };
        self.push(node, AbstractNodeKind::Atom(atom))
    }

    fn handle_property(&mut self, concrete: &ConcreteTree, node: &ConcreteNode) -> NodeId {
        let property = Property {
            name: node.token.clone(),
            id: self.keywords.lookup(&node.token),
            values: Vec::new(),
        };
        let id = self.push(node, AbstractNodeKind::Property(property));
        self.with_current(id, |builder| {
            for child in &node.children {
                builder.handle_node(concrete, *child, &mut Vec::new());
            }
        });
        id
    }

    fn handle_object(&mut self, concrete: &ConcreteTree, node: &ConcreteNode) -> Option<NodeId> {
        let [header @ .., block, _] = node.children.as_slice() else {
            return None;
        };

        let (is_abstract, class, header) = if node.token == "abstract" {
            let Some((class, header)) = header.split_first() else {
                self.error(CompileErrorCode::ObjectNameExpected, node);
                return None;
            };
            (true, concrete[*class].token.clone(), header)
        } else {
            (false, node.token.clone(), header)
        };

        let mut header = header.iter().map(|id| &concrete[*id]).peekable();

        let name = match header.peek() {
            Some(token)
                if matches!(token.kind, ConcreteNodeKind::Word | ConcreteNodeKind::Quote)
                    && !self
                        .exclusion
                        .is_name_excluded(&class, self.tree, self.current) =>
            {
                let name = token.token.clone();
                header.next();
                name
            }
            _ => SmolStr::default(),
        };

        let object = Object {
            id: self.keywords.lookup(&class),
            class,
            name,
            is_abstract,
            ..Default::default()
        };
        let id = self.push(node, AbstractNodeKind::Object(object));

        // Everything up to the first colon is a value, every colon lists bases
        let mut values = Vec::new();
        let mut bases = Vec::new();
        let mut in_bases = false;
        self.with_current(id, |builder| {
            for token in header {
                match token.kind {
                    ConcreteNodeKind::Colon => {
                        in_bases = true;
                        bases.extend(
                            token
                                .children
                                .iter()
                                .map(|base| concrete[*base].token.clone()),
                        );
                    }
                    _ if in_bases => {}
                    ConcreteNodeKind::Variable => values.push(builder.handle_variable(token)),
                    _ => values.push(builder.handle_atom(token)),
                }
            }
        });

        if let Some(object) = self.tree.object_mut(id) {
            object.values = values;
            object.bases = bases;
        }

        self.with_current(id, |builder| {
            for child in &concrete[*block].children {
                builder.handle_node(concrete, *child, &mut Vec::new());
            }
        });

        Some(id)
    }

    /// Runs `f` with `node` as the current node and restores the previous one afterwards
    fn with_current(&mut self, node: NodeId, f: impl FnOnce(&mut Self)) {
        let previous = self.current.replace(node);
        f(self);
        self.current = previous;
    }
}

/// Whether the last two children of `node` are a block
fn is_object(concrete: &ConcreteTree, node: &ConcreteNode) -> bool {
    match node.children.as_slice() {
        [.., left, right] => {
            concrete[*left].kind == ConcreteNodeKind::LeftBrace
                && concrete[*right].kind == ConcreteNodeKind::RightBrace
        }
        _ => false,
    }
}

fn variable_name(token: &str) -> SmolStr {
    token.strip_prefix('$').unwrap_or(token).into()
}

#[cfg(test)]
mod tests {
    use mortar_error::CompileErrorCode;
    use mortar_parser::parse;

    use crate::{
        AbstractNodeKind, AbstractTree, AstBuilder, DefaultNameExclusion, Environment,
        KeywordTable, NodeId,
    };

    struct Built {
        tree: AbstractTree,
        roots: Vec<NodeId>,
        environment: Environment,
        errors: Vec<CompileErrorCode>,
    }

    fn build(source: &str) -> Built {
        let concrete = parse(source, "test.material");
        assert!(concrete.errors.is_empty(), "{:?}", concrete.errors);

        let mut tree = AbstractTree::default();
        let mut environment = Environment::default();
        let keywords = KeywordTable::default();
        let mut builder = AstBuilder::new(&mut tree, &keywords, &mut environment, &DefaultNameExclusion);
        let roots = builder.build(&concrete);
        let errors = builder.errors.iter().map(|error| error.code).collect();
        Built {
            tree,
            roots,
            environment,
            errors,
        }
    }

    #[test]
    fn object_header() {
        let built = build("material derived 1 $x : base other\n{\n}");
        assert!(built.errors.is_empty());
        let object = built.tree.object(built.roots[0]).unwrap();
        assert_eq!(object.class, "material");
        assert_eq!(object.name, "derived");
        assert!(!object.is_abstract);
        assert_eq!(object.bases, ["base", "other"]);
        assert_eq!(object.id, KeywordTable::default().lookup("material"));

        assert_eq!(object.values.len(), 2);
        assert_eq!(built.tree.atom(object.values[0]).unwrap().value, "1");
        assert!(matches!(
            &built.tree[object.values[1]].kind,
            AbstractNodeKind::VariableAccess(access) if access.name == "x"
        ));
        assert_eq!(built.tree[object.values[1]].parent, Some(built.roots[0]));
    }

    #[test]
    fn variable_with_values_is_a_property() {
        let built = build("pass\n{\n    $x 1 2 3\n}");
        assert!(built.errors.is_empty());
        let pass = built.tree.object(built.roots[0]).unwrap();
        let property = built.tree.property(pass.children[0]).unwrap();
        assert_eq!(property.name, "$x");
        let values: Vec<_> = property
            .values
            .iter()
            .map(|value| built.tree.atom(*value).unwrap().value.as_str())
            .collect();
        assert_eq!(values, ["1", "2", "3"]);
    }

    #[test]
    fn abstract_object() {
        let built = build("abstract pass shiny\n{\n    lighting on\n}");
        let object = built.tree.object(built.roots[0]).unwrap();
        assert!(object.is_abstract);
        assert_eq!(object.class, "pass");
        assert_eq!(object.name, "shiny");
        assert_eq!(object.children.len(), 1);

        let property = built.tree.property(object.children[0]).unwrap();
        assert_eq!(property.name, "lighting");
        let value = built.tree.atom(property.values[0]).unwrap();
        assert_eq!(value.id, Some(crate::keywords::ID_ON));
    }

    #[test]
    fn excluded_names_become_values() {
        let built = build("particle_system smoke\n{\n    emitter Point\n    {\n    }\n}");
        let system = built.tree.object(built.roots[0]).unwrap();
        assert_eq!(system.name, "smoke");

        let emitter = built.tree.object(system.children[0]).unwrap();
        assert_eq!(emitter.name, "");
        assert_eq!(built.tree.atom(emitter.values[0]).unwrap().value, "Point");

        // Outside of a particle system the name is kept
        let built = build("emitter Point {}");
        assert_eq!(built.tree.object(built.roots[0]).unwrap().name, "Point");
    }

    #[test]
    fn assignments() {
        let built = build("set $global 1\nmaterial a\n{\n    set $local \"2 3\"\n}");
        assert!(built.errors.is_empty());
        assert_eq!(built.environment.get("global").map(|v| v.as_str()), Some("1"));
        assert!(!built.environment.contains_key("local"));

        let object = built.tree.object(built.roots[0]).unwrap();
        assert_eq!(object.variable("local").map(|v| v.as_str()), Some("2 3"));
        assert!(object.children.is_empty());
    }

    #[test]
    fn arity_errors() {
        let built = build("set $a\nset $a 1 2\nset a 1\nimport a\nimport a from b c");
        assert_eq!(
            built.errors,
            [
                CompileErrorCode::StringExpected,
                CompileErrorCode::FewerParametersExpected,
                CompileErrorCode::VariableExpected,
                CompileErrorCode::StringExpected,
                CompileErrorCode::FewerParametersExpected,
            ]
        );
        assert!(built.roots.is_empty());
    }

    #[test]
    fn imports_only_at_top_level() {
        let built = build("import * from base.material\nmaterial a\n{\n    import x y\n}");
        assert!(matches!(
            &built.tree[built.roots[0]].kind,
            AbstractNodeKind::Import(import) if import.target == "*" && import.source == "base.material"
        ));

        let object = built.tree.object(built.roots[1]).unwrap();
        let nested = built.tree.property(object.children[0]).unwrap();
        assert_eq!(nested.name, "import");
        assert_eq!(nested.values.len(), 2);
    }

    #[test]
    fn properties_and_parents() {
        let built = build("material a\n{\n    technique\n    {\n        pass\n        {\n            ambient 1 0 $b\n        }\n    }\n}");
        let material = built.roots[0];
        let technique = built.tree.object(material).unwrap().children[0];
        let pass = built.tree.object(technique).unwrap().children[0];
        let ambient = built.tree.object(pass).unwrap().children[0];

        assert_eq!(built.tree[technique].parent, Some(material));
        assert_eq!(built.tree[pass].parent, Some(technique));
        let property = built.tree.property(ambient).unwrap();
        assert_eq!(property.values.len(), 3);
        assert_eq!(built.tree[property.values[2]].parent, Some(ambient));
        assert_eq!(built.tree.enclosing_object(property.values[2]), Some(pass));
        assert_eq!(built.tree[ambient].line, 7);
    }
}
