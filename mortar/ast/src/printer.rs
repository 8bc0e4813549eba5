use std::fmt::{self, Display, Write};

use itertools::Itertools;

use crate::{AbstractNodeKind, AbstractTree, NodeId};

/// Renders a node and its children in script syntax
pub struct TreeDisplay<'a> {
    tree: &'a AbstractTree,
    node: NodeId,
    indent: usize,
}

impl AbstractTree {
    pub fn display(&self, node: NodeId) -> TreeDisplay<'_> {
        TreeDisplay {
            tree: self,
            node,
            indent: 0,
        }
    }

    /// Renders all of `nodes`
    pub fn display_all(&self, nodes: &[NodeId]) -> String {
        nodes.iter().map(|node| self.display(*node)).join("")
    }
}

impl TreeDisplay<'_> {
    fn nested(&self, node: NodeId) -> Self {
        TreeDisplay {
            tree: self.tree,
            node,
            indent: self.indent + 1,
        }
    }

    fn write_indent(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = self.indent * 4)
    }
}

impl Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indent(f)?;

        let AbstractNodeKind::Object(object) = &self.tree[self.node].kind else {
            return writeln!(f, "{}", Inline(self.tree, self.node));
        };

        if object.is_abstract {
            f.write_str("abstract ")?;
        }
        f.write_str(&object.class)?;
        if !object.name.is_empty() {
            write!(f, " {}", Quoted(&object.name))?;
        }
        for value in &object.values {
            write!(f, " {}", Inline(self.tree, *value))?;
        }
        if !object.bases.is_empty() {
            write!(f, " : {}", object.bases.iter().map(|base| Quoted(base)).join(" "))?;
        }
        writeln!(f)?;

        self.write_indent(f)?;
        writeln!(f, "{{")?;
        for (name, value) in object.variables.iter().sorted() {
            self.nested(self.node).write_indent(f)?;
            writeln!(f, "set ${name} {}", Quoted(value))?;
        }
        for child in &object.children {
            Display::fmt(&self.nested(*child), f)?;
        }
        self.write_indent(f)?;
        writeln!(f, "}}")
    }
}

/// Renders a non-object node on a single line
struct Inline<'a>(&'a AbstractTree, NodeId);

impl Display for Inline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Inline(tree, node) = *self;
        match &tree[node].kind {
            AbstractNodeKind::Atom(atom) => Quoted(&atom.value).fmt(f),
            AbstractNodeKind::VariableAccess(access) => write!(f, "${}", access.name),
            AbstractNodeKind::Import(import) => {
                write!(f, "import {} from {}", import.target, Quoted(&import.source))
            }
            AbstractNodeKind::Property(property) => {
                f.write_str(&property.name)?;
                for value in &property.values {
                    write!(f, " {}", Inline(tree, *value))?;
                }
                Ok(())
            }
            AbstractNodeKind::Object(object) => f.write_str(&object.class),
        }
    }
}

/// Writes a value, quoting it if it would not be read back as a single word
struct Quoted<'a>(&'a str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let needs_quotes = self.0.is_empty()
            || self.0.starts_with('$')
            || self
                .0
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | ':' | '"'));
        if needs_quotes {
            f.write_char('"')?;
            f.write_str(self.0)?;
            f.write_char('"')
        } else {
            f.write_str(self.0)
        }
    }
}
