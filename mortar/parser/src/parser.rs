use crate::{
    error::{ExpectedItem, ParseErrorKind},
    node::{ConcreteNodeId, ConcreteNodeKind},
    syntax_tree::ConcreteTree,
    token::{tokenize, Token, TokenKind},
};

/// Parses a complete script
pub fn parse(input: &str, file: &str) -> ConcreteTree {
    let mut parser = Parser::new(input, file, 1);
    parser.parse_statements(None);
    parser.tree
}

/// Parses a snippet of script text, like the value of a variable.
///
/// Every value becomes a top-level leaf node, lines start at `first_line`.
/// Structural tokens are not allowed inside of a chunk.
pub fn parse_chunk(input: &str, file: &str, first_line: u32) -> ConcreteTree {
    let mut parser = Parser::new(input, file, first_line);
    loop {
        let token = parser.current().clone();
        match token.kind {
            TokenKind::EndOfInput => break,
            TokenKind::Newline => {
                parser.bump();
            }
            kind if kind.is_value() => {
                parser.bump();
                parser
                    .tree
                    .insert(None, leaf_kind(kind), token.text, token.line);
            }
            _ => parser.error_unexpected(vec![ExpectedItem::Value]),
        }
    }
    parser.tree
}

/// The node kind of a value token which is not the head of a statement
fn leaf_kind(kind: TokenKind) -> ConcreteNodeKind {
    match kind {
        TokenKind::Quote => ConcreteNodeKind::Quote,
        TokenKind::Variable => ConcreteNodeKind::Variable,
        _ => ConcreteNodeKind::Word,
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    pub tree: ConcreteTree,
}

impl Parser {
    pub fn new(input: &str, file: &str, first_line: u32) -> Self {
        Parser {
            tokens: tokenize(input, first_line),
            position: 0,
            tree: ConcreteTree::new(file),
        }
    }

    fn current(&self) -> &Token {
        self.nth(self.position)
    }

    /// Returns the token at `index`, or the final end of input token
    fn nth(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    /// Consumes the current token. Never advances past the end of input.
    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::EndOfInput {
            self.position += 1;
        }
        token
    }

    fn skip_newlines(&mut self) {
        while self.current().kind == TokenKind::Newline {
            self.bump();
        }
    }

    /// Records an error for the current token and skips it
    fn error_unexpected(&mut self, expected: Vec<ExpectedItem>) {
        let token = self.bump();
        self.tree.errors.push(ParseErrorKind::UnexpectedToken {
            got: token.text,
            line: token.line,
            expected,
        });
    }

    /// Parses statements until the end of input or a closing brace
    fn parse_statements(&mut self, parent: Option<ConcreteNodeId>) {
        loop {
            self.skip_newlines();
            match self.current().kind {
                TokenKind::EndOfInput => return,
                TokenKind::RightBrace if parent.is_some() => return,
                kind if kind.is_value() => self.parse_statement(parent),
                _ => self.error_unexpected(vec![ExpectedItem::Statement]),
            }
        }
    }

    /// Parses a single statement: a head token followed by the rest of its line,
    /// optionally followed by a block
    fn parse_statement(&mut self, parent: Option<ConcreteNodeId>) {
        let head = self.bump();
        let kind = match head.kind {
            TokenKind::Word if head.text == "import" => ConcreteNodeKind::Import,
            TokenKind::Word if head.text == "set" => ConcreteNodeKind::VariableAssignment,
            other => leaf_kind(other),
        };
        let node = self.tree.insert(parent, kind, head.text, head.line);

        loop {
            let token = self.current().clone();
            match token.kind {
                TokenKind::Word
                    if kind == ConcreteNodeKind::Import && token.text == "from" =>
                {
                    self.bump();
                }
                value if value.is_value() => {
                    self.bump();
                    self.tree
                        .insert(Some(node), leaf_kind(value), token.text, token.line);
                }
                TokenKind::Colon => self.parse_colon(node),
                TokenKind::LeftBrace => {
                    self.parse_block(node);
                    return;
                }
                TokenKind::Newline => {
                    if self.block_follows(kind) {
                        self.skip_newlines();
                        self.parse_block(node);
                    }
                    return;
                }
                TokenKind::RightBrace | TokenKind::EndOfInput => return,
                _ => self.error_unexpected(vec![
                    ExpectedItem::Value,
                    TokenKind::LeftBrace.into(),
                    TokenKind::Newline.into(),
                ]),
            }
        }
    }

    /// Whether the statement continues with a block on one of the following lines
    fn block_follows(&self, kind: ConcreteNodeKind) -> bool {
        if matches!(
            kind,
            ConcreteNodeKind::Import | ConcreteNodeKind::VariableAssignment
        ) {
            return false;
        }

        let mut index = self.position;
        while self.nth(index).kind == TokenKind::Newline {
            index += 1;
        }
        self.nth(index).kind == TokenKind::LeftBrace
    }

    /// Parses a colon and the base names that follow it
    fn parse_colon(&mut self, parent: ConcreteNodeId) {
        let colon = self.bump();
        let node = self
            .tree
            .insert(Some(parent), ConcreteNodeKind::Colon, colon.text, colon.line);
        while self.current().kind.is_value() {
            let token = self.bump();
            self.tree
                .insert(Some(node), leaf_kind(token.kind), token.text, token.line);
        }
    }

    /// Parses `{ statements }`.
    /// The braces become two consecutive children of `parent`, the statements are
    /// the children of the left brace.
    fn parse_block(&mut self, parent: ConcreteNodeId) {
        let left = self.bump();
        let block = self.tree.insert(
            Some(parent),
            ConcreteNodeKind::LeftBrace,
            left.text,
            left.line,
        );
        self.parse_statements(Some(block));

        let token = self.current().clone();
        if token.kind == TokenKind::RightBrace {
            self.bump();
            self.tree.insert(
                Some(parent),
                ConcreteNodeKind::RightBrace,
                token.text,
                token.line,
            );
        } else {
            self.tree
                .errors
                .push(ParseErrorKind::UnexpectedEndOfInput { line: token.line });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ParseErrorKind,
        node::{ConcreteNodeId, ConcreteNodeKind},
        syntax_tree::ConcreteTree,
    };

    use super::{parse, parse_chunk};

    fn shape(tree: &ConcreteTree, id: ConcreteNodeId) -> (ConcreteNodeKind, String) {
        let node = &tree[id];
        (node.kind, node.token.to_string())
    }

    fn child_shapes(tree: &ConcreteTree, id: ConcreteNodeId) -> Vec<(ConcreteNodeKind, String)> {
        tree[id]
            .children
            .iter()
            .map(|child| shape(tree, *child))
            .collect()
    }

    #[test]
    fn object_with_base_and_block_on_next_line() {
        use ConcreteNodeKind::*;

        let tree = parse("material derived : base\n{\n    receive_shadows on\n}\n", "a");
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        assert_eq!(tree.roots.len(), 1);

        let material = tree.roots[0];
        assert_eq!(
            child_shapes(&tree, material),
            [
                (Word, "derived".into()),
                (Colon, ":".into()),
                (LeftBrace, "{".into()),
                (RightBrace, "}".into())
            ]
        );

        let colon = tree[material].children[1];
        assert_eq!(child_shapes(&tree, colon), [(Word, "base".into())]);

        let block = tree[material].children[2];
        let property = tree[block].children[0];
        assert_eq!(shape(&tree, property), (Word, "receive_shadows".into()));
        assert_eq!(child_shapes(&tree, property), [(Word, "on".into())]);
        assert_eq!(tree[property].line, 3);
        assert_eq!(tree[property].parent, Some(block));
    }

    #[test]
    fn import_drops_from() {
        use ConcreteNodeKind::*;

        let tree = parse("import * from \"base.material\"", "a");
        let import = tree.roots[0];
        assert_eq!(shape(&tree, import), (Import, "import".into()));
        assert_eq!(
            child_shapes(&tree, import),
            [(Word, "*".into()), (Quote, "base.material".into())]
        );
    }

    #[test]
    fn variable_assignment() {
        use ConcreteNodeKind::*;

        let tree = parse("set $colour \"1 0 0\"\nambient $colour", "a");
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(shape(&tree, tree.roots[0]), (VariableAssignment, "set".into()));
        assert_eq!(
            child_shapes(&tree, tree.roots[0]),
            [(Variable, "$colour".into()), (Quote, "1 0 0".into())]
        );
        assert_eq!(
            child_shapes(&tree, tree.roots[1]),
            [(Variable, "$colour".into())]
        );
    }

    #[test]
    fn nested_blocks() {
        let tree = parse("a { b { c 1 } d }", "a");
        assert!(tree.errors.is_empty(), "{:?}", tree.errors);
        let a = tree.roots[0];
        let block = tree[a].children[0];
        assert_eq!(tree[block].children.len(), 2);
        let b = tree[block].children[0];
        assert_eq!(tree[b].children.len(), 2);
    }

    #[test]
    fn missing_closing_brace() {
        let tree = parse("material a\n{\n    ambient 1\n", "a");
        assert!(matches!(
            tree.errors.as_slice(),
            [ParseErrorKind::UnexpectedEndOfInput { line: 4 }]
        ));
    }

    #[test]
    fn stray_closing_brace() {
        let tree = parse("}\nambient 1", "a");
        assert_eq!(tree.errors.len(), 1);
        assert_eq!(tree.roots.len(), 1);
    }

    #[test]
    fn chunk_is_flat() {
        use ConcreteNodeKind::*;

        let tree = parse_chunk("1 \"two words\"\n$three", "a", 7);
        assert!(tree.errors.is_empty());
        let roots: Vec<_> = tree.roots.iter().map(|id| shape(&tree, *id)).collect();
        assert_eq!(
            roots,
            [
                (Word, "1".into()),
                (Quote, "two words".into()),
                (Variable, "$three".into())
            ]
        );
        assert_eq!(tree[tree.roots[2]].line, 8);
    }

    #[test]
    fn chunk_rejects_braces() {
        let tree = parse_chunk("a { b }", "a", 1);
        assert_eq!(tree.errors.len(), 2);
        assert_eq!(tree.roots.len(), 2);
    }
}
