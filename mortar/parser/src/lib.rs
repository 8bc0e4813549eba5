//! Lexer and parser for the script language.
//!
//! The output is a forest of untyped [`node::ConcreteNode`]s. Each node has a token,
//! a source location and a list of children. Giving the nodes a meaning is the job
//! of the abstract tree builder.

pub mod error;
pub mod node;
pub mod parser;
pub mod syntax_tree;
pub mod token;

pub use node::{ConcreteNode, ConcreteNodeId, ConcreteNodeKind};
pub use parser::{parse, parse_chunk};
pub use syntax_tree::ConcreteTree;
