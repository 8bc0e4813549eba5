//! Abstract representation of a script
//!
//! The concrete nodes of the parser get converted into typed nodes, which are
//! stored in an [`AbstractTree`] arena. The compiler passes and the translators
//! only ever see this representation.

mod builder;
mod exclusion;
pub mod keywords;
pub mod nodes;
mod printer;

pub use builder::AstBuilder;
pub use exclusion::{DefaultNameExclusion, NameExclusion};
pub use keywords::{Keyword, KeywordTable};
pub use nodes::{
    AbstractNode, AbstractNodeKind, AbstractTree, Atom, Import, NodeId, Object, Property,
    VariableAccess, Variables,
};
pub use printer::TreeDisplay;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// The global variables of a compilation, set by top-level `set` statements
pub type Environment = FxHashMap<SmolStr, SmolStr>;
