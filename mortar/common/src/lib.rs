//! Common items used by the script compiler

pub mod file_provider;

mod input_file;
pub use input_file::{Code, InputFiles};

mod compile_context;
pub use compile_context::{CompilationId, CompileContext};

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
