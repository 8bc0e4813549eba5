//! The mortar script compiler.
//!
//! Look at [`ScriptCompiler`] to see how to compile a script.
//!
//! A compilation runs these passes:
//! 1. The script gets parsed into concrete nodes by [mortar_parser].
//! 2. The concrete nodes get converted into an abstract tree by [mortar_ast].
//! 3. Imports get loaded through an [`ImportLoader`].
//! 4. The bases of objects get overlaid onto them.
//! 5. Variable references get replaced by the values of the variables.
//!
//! Finally, every top-level node that is not abstract gets handed to
//! the [`Translator`] returned by the [`TranslatorLookup`].

pub use mortar_ast as ast;
pub use mortar_common as common;
pub use mortar_error as error;
pub use mortar_parser as parser;

mod compiler;
mod diagnostics;
mod imports;
mod listener;
mod loader;
mod overlay;
mod translator;
mod variables;

pub use compiler::{CompileOptions, ScriptCompiler};
pub use diagnostics::Diagnostics;
pub use listener::CompilerListener;
pub use loader::{FileLoader, ImportLoader, ScriptSource};
pub use translator::{
    PropertyHandler, PropertyHandlers, TranslateContext, Translator, TranslatorLookup,
    TranslatorRegistry,
};
