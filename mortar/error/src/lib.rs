//! Compilation error handling
//!
//! Every pass of the compiler records [`CompileError`]s instead of aborting,
//! so a single compilation can report many independent problems.
use std::fmt::{self, Display, Formatter};

use annotate_snippets::{display_list::DisplayList, snippet::AnnotationType};
use mortar_common::CompileContext;
use smol_str::SmolStr;

pub use snippet::{AnnotationOwned, SliceOwned, SnippetOwned, SourceAnnotationOwned};
pub use utils::{display_expected_of, display_expected_of_any};

mod snippet;
mod utils;

/// Used to determine whether the error messages should use console colors
/// Or be plain text
pub const COLORED: bool = cfg!(feature = "colored_errors");

pub trait AsAnnotationSnippet<'a> {
    fn as_annotation_snippet(&self, ctx: &'a CompileContext) -> SnippetOwned<'a>;

    fn to_string(&self, ctx: &'a CompileContext) -> String {
        let snippet = self.as_annotation_snippet(ctx);
        let display_list = DisplayList::from(snippet.as_snippet());
        display_list.to_string()
    }
}

/// The reason of a [`CompileError`]
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, thiserror::Error)]
pub enum CompileErrorCode {
    #[error("string expected")]
    StringExpected,
    #[error("number expected")]
    NumberExpected,
    #[error("fewer parameters expected")]
    FewerParametersExpected,
    #[error("variable expected")]
    VariableExpected,
    #[error("undefined variable")]
    UndefinedVariable,
    #[error("object identifier expected")]
    ObjectNameExpected,
    #[error("object allocation error")]
    ObjectAllocationError,
    #[error("invalid parameters")]
    InvalidParameters,
    #[error("duplicate override")]
    DuplicateOverride,
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("object base not found")]
    ObjectBaseNotFound,
    #[error("reference to a non existing object")]
    ReferenceToNonExistingObject,
    #[error("circular import")]
    CircularImport,
    #[error("recursive variable")]
    RecursiveVariable,
}

/// A single diagnostic, located by file name and 1-based line
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct CompileError {
    pub code: CompileErrorCode,
    pub file: SmolStr,
    pub line: u32,
    pub message: Option<String>,
}

impl CompileError {
    pub fn new(code: CompileErrorCode, file: impl Into<SmolStr>, line: u32) -> Self {
        CompileError {
            code,
            file: file.into(),
            line,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Renders this error as an annotated source snippet.
    /// Falls back to the title only if the source of the file is not known.
    pub fn format(&self, ctx: &CompileContext) -> String {
        <Self as AsAnnotationSnippet>::to_string(self, ctx)
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Compiler error: {} in {}({})",
            self.code, self.file, self.line
        )?;
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => write!(f, ": {message}"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for CompileError {}

impl<'a> AsAnnotationSnippet<'a> for CompileError {
    fn as_annotation_snippet(&self, ctx: &'a CompileContext) -> SnippetOwned<'a> {
        let slices = ctx
            .input_files
            .get_input(&self.file)
            .and_then(|code| {
                let line = code.line(self.line)?;
                SliceOwned::for_line(line, self.line, code.path.as_str())
            })
            .into_iter()
            .collect();

        let footer = self
            .message
            .iter()
            .filter(|message| !message.is_empty())
            .map(|message| AnnotationOwned {
                annotation_type: AnnotationType::Note,
                id: None,
                label: Some(message.clone().into()),
            })
            .collect();

        SnippetOwned {
            annotation_type: AnnotationType::Error,
            id: None,
            title: format!("{} in {}({})", self.code, self.file, self.line).into(),
            slices,
            footer,
        }
    }
}
