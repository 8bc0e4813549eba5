use crate::{Code, InputFiles};

/// The id of a single compilation run of a compiler instance
#[derive(Debug, Eq, PartialEq, Copy, Clone, Ord, PartialOrd, Hash, Default)]
pub struct CompilationId(pub u32);

impl CompilationId {
    pub fn next(self) -> Self {
        CompilationId(self.0.wrapping_add(1))
    }
}

/// The Compilation context stores information that outlives the passes of a single compilation
#[derive(Debug, Default)]
pub struct CompileContext {
    pub compilation_id: CompilationId,
    /// The script texts, used to render diagnostics
    pub input_files: InputFiles,
}

impl CompileContext {
    pub fn new(compilation_id: CompilationId) -> Self {
        CompileContext {
            compilation_id,
            input_files: Default::default(),
        }
    }

    pub fn add_input_file(&mut self, code: Code) -> usize {
        self.input_files.add_input(code)
    }

    pub fn get_input_file(&self, path: &str) -> Option<&Code> {
        self.input_files.get_input(path)
    }
}
