#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use mortar_lang::{
    ast::{AbstractTree, NodeId},
    common::file_provider::MemoryFileProvider,
    error::CompileErrorCode,
    FileLoader, ImportLoader, ScriptCompiler, ScriptSource, TranslateContext, Translator,
    TranslatorLookup,
};

/// Records every translated object and property in script syntax
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub output: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.output.borrow_mut())
    }
}

impl Translator for Recorder {
    fn translate(&mut self, ctx: &mut TranslateContext<'_>, node: NodeId) {
        self.output
            .borrow_mut()
            .push(ctx.tree.display(node).to_string());
    }
}

impl TranslatorLookup for Recorder {
    fn translator(&mut self, tree: &AbstractTree, node: NodeId) -> Option<&mut dyn Translator> {
        if tree.object(node).is_some() || tree.property(node).is_some() {
            Some(self)
        } else {
            None
        }
    }
}

/// Loads scripts from memory and counts the loads
pub struct CountingLoader {
    inner: FileLoader<MemoryFileProvider>,
    pub loads: Rc<Cell<usize>>,
}

impl CountingLoader {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let mut provider = MemoryFileProvider::default();
        for (path, content) in files {
            provider = provider.with_file(path, content);
        }
        CountingLoader {
            inner: FileLoader::new(provider),
            loads: Rc::default(),
        }
    }
}

impl ImportLoader for CountingLoader {
    fn load(&mut self, source: &str, group: &str) -> Option<ScriptSource> {
        self.loads.set(self.loads.get() + 1);
        self.inner.load(source, group)
    }
}

pub struct Compiled {
    pub success: bool,
    pub compiler: ScriptCompiler,
    /// The rendered translated nodes, in translation order
    pub output: Vec<String>,
    pub loads: usize,
}

impl Compiled {
    pub fn codes(&self) -> Vec<CompileErrorCode> {
        self.compiler
            .errors()
            .iter()
            .map(|error| error.code)
            .collect()
    }
}

/// Compiles `source` with `files` available for imports
pub fn compile_with_files(source: &str, files: &[(&str, &str)]) -> Compiled {
    let recorder = Recorder::default();
    let loader = CountingLoader::new(files);
    let loads = loader.loads.clone();

    let mut compiler = ScriptCompiler::new(recorder.clone()).with_loader(loader);
    let success = compiler.compile_str(source, "main.material", "General");
    Compiled {
        success,
        compiler,
        output: recorder.take(),
        loads: loads.get(),
    }
}

pub fn compile(source: &str) -> Compiled {
    compile_with_files(source, &[])
}

/// Removes the common indentation of an indented string literal,
/// along with the leading newline and the trailing whitespace
pub fn script(source: &str) -> String {
    let source = source.strip_prefix('\n').unwrap_or(source).trim_end();
    let indent = source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    source
        .lines()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .map(|line| format!("{line}\n"))
        .collect()
}
