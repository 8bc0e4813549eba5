use std::{env, path::Path, process};

use mortar_lang::{
    ast::{AbstractTree, NodeId},
    common::file_provider::{FileProvider, FsFileProvider},
    FileLoader, ScriptCompiler, TranslateContext, Translator, TranslatorLookup,
};
use tracing_subscriber::EnvFilter;

/// Prints every translated object and property in script syntax
struct Printer;

impl Translator for Printer {
    fn translate(&mut self, ctx: &mut TranslateContext<'_>, node: NodeId) {
        print!("{}", ctx.tree.display(node));
    }
}

impl TranslatorLookup for Printer {
    fn translator(&mut self, tree: &AbstractTree, node: NodeId) -> Option<&mut dyn Translator> {
        if tree.object(node).is_some() || tree.property(node).is_some() {
            Some(self)
        } else {
            None
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(script: &Path, group: &str) -> bool {
    let root = script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let Some(file_name) = script.file_name().and_then(|name| name.to_str()) else {
        eprintln!("Invalid script path '{}'", script.display());
        return false;
    };

    let provider = FsFileProvider::new(root.clone());
    let Some(source) = provider.read_file(file_name) else {
        eprintln!("Could not read '{}'", script.display());
        return false;
    };

    let mut compiler =
        ScriptCompiler::new(Printer).with_loader(FileLoader::new(FsFileProvider::new(root)));
    let success = compiler.compile_str(&source, file_name, group);
    for error in compiler.format_errors() {
        eprintln!("{error}");
    }
    success
}

fn main() {
    init_logging();

    let mut args = env::args().skip(1);
    let Some(script) = args.next() else {
        eprintln!("Usage: mortar-lang <script> [resource group]");
        process::exit(2);
    };
    let group = args.next().unwrap_or_else(|| "General".to_string());

    process::exit(if run(Path::new(&script), &group) { 0 } else { 1 });
}
