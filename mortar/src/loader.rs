use mortar_common::file_provider::FileProvider;
use mortar_parser::ConcreteTree;

/// A script returned by an [`ImportLoader`]
#[derive(Debug)]
pub enum ScriptSource {
    /// Script text, which still has to be parsed
    Text(Box<str>),
    /// An already parsed script
    Tree(ConcreteTree),
}

/// Resolves the source names of import statements
pub trait ImportLoader {
    /// Loads the script `source` of the resource group `group`.
    /// Returns `None` if there is no such script.
    fn load(&mut self, source: &str, group: &str) -> Option<ScriptSource>;
}

/// An [`ImportLoader`] which reads scripts from a [`FileProvider`]
#[derive(Debug, Default)]
pub struct FileLoader<P> {
    pub provider: P,
}

impl<P: FileProvider> FileLoader<P> {
    pub fn new(provider: P) -> Self {
        FileLoader { provider }
    }
}

impl<P: FileProvider> ImportLoader for FileLoader<P> {
    fn load(&mut self, source: &str, _group: &str) -> Option<ScriptSource> {
        self.provider.read_file(source).map(ScriptSource::Text)
    }
}
