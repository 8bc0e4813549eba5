use smol_str::SmolStr;

use crate::FxIndexMap;

/// The text of a single script, identified by the name it was loaded under
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct Code {
    pub source: Box<str>,
    pub path: SmolStr,
}

impl Code {
    /// Returns the text of the 1-based line `line`, if it exists
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.source.lines().nth(index)
    }
}

/// Every script text that took part in a compilation.
///
/// Diagnostics only carry a file name and a line, so this registry is what
/// allows them to show the offending source line.
#[derive(Debug, Default)]
pub struct InputFiles {
    files: FxIndexMap<SmolStr, Code>,
}

impl InputFiles {
    /// Adds a file and returns its index.
    /// A file that was already registered under the same name gets replaced.
    pub fn add_input(&mut self, code: Code) -> usize {
        let (index, _) = self.files.insert_full(code.path.clone(), code);
        index
    }

    pub fn get_input(&self, path: &str) -> Option<&Code> {
        self.files.get(path)
    }

    pub fn find_by_filename(&self, path: &str) -> Option<usize> {
        self.files.get_index_of(path)
    }

    /// Returns the line `line` of the file `path`
    pub fn get_line(&self, path: &str, line: u32) -> Option<&str> {
        self.get_input(path).and_then(|code| code.line(line))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
