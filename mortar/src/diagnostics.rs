use mortar_error::CompileError;

use crate::CompilerListener;

/// Collects the errors of a compilation and forwards them to the listener
#[derive(Default)]
pub struct Diagnostics {
    errors: Vec<CompileError>,
    listener: Option<Box<dyn CompilerListener>>,
}

impl Diagnostics {
    pub fn new(listener: Option<Box<dyn CompilerListener>>) -> Self {
        Diagnostics {
            errors: Vec::new(),
            listener,
        }
    }

    /// Records an error.
    /// Unless the listener handles it, the error also gets written to the log.
    pub fn report(&mut self, error: CompileError) {
        let handled = self
            .listener
            .as_mut()
            .is_some_and(|listener| listener.handle_error(&error));
        if !handled {
            tracing::error!("{error}");
        }
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = CompileError>) {
        for error in errors {
            self.report(error);
        }
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn listener(&self) -> Option<&dyn CompilerListener> {
        self.listener.as_deref()
    }

    pub fn listener_mut(&mut self) -> Option<&mut (dyn CompilerListener + 'static)> {
        self.listener.as_deref_mut()
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn CompilerListener>>) {
        self.listener = listener;
    }
}
