//! Backend registry for format lookup by name.

use std::collections::HashMap;

use refit_ast::DocumentView;

use crate::backend::{Backend, BackendError, WriterOptions};
use crate::html::HtmlBackend;
use crate::markdown::MarkdownBackend;
use crate::plain::PlainBackend;

/// Registry of output backends keyed by format name.
pub struct BackendRegistry {
    backends: HashMap<String, Box<dyn Backend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
        }
    }

    /// Create a registry with the built-in backends.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HtmlBackend);
        registry.register(MarkdownBackend);
        registry.register(PlainBackend);
        registry
    }

    /// Register a backend, replacing any backend with the same name.
    pub fn register<B: Backend + 'static>(&mut self, backend: B) {
        self.backends
            .insert(backend.name().to_owned(), Box::new(backend));
    }

    /// Get a backend by format name.
    pub fn get(&self, name: &str) -> Result<&dyn Backend, BackendError> {
        self.backends
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| BackendError::UnknownFormat(name.to_owned()))
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Registered format names, sorted.
    #[must_use]
    pub fn list_formats(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Serialize a document with the named backend.
    pub fn serialize(
        &self,
        doc: DocumentView<'_>,
        format: &str,
        options: &WriterOptions,
    ) -> Result<String, BackendError> {
        self.get(format)?.serialize(doc, options)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
