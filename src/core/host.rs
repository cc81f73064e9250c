//! Callback surface between the extraction core and the build that drives it.
//!
//! The markup parser and the script visitor only ever talk to a [`TranslationHost`].
//! [`Session`] is the host used by the CLI: it owns the registry for one build and
//! collects every diagnostic.

use anyhow::Result;
use tracing::debug;

use crate::core::data::Translation;
use crate::core::markup::{Extractor, extract_from_markup};
use crate::core::registry::{RegistryError, TranslationsRegistry};
use crate::core::script::{ScriptExtraction, ScriptOptions, extract_from_source};
use crate::issues::Diagnostic;

/// Services the extraction core consumes from its host.
pub trait TranslationHost {
    /// Merge-or-insert one translation with a single usage.
    fn register_translation(&mut self, translation: Translation);

    /// Remove every usage attributed to `resource`.
    fn prune_translations(&mut self, resource: &str);

    fn emit_error(&mut self, diagnostic: Diagnostic);

    fn emit_warning(&mut self, diagnostic: Diagnostic);
}

/// How a file is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Markup,
    Script,
}

/// Settings shared by every file of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub extractors: Vec<Extractor>,
    pub script: ScriptOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            extractors: Extractor::defaults(),
            script: ScriptOptions::default(),
        }
    }
}

/// One build: a registry plus the diagnostics reported while filling it.
#[derive(Debug, Default)]
pub struct Session {
    options: SessionOptions,
    registry: TranslationsRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            registry: TranslationsRegistry::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Extract `text` as the current content of `resource`.
    ///
    /// Usages previously registered for the resource are pruned first, so processing
    /// the same file again yields the same registry. For scripts the returned
    /// extraction carries the rewritten source.
    pub fn process_file(
        &mut self,
        resource: &str,
        text: &str,
        kind: FileKind,
    ) -> Result<Option<ScriptExtraction>> {
        debug!(resource, ?kind, "processing file");
        self.prune_translations(resource);

        let options = self.options.clone();
        match kind {
            FileKind::Markup => {
                extract_from_markup(text, resource, &options.extractors, self)?;
                Ok(None)
            }
            FileKind::Script => {
                let extraction = extract_from_source(text, resource, &options.script, self)?;
                Ok(Some(extraction))
            }
        }
    }

    /// Forget a deleted resource.
    pub fn remove_file(&mut self, resource: &str) -> usize {
        self.registry.prune(resource)
    }

    pub fn registry(&self) -> &TranslationsRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

impl TranslationHost for Session {
    fn register_translation(&mut self, translation: Translation) {
        let id = translation.id.clone();
        match self.registry.register(translation) {
            Ok(()) => debug!(id, "registered translation"),
            Err(err) => {
                let usage = err.usages().first().cloned();
                let resource = usage.as_ref().map(|u| u.resource.clone()).unwrap_or_default();
                let location = usage.map(|u| u.location);
                match err {
                    RegistryError::EmptyId { .. } => {
                        self.emit_warning(Diagnostic::warning(resource, location, err.to_string()))
                    }
                    RegistryError::ConflictingDefaultText { .. } => {
                        self.emit_error(Diagnostic::error(resource, location, err.to_string()))
                    }
                }
            }
        }
    }

    fn prune_translations(&mut self, resource: &str) {
        let deleted = self.registry.prune(resource);
        if deleted > 0 {
            debug!(resource, deleted, "pruned translations");
        }
    }

    fn emit_error(&mut self, diagnostic: Diagnostic) {
        debug!(%diagnostic, "extraction error");
        self.diagnostics.push(diagnostic);
    }

    fn emit_warning(&mut self, diagnostic: Diagnostic) {
        debug!(%diagnostic, "extraction warning");
        self.diagnostics.push(diagnostic);
    }
}
