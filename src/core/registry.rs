//! Translations registry: merges extraction results from every processed file.
//!
//! The registry maps each translation id to one merged [`Translation`] and keeps a
//! reverse index from resource to the ids it uses, so a single file can be pruned
//! and reprocessed without rebuilding everything.
//!
//! The registry does no locking. Callers process one file to completion before
//! registering the next file's translations.

use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use crate::core::data::{Translation, Usage};

/// Why a registration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The id is empty or whitespace only. The translation is dropped.
    #[error("translation id is empty, the translation is ignored")]
    EmptyId { usages: Vec<Usage> },

    /// The id is already registered with a different non-empty default text.
    /// The existing record is kept unchanged.
    #[error(
        "translation '{id}' has conflicting default texts: '{existing}' (used at {existing_usages}) and '{incoming}'"
    )]
    ConflictingDefaultText {
        id: String,
        existing: String,
        incoming: String,
        existing_usages: String,
        usages: Vec<Usage>,
    },
}

impl RegistryError {
    /// Usages of the rejected registration.
    pub fn usages(&self) -> &[Usage] {
        match self {
            RegistryError::EmptyId { usages } => usages,
            RegistryError::ConflictingDefaultText { usages, .. } => usages,
        }
    }
}

/// Aggregation store of all translations found during one build.
#[derive(Debug, Default)]
pub struct TranslationsRegistry {
    translations: HashMap<String, Translation>,
    /// resource -> ids with at least one usage in that resource
    by_resource: HashMap<String, HashSet<String>>,
}

impl TranslationsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a translation or merge it into the record with the same id.
    ///
    /// Registering an identical `(id, default text, usage)` again is a no-op.
    pub fn register(&mut self, translation: Translation) -> Result<(), RegistryError> {
        if translation.id.trim().is_empty() {
            return Err(RegistryError::EmptyId {
                usages: translation.usages.into_iter().collect(),
            });
        }

        let merged = match self.translations.get(&translation.id) {
            Some(existing) => existing.merge(&translation).map_err(|conflict| {
                RegistryError::ConflictingDefaultText {
                    id: translation.id.clone(),
                    existing: conflict.existing,
                    incoming: conflict.incoming,
                    existing_usages: format_usages(existing),
                    usages: translation.usages.iter().cloned().collect(),
                }
            })?,
            None => translation,
        };

        for usage in &merged.usages {
            self.by_resource
                .entry(usage.resource.clone())
                .or_default()
                .insert(merged.id.clone());
        }
        self.translations.insert(merged.id.clone(), merged);
        Ok(())
    }

    /// Remove every usage attributed to `resource`.
    ///
    /// Records left without usages are deleted. Returns the number of records deleted.
    pub fn prune(&mut self, resource: &str) -> usize {
        let Some(ids) = self.by_resource.remove(resource) else {
            return 0;
        };

        let mut deleted = 0;
        for id in ids {
            if let Some(translation) = self.translations.get_mut(&id) {
                translation.remove_usages_of(resource);
                if translation.usages.is_empty() {
                    self.translations.remove(&id);
                    deleted += 1;
                }
            }
        }
        deleted
    }

    pub fn get(&self, id: &str) -> Option<&Translation> {
        self.translations.get(id)
    }

    /// Ids used by a resource.
    pub fn ids_of(&self, resource: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .by_resource
            .get(resource)
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// All translations, sorted by id.
    pub fn translations(&self) -> Vec<&Translation> {
        let mut translations: Vec<_> = self.translations.values().collect();
        translations.sort_by(|a, b| a.id.cmp(&b.id));
        translations
    }

    /// The catalog form of the registry: id -> default text, or the id itself when
    /// no default text is known. Keys are sorted for stable output.
    pub fn to_serializable(&self) -> BTreeMap<String, String> {
        self.translations
            .values()
            .map(|t| (t.id.clone(), t.display_text().to_string()))
            .collect()
    }
}

fn format_usages(translation: &Translation) -> String {
    translation
        .usages
        .iter()
        .map(Usage::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::data::Location;
    use crate::core::registry::*;

    fn translation(id: &str, default_text: Option<&str>, resource: &str, line: usize) -> Translation {
        Translation::new(
            id,
            default_text.map(String::from),
            Usage::new(resource, Location::new(line, 0)),
        )
    }

    #[test]
    fn test_register_new_translation() {
        let mut registry = TranslationsRegistry::new();
        registry
            .register(translation("HOME", Some("Home"), "a.html", 1))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("HOME").unwrap().display_text(), "Home");
        assert_eq!(registry.ids_of("a.html"), vec!["HOME"]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = TranslationsRegistry::new();
        registry
            .register(translation("HOME", Some("Home"), "a.html", 1))
            .unwrap();
        registry
            .register(translation("HOME", Some("Home"), "a.html", 1))
            .unwrap();

        assert_eq!(registry.get("HOME").unwrap().usages.len(), 1);
    }

    #[test]
    fn test_register_merges_usages_across_files() {
        let mut registry = TranslationsRegistry::new();
        registry
            .register(translation("HOME", None, "a.html", 1))
            .unwrap();
        registry
            .register(translation("HOME", Some("Home"), "b.js", 4))
            .unwrap();

        let home = registry.get("HOME").unwrap();
        assert_eq!(home.usages.len(), 2);
        assert_eq!(home.default_text.as_deref(), Some("Home"));
        assert_eq!(registry.ids_of("b.js"), vec!["HOME"]);
    }

    #[test]
    fn test_register_empty_id() {
        let mut registry = TranslationsRegistry::new();
        let err = registry
            .register(translation("  ", None, "a.html", 1))
            .unwrap_err();

        assert!(matches!(err, RegistryError::EmptyId { .. }));
        assert_eq!(err.usages().len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_conflicting_default_keeps_existing() {
        let mut registry = TranslationsRegistry::new();
        registry
            .register(translation("HOME", Some("Home"), "a.html", 1))
            .unwrap();
        let err = registry
            .register(translation("HOME", Some("Start"), "b.html", 2))
            .unwrap_err();

        assert!(err.to_string().contains("'Home' (used at a.html:1:0) and 'Start'"));
        let home = registry.get("HOME").unwrap();
        assert_eq!(home.default_text.as_deref(), Some("Home"));
        assert_eq!(home.usages.len(), 1);
        assert!(registry.ids_of("b.html").is_empty());
    }

    #[test]
    fn test_prune_removes_only_usages_of_resource() {
        let mut registry = TranslationsRegistry::new();
        registry
            .register(translation("HOME", None, "a.html", 1))
            .unwrap();
        registry
            .register(translation("HOME", None, "b.html", 1))
            .unwrap();
        registry
            .register(translation("ONLY_A", None, "a.html", 2))
            .unwrap();

        let deleted = registry.prune("a.html");

        assert_eq!(deleted, 1);
        assert!(registry.get("ONLY_A").is_none());
        let home = registry.get("HOME").unwrap();
        assert_eq!(home.usages.len(), 1);
        assert_eq!(home.usages.first().unwrap().resource, "b.html");
        assert!(registry.ids_of("a.html").is_empty());
    }

    #[test]
    fn test_prune_then_register_restores_usage() {
        let mut registry = TranslationsRegistry::new();
        let original = translation("HOME", Some("Home"), "a.html", 3);
        registry.register(original.clone()).unwrap();

        registry.prune("a.html");
        assert!(registry.is_empty());

        registry.register(original.clone()).unwrap();
        assert_eq!(registry.get("HOME"), Some(&original));
    }

    #[test]
    fn test_prune_unknown_resource() {
        let mut registry = TranslationsRegistry::new();
        assert_eq!(registry.prune("missing.html"), 0);
    }

    #[test]
    fn test_to_serializable() {
        let mut registry = TranslationsRegistry::new();
        registry
            .register(translation("B", Some("Bee"), "a.html", 1))
            .unwrap();
        registry
            .register(translation("A", None, "a.html", 2))
            .unwrap();

        let catalog = registry.to_serializable();
        let entries: Vec<_> = catalog.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(entries, vec![("A", "A"), ("B", "Bee")]);
    }
}
