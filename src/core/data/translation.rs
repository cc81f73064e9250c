//! Translation records and the rules for merging two records with the same id.

use std::collections::BTreeSet;

use crate::core::data::Usage;

/// A translation id together with its default text and every place it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub id: String,
    /// Text shown when no translation for `id` exists yet.
    pub default_text: Option<String>,
    pub usages: BTreeSet<Usage>,
}

/// Two records share an id but carry different non-empty default texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub existing: String,
    pub incoming: String,
}

impl Translation {
    /// Create a record with a single usage.
    pub fn new(id: impl Into<String>, default_text: Option<String>, usage: Usage) -> Self {
        Self {
            id: id.into(),
            default_text,
            usages: BTreeSet::from([usage]),
        }
    }

    /// The default text, treating an empty string as absent.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref().filter(|text| !text.is_empty())
    }

    /// Text to write to the catalog: the default text if any, otherwise the id.
    pub fn display_text(&self) -> &str {
        self.default_text().unwrap_or(&self.id)
    }

    /// Merge another record with the same id into a new record.
    ///
    /// Usages are unioned. The first non-empty default text wins; two different
    /// non-empty default texts cannot be reconciled.
    pub fn merge(&self, other: &Translation) -> Result<Translation, MergeConflict> {
        debug_assert_eq!(self.id, other.id);

        let default_text = match (self.default_text(), other.default_text()) {
            (Some(existing), Some(incoming)) if existing != incoming => {
                return Err(MergeConflict {
                    existing: existing.to_string(),
                    incoming: incoming.to_string(),
                });
            }
            (Some(existing), _) => Some(existing.to_string()),
            (None, Some(incoming)) => Some(incoming.to_string()),
            (None, None) => self.default_text.clone().or_else(|| other.default_text.clone()),
        };

        Ok(Translation {
            id: self.id.clone(),
            default_text,
            usages: self.usages.union(&other.usages).cloned().collect(),
        })
    }

    /// Remove every usage attributed to `resource`. Returns true if any was removed.
    pub fn remove_usages_of(&mut self, resource: &str) -> bool {
        let before = self.usages.len();
        self.usages.retain(|usage| usage.resource != resource);
        self.usages.len() != before
    }
}
