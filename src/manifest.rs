//! Collection-to-table resolution.

use std::collections::HashMap;

use serde::Deserialize;

/// Maps logical collection names to the physical tables backing them.
///
/// The mapping is produced outside this crate (typically deserialized from
/// a build-time manifest) and shared across builders. Lookup happens once
/// per compiled query, at the `FROM` clause.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    tables: HashMap<String, String>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the physical table backing `collection`.
    pub fn insert(&mut self, collection: impl Into<String>, table: impl Into<String>) {
        self.tables.insert(collection.into(), table.into());
    }

    /// Resolves the physical table name, if the collection is known.
    #[must_use]
    pub fn table(&self, collection: &str) -> Option<&str> {
        self.tables.get(collection).map(String::as_str)
    }
}

impl<C: Into<String>, T: Into<String>> FromIterator<(C, T)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (C, T)>>(iter: I) -> Self {
        Self {
            tables: iter
                .into_iter()
                .map(|(c, t)| (c.into(), t.into()))
                .collect(),
        }
    }
}
