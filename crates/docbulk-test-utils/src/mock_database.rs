// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock database that hands out shared [`MockCollection`]s.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use docbulk_core::{Database, DocbulkError};

use crate::mock_collection::MockCollection;

struct Registry<D> {
    collections: HashMap<String, MockCollection<D>>,
    unavailable: HashSet<String>,
    opened: Vec<String>,
}

/// A database whose collections are [`MockCollection`]s.
///
/// Opening the same name twice returns handles onto the same recording.
pub struct MockDatabase<D = serde_json::Value> {
    registry: Arc<Mutex<Registry<D>>>,
}

impl<D> MockDatabase<D> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                collections: HashMap::new(),
                unavailable: HashSet::new(),
                opened: Vec::new(),
            })),
        }
    }

    /// Make opening `name` fail with [`DocbulkError::CollectionUnavailable`].
    pub fn mark_unavailable(&self, name: impl Into<String>) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unavailable
            .insert(name.into());
    }

    /// Names passed to `collection()`, in call order.
    pub fn opened(&self) -> Vec<String> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .opened
            .clone()
    }

    /// Handle onto the named collection, creating it if needed.
    pub fn handle(&self, name: &str) -> MockCollection<D> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .collections
            .entry(name.to_string())
            .or_insert_with(|| MockCollection::new(name))
            .clone()
    }
}

impl<D> Default for MockDatabase<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for MockDatabase<D> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<D> Database for MockDatabase<D> {
    type Collection = MockCollection<D>;

    fn collection(&self, name: &str) -> Result<MockCollection<D>, DocbulkError> {
        {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.opened.push(name.to_string());
            if registry.unavailable.contains(name) {
                return Err(DocbulkError::CollectionUnavailable {
                    name: name.to_string(),
                    source: "collection marked unavailable".into(),
                });
            }
        }
        Ok(self.handle(name))
    }
}
