// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording collection with scripted batch failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use docbulk_core::{BulkResult, BulkWrite, Collection, DocbulkError, WriteKind, WriteOp};

/// A bulk request as the mock collection received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBatch<D> {
    /// 1-based submission number across the collection's lifetime.
    pub number: usize,
    /// Whether `unordered()` was called on the builder.
    pub unordered: bool,
    pub ops: Vec<WriteOp<D>>,
    /// `false` when the submission was scripted to fail.
    pub succeeded: bool,
}

#[derive(Debug)]
struct MockState<D> {
    submitted: Vec<RecordedBatch<D>>,
    failures: HashMap<usize, String>,
}

/// A collection that records every bulk request instead of executing it.
///
/// Clones share the same recording, so a test can keep one handle while the
/// code under test owns another.
#[derive(Debug)]
pub struct MockCollection<D = serde_json::Value> {
    name: String,
    state: Arc<Mutex<MockState<D>>>,
}

impl<D> MockCollection<D> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                submitted: Vec::new(),
                failures: HashMap::new(),
            })),
        }
    }

    /// Make the `number`th submission (1-based) fail with `message`.
    pub fn fail_batch(&self, number: usize, message: impl Into<String>) {
        self.lock().failures.insert(number, message.into());
    }

    /// Number of bulk requests submitted so far, failed ones included.
    pub fn batch_count(&self) -> usize {
        self.lock().submitted.len()
    }

    /// Operation count of each submitted batch, in submission order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.lock().submitted.iter().map(|b| b.ops.len()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState<D>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Clone> MockCollection<D> {
    /// Every submitted batch, in submission order.
    pub fn batches(&self) -> Vec<RecordedBatch<D>> {
        self.lock().submitted.clone()
    }

    /// All submitted operations flattened in submission order.
    pub fn operations(&self) -> Vec<WriteOp<D>> {
        self.lock()
            .submitted
            .iter()
            .flat_map(|b| b.ops.iter().cloned())
            .collect()
    }
}

impl<D> Clone for MockCollection<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<D> Collection for MockCollection<D> {
    type Document = D;
    type Bulk = MockBulk<D>;

    fn name(&self) -> &str {
        &self.name
    }

    fn bulk(&self) -> MockBulk<D> {
        MockBulk {
            state: Arc::clone(&self.state),
            unordered: false,
            ops: Vec::new(),
        }
    }
}

/// Bulk builder handed out by [`MockCollection`].
pub struct MockBulk<D> {
    state: Arc<Mutex<MockState<D>>>,
    unordered: bool,
    ops: Vec<WriteOp<D>>,
}

impl<D> BulkWrite for MockBulk<D> {
    type Document = D;

    fn unordered(&mut self) {
        self.unordered = true;
    }

    fn insert(&mut self, doc: D) {
        self.ops.push(WriteOp::Insert(doc));
    }

    fn remove(&mut self, selector: D) {
        self.ops.push(WriteOp::Remove(selector));
    }

    fn remove_all(&mut self, selector: D) {
        self.ops.push(WriteOp::RemoveAll(selector));
    }

    fn update(&mut self, selector: D, update: D) {
        self.ops.push(WriteOp::Update { selector, update });
    }

    fn update_all(&mut self, selector: D, update: D) {
        self.ops.push(WriteOp::UpdateAll { selector, update });
    }

    fn upsert(&mut self, selector: D, update: D) {
        self.ops.push(WriteOp::Upsert { selector, update });
    }

    fn run(self) -> Result<BulkResult, DocbulkError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let number = state.submitted.len() + 1;
        let failure = state.failures.remove(&number);

        let mut result = BulkResult::default();
        for op in &self.ops {
            match op.kind() {
                WriteKind::Insert => result.inserted += 1,
                WriteKind::Remove | WriteKind::RemoveAll => result.removed += 1,
                WriteKind::Update | WriteKind::UpdateAll | WriteKind::Upsert => {
                    result.matched += 1;
                    result.modified += 1;
                }
            }
        }

        trace!(number, ops = self.ops.len(), failed = failure.is_some(), "mock bulk run");
        state.submitted.push(RecordedBatch {
            number,
            unordered: self.unordered,
            ops: self.ops,
            succeeded: failure.is_none(),
        });

        match failure {
            Some(message) => Err(DocbulkError::Storage {
                source: message.into(),
            }),
            None => Ok(result),
        }
    }
}
