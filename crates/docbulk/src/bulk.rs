// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The batching accumulator.
//!
//! Every enqueue method funnels into [`Bulk::push`], which flushes the open
//! batch once it holds `ops_per_batch` operations and only then admits the
//! new one. A full batch therefore waits for the next enqueue (or `finish`)
//! before it is submitted.

use tracing::{debug, warn};

use docbulk_config::BulkConfig;
use docbulk_core::{
    BatchFailure, BulkErrors, BulkResult, BulkWrite, Collection, DocbulkError, WriteOp,
};

/// Running totals for an accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    /// Bulk requests submitted, failed ones included.
    pub batches: usize,
    /// Operations carried by those requests.
    pub operations: usize,
    pub failed_batches: usize,
    /// Counts summed over the batches that succeeded.
    pub result: BulkResult,
}

/// Queues writes against one collection and submits them in bounded batches.
///
/// Enqueueing after [`finish`](Bulk::finish), or finishing twice, is a
/// programming error and panics.
pub struct Bulk<C: Collection> {
    collection: C,
    ops_per_batch: usize,
    batch: Option<C::Bulk>,
    count: usize,
    errors: BulkErrors,
    summary: BulkSummary,
    finished: bool,
}

impl<C: Collection> Bulk<C> {
    /// Create an accumulator for `collection`.
    ///
    /// An `ops_per_batch` of zero means [`MAX_OPS_PER_BATCH`]; anything larger
    /// than that is a [`DocbulkError::Config`].
    ///
    /// [`MAX_OPS_PER_BATCH`]: docbulk_core::MAX_OPS_PER_BATCH
    pub fn new(collection: C, config: BulkConfig) -> Result<Self, DocbulkError> {
        let ops_per_batch = config.effective_ops_per_batch()?;
        Ok(Self {
            collection,
            ops_per_batch,
            batch: None,
            count: 0,
            errors: BulkErrors::new(),
            summary: BulkSummary::default(),
            finished: false,
        })
    }

    /// Queue each document as its own insert.
    pub fn insert<I>(&mut self, docs: I)
    where
        I: IntoIterator<Item = C::Document>,
    {
        for doc in docs {
            self.push(WriteOp::Insert(doc));
        }
    }

    /// Queue a remove of the first match for each selector.
    pub fn remove<I>(&mut self, selectors: I)
    where
        I: IntoIterator<Item = C::Document>,
    {
        for selector in selectors {
            self.push(WriteOp::Remove(selector));
        }
    }

    /// Queue a remove of every match for each selector.
    pub fn remove_all<I>(&mut self, selectors: I)
    where
        I: IntoIterator<Item = C::Document>,
    {
        for selector in selectors {
            self.push(WriteOp::RemoveAll(selector));
        }
    }

    /// Queue an update of the first match for each `(selector, update)` pair.
    pub fn update<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (C::Document, C::Document)>,
    {
        for (selector, update) in pairs {
            self.push(WriteOp::Update { selector, update });
        }
    }

    /// Queue an update of every match for each `(selector, update)` pair.
    pub fn update_all<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (C::Document, C::Document)>,
    {
        for (selector, update) in pairs {
            self.push(WriteOp::UpdateAll { selector, update });
        }
    }

    /// Queue an upsert for each `(selector, update)` pair.
    pub fn upsert<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (C::Document, C::Document)>,
    {
        for (selector, update) in pairs {
            self.push(WriteOp::Upsert { selector, update });
        }
    }

    /// Admit one operation, flushing first if the open batch is full.
    ///
    /// # Panics
    ///
    /// If the accumulator has been finished.
    pub fn push(&mut self, op: WriteOp<C::Document>) {
        assert!(!self.finished, "performing an operation on a finished bulk");

        if self.count >= self.ops_per_batch {
            self.submit_pending();
        }

        self.count += 1;
        let batch = self.batch.get_or_insert_with(|| {
            let mut bulk = self.collection.bulk();
            bulk.unordered();
            bulk
        });
        op.apply_to(batch);
    }

    /// Submit the open batch now instead of waiting for it to fill.
    ///
    /// Does nothing when no operations are queued.
    ///
    /// # Panics
    ///
    /// If the accumulator has been finished.
    pub fn flush(&mut self) {
        assert!(!self.finished, "flushing a finished bulk");
        self.submit_pending();
    }

    /// Submit what is left and return every batch failure seen.
    ///
    /// # Panics
    ///
    /// If called more than once.
    pub fn finish(&mut self) -> Result<(), BulkErrors> {
        assert!(!self.finished, "attempting to finish a bulk twice");
        self.finished = true;
        self.submit_pending();

        debug!(
            collection = self.collection.name(),
            batches = self.summary.batches,
            operations = self.summary.operations,
            failed_batches = self.summary.failed_batches,
            "bulk finished"
        );
        std::mem::take(&mut self.errors).into_result()
    }

    fn submit_pending(&mut self) {
        let Some(batch) = self.batch.take() else {
            return;
        };
        let operations = std::mem::take(&mut self.count);
        self.summary.batches += 1;
        self.summary.operations += operations;
        let number = self.summary.batches;

        debug!(
            collection = self.collection.name(),
            batch = number,
            operations,
            "submitting bulk batch"
        );

        match batch.run() {
            Ok(result) => self.summary.result.absorb(&result),
            Err(source) => {
                warn!(
                    collection = self.collection.name(),
                    batch = number,
                    operations,
                    error = %source,
                    "bulk batch failed"
                );
                self.summary.failed_batches += 1;
                self.errors.push(BatchFailure {
                    batch: number,
                    operations,
                    source,
                });
            }
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Effective batch size after defaulting.
    pub fn ops_per_batch(&self) -> usize {
        self.ops_per_batch
    }

    /// Operations queued in the open batch.
    pub fn pending(&self) -> usize {
        self.count
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn summary(&self) -> BulkSummary {
        self.summary
    }

    /// Batch failures collected so far. Emptied by `finish`.
    pub fn errors(&self) -> &BulkErrors {
        &self.errors
    }
}

impl<C: Collection> Drop for Bulk<C> {
    fn drop(&mut self) {
        if !self.finished && self.count > 0 {
            warn!(
                collection = self.collection.name(),
                pending = self.count,
                "bulk dropped without finish; queued operations were not submitted"
            );
        }
    }
}
