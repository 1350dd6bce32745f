// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collection handle and bulk request builder traits.

use crate::error::DocbulkError;
use crate::types::BulkResult;

/// A builder for one bulk request against a collection.
///
/// Operations are buffered by the builder and sent in a single round trip
/// by [`run`](BulkWrite::run). Builders start out ordered; call
/// [`unordered`](BulkWrite::unordered) to let the database execute the
/// operations in any order and continue past individual failures.
pub trait BulkWrite {
    /// Opaque document and selector type.
    type Document;

    /// Allow the database to reorder operations and continue past failures.
    fn unordered(&mut self);

    fn insert(&mut self, doc: Self::Document);

    /// Queue removal of the first document matching `selector`.
    fn remove(&mut self, selector: Self::Document);

    /// Queue removal of every document matching `selector`.
    fn remove_all(&mut self, selector: Self::Document);

    /// Queue an update of the first document matching `selector`.
    fn update(&mut self, selector: Self::Document, update: Self::Document);

    /// Queue an update of every document matching `selector`.
    fn update_all(&mut self, selector: Self::Document, update: Self::Document);

    /// Queue an update of the first match, inserting when nothing matches.
    fn upsert(&mut self, selector: Self::Document, update: Self::Document);

    /// Submit every queued operation as one request.
    fn run(self) -> Result<BulkResult, DocbulkError>;
}

/// A handle to a named collection.
pub trait Collection {
    /// Opaque document and selector type.
    type Document;

    /// The bulk request builder this collection hands out.
    type Bulk: BulkWrite<Document = Self::Document>;

    /// Name the collection was opened with.
    fn name(&self) -> &str;

    /// Start a new, empty bulk request.
    fn bulk(&self) -> Self::Bulk;
}
