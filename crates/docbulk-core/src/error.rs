// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for docbulk.
//!
//! Two kinds of failure exist. Caller misuse of an accumulator (enqueueing
//! after `finish`, finishing twice) is a programming error and panics; it never
//! shows up here. Everything in this module is a recoverable failure reported
//! by a database collaborator, plus the aggregate that collects those failures
//! across independently submitted batches.

use std::fmt;

use thiserror::Error;

/// The primary error type used across docbulk traits and operations.
#[derive(Debug, Error)]
pub enum DocbulkError {
    /// Configuration errors (out-of-range batch size, invalid storage settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection failure, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// One or more operations inside a single bulk request were rejected.
    #[error(transparent)]
    Write(#[from] WriteErrors),

    /// The named collection could not be opened.
    #[error("collection `{name}` unavailable: {source}")]
    CollectionUnavailable {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// One or more batches failed during an accumulator's lifetime.
    #[error(transparent)]
    Batches(#[from] BulkErrors),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A single operation rejected by the database within a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation {index}: {message}")]
pub struct WriteError {
    /// Position of the operation within its batch.
    pub index: usize,
    /// Reason reported by the database.
    pub message: String,
}

/// Every per-operation failure reported by one bulk request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteErrors {
    errors: Vec<WriteError>,
}

impl WriteErrors {
    pub fn new(errors: Vec<WriteError>) -> Self {
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WriteError> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> Vec<WriteError> {
        self.errors
    }
}

impl fmt::Display for WriteErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no write errors"),
            [only] => write!(f, "write error: {only}"),
            [first, ..] => write!(
                f,
                "{} write errors; first: {first}",
                self.errors.len()
            ),
        }
    }
}

impl std::error::Error for WriteErrors {}

/// One batch whose submission failed.
#[derive(Debug, Error)]
#[error("batch {batch} ({operations} operations) failed: {source}")]
pub struct BatchFailure {
    /// 1-based submission number of the batch within its accumulator.
    pub batch: usize,
    /// Number of operations the batch carried.
    pub operations: usize,
    /// The error returned by the collection.
    pub source: DocbulkError,
}

/// Aggregated batch failures, in submission order.
///
/// An empty `BulkErrors` means every batch succeeded. Use [`iter`](Self::iter)
/// or [`into_inner`](Self::into_inner) to inspect the individual causes.
#[derive(Debug, Default)]
pub struct BulkErrors {
    failures: Vec<BatchFailure>,
}

impl BulkErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: BatchFailure) {
        self.failures.push(failure);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BatchFailure> {
        self.failures.iter()
    }

    pub fn into_inner(self) -> Vec<BatchFailure> {
        self.failures
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), BulkErrors> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<BatchFailure>> for BulkErrors {
    fn from(failures: Vec<BatchFailure>) -> Self {
        Self { failures }
    }
}

impl IntoIterator for BulkErrors {
    type Item = BatchFailure;
    type IntoIter = std::vec::IntoIter<BatchFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a BulkErrors {
    type Item = &'a BatchFailure;
    type IntoIter = std::slice::Iter<'a, BatchFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl fmt::Display for BulkErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.as_slice() {
            [] => write!(f, "no batch failures"),
            [only] => write!(f, "1 bulk batch failed: {only}"),
            [first, ..] => write!(
                f,
                "{} bulk batches failed; first: {first}",
                self.failures.len()
            ),
        }
    }
}

impl std::error::Error for BulkErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| f as &(dyn std::error::Error + 'static))
    }
}
