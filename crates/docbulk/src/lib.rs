// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-bounded batching of document database writes.
//!
//! A [`Bulk`] queues inserts, removes, updates and upserts against one
//! collection and submits them as unordered bulk requests of at most
//! `ops_per_batch` operations, so callers never trip the database's
//! per-request limit. Failed batches do not stop later ones; their errors are
//! collected and returned together by [`Bulk::finish`].
//!
//! [`exec`] wraps the whole lifecycle: open a collection, hand a fresh
//! accumulator to a closure, finish it.
//!
//! ```
//! use docbulk::{exec, BulkConfig};
//! use docbulk_test_utils::MockDatabase;
//!
//! let db: MockDatabase<&str> = MockDatabase::new();
//! exec(&db, "events", BulkConfig::with_ops_per_batch(2), |bulk| {
//!     bulk.insert(["a", "b", "c"]);
//! })
//! .expect("no batch failed");
//!
//! assert_eq!(db.handle("events").batch_sizes(), vec![2, 1]);
//! ```

pub mod bulk;
pub mod exec;

pub use bulk::{Bulk, BulkSummary};
pub use exec::{exec, exec_with_summary};

pub use docbulk_config::BulkConfig;
pub use docbulk_core::{
    BatchFailure, BulkErrors, BulkResult, BulkWrite, Collection, Database, DocbulkError, WriteOp,
    MAX_OPS_PER_BATCH,
};
