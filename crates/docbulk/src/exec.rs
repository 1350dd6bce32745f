// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped runner: open a collection, fill a bulk, finish it.

use docbulk_config::BulkConfig;
use docbulk_core::{Database, DocbulkError};

use crate::bulk::{Bulk, BulkSummary};

/// Run `f` against a fresh [`Bulk`] on `db`'s collection `collection` and finish it.
///
/// The closure is called exactly once. Failures opening the collection or in
/// `config` are returned before it runs; batch failures come back as
/// [`DocbulkError::Batches`]. Calling `finish` inside the closure makes the
/// runner's own `finish` panic.
pub fn exec<D, F>(
    db: &D,
    collection: &str,
    config: BulkConfig,
    f: F,
) -> Result<(), DocbulkError>
where
    D: Database,
    F: FnOnce(&mut Bulk<D::Collection>),
{
    exec_with_summary(db, collection, config, f).map(|_| ())
}

/// Like [`exec`], returning the accumulator's [`BulkSummary`] on success.
pub fn exec_with_summary<D, F>(
    db: &D,
    collection: &str,
    config: BulkConfig,
    f: F,
) -> Result<BulkSummary, DocbulkError>
where
    D: Database,
    F: FnOnce(&mut Bulk<D::Collection>),
{
    let coll = db.collection(collection)?;
    let mut bulk = Bulk::new(coll, config)?;
    f(&mut bulk);
    bulk.finish()?;
    Ok(bulk.summary())
}

#[cfg(test)]
mod tests {
    use docbulk_core::WriteOp;
    use docbulk_test_utils::MockDatabase;

    use super::*;

    #[test]
    fn runs_callback_once_and_finishes() {
        let db: MockDatabase<&str> = MockDatabase::new();
        let mut calls = 0;

        exec(&db, "logs", BulkConfig::with_ops_per_batch(2), |bulk| {
            calls += 1;
            bulk.insert(["a", "b", "c"]);
        })
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(db.opened(), vec!["logs"]);
        assert_eq!(db.handle("logs").batch_sizes(), vec![2, 1]);
    }

    #[test]
    fn empty_callback_submits_nothing() {
        let db: MockDatabase<&str> = MockDatabase::new();
        exec(&db, "logs", BulkConfig::default(), |_| {}).unwrap();
        assert_eq!(db.handle("logs").batch_count(), 0);
    }

    #[test]
    fn batch_failures_are_aggregated() {
        let db: MockDatabase<&str> = MockDatabase::new();
        db.handle("logs").fail_batch(2, "E");

        let err = exec(&db, "logs", BulkConfig::with_ops_per_batch(1), |bulk| {
            bulk.remove(["a", "b", "c"]);
        })
        .unwrap_err();

        let errs = match err {
            DocbulkError::Batches(errs) => errs,
            other => panic!("expected aggregated batch errors, got {other:?}"),
        };
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.iter().next().unwrap().batch, 2);
        assert_eq!(db.handle("logs").batch_count(), 3);
    }

    #[test]
    fn unavailable_collection_skips_callback() {
        let db: MockDatabase<&str> = MockDatabase::new();
        db.mark_unavailable("locked");
        let mut called = false;

        let err = exec(&db, "locked", BulkConfig::default(), |_| called = true).unwrap_err();

        assert!(!called);
        assert!(matches!(err, DocbulkError::CollectionUnavailable { .. }));
    }

    #[test]
    fn invalid_config_skips_callback() {
        let db: MockDatabase<&str> = MockDatabase::new();
        let mut called = false;

        let err = exec(&db, "logs", BulkConfig::with_ops_per_batch(5000), |_| {
            called = true
        })
        .unwrap_err();

        assert!(!called);
        assert!(matches!(err, DocbulkError::Config(_)));
    }

    #[test]
    fn summary_is_returned() {
        let db: MockDatabase<&str> = MockDatabase::new();
        let summary = exec_with_summary(&db, "logs", BulkConfig::with_ops_per_batch(2), |bulk| {
            bulk.update([("s1", "u1"), ("s2", "u2"), ("s3", "u3")]);
        })
        .unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.operations, 3);
        assert_eq!(summary.result.matched, 3);
        assert_eq!(
            db.handle("logs").operations()[2],
            WriteOp::Update {
                selector: "s3",
                update: "u3"
            }
        );
    }

    #[test]
    #[should_panic(expected = "attempting to finish a bulk twice")]
    fn finishing_inside_callback_panics() {
        let db: MockDatabase<&str> = MockDatabase::new();
        let _ = exec(&db, "logs", BulkConfig::default(), |bulk| {
            let _ = bulk.finish();
        });
    }
}
