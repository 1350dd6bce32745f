// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for docbulk.
//!
//! This crate defines the shape of the document-database client that the
//! batching layer drives (a [`Database`] that opens [`Collection`]s, each of
//! which hands out [`BulkWrite`] builders), the write operations that flow
//! through it, and the error types shared across the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BatchFailure, BulkErrors, DocbulkError, WriteError, WriteErrors};
pub use traits::{BulkWrite, Collection, Database};
pub use types::{BulkResult, WriteKind, WriteOp, MAX_OPS_PER_BATCH};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docbulk_error_has_all_variants() {
        let _config = DocbulkError::Config("test".into());
        let _storage = DocbulkError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _write = DocbulkError::Write(WriteErrors::new(vec![WriteError {
            index: 0,
            message: "test".into(),
        }]));
        let _unavailable = DocbulkError::CollectionUnavailable {
            name: "users".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _batches = DocbulkError::Batches(BulkErrors::default());
        let _internal = DocbulkError::Internal("test".into());
    }

    #[test]
    fn write_kind_has_six_variants() {
        use std::str::FromStr;

        let variants = [
            WriteKind::Insert,
            WriteKind::Remove,
            WriteKind::RemoveAll,
            WriteKind::Update,
            WriteKind::UpdateAll,
            WriteKind::Upsert,
        ];

        for variant in &variants {
            let s = variant.to_string();
            let parsed = WriteKind::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn max_ops_per_batch_matches_protocol_ceiling() {
        assert_eq!(MAX_OPS_PER_BATCH, 1000);
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_database<T: Database>() {}
        fn _assert_collection<T: Collection>() {}
        fn _assert_bulk_write<T: BulkWrite>() {}
    }
}
