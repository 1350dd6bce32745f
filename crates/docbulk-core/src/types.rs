// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write operations and bulk results shared by the accumulator and collaborators.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::traits::BulkWrite;

/// Maximum number of operations the database accepts in one bulk request.
///
/// Batches larger than this are rejected outright.
pub const MAX_OPS_PER_BATCH: usize = 1000;

/// The kind of a queued write operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WriteKind {
    Insert,
    Remove,
    RemoveAll,
    Update,
    UpdateAll,
    Upsert,
}

/// A single write operation carrying opaque documents or selectors.
///
/// `D` is whatever the collaborator uses for documents; the batching layer
/// never looks inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp<D> {
    /// Insert a document.
    Insert(D),
    /// Remove the first document matching the selector.
    Remove(D),
    /// Remove every document matching the selector.
    RemoveAll(D),
    /// Update the first document matching `selector`.
    Update { selector: D, update: D },
    /// Update every document matching `selector`.
    UpdateAll { selector: D, update: D },
    /// Update the first match, or insert when nothing matches.
    Upsert { selector: D, update: D },
}

impl<D> WriteOp<D> {
    pub fn kind(&self) -> WriteKind {
        match self {
            WriteOp::Insert(_) => WriteKind::Insert,
            WriteOp::Remove(_) => WriteKind::Remove,
            WriteOp::RemoveAll(_) => WriteKind::RemoveAll,
            WriteOp::Update { .. } => WriteKind::Update,
            WriteOp::UpdateAll { .. } => WriteKind::UpdateAll,
            WriteOp::Upsert { .. } => WriteKind::Upsert,
        }
    }

    /// Append this operation to a bulk request builder.
    pub fn apply_to<B>(self, bulk: &mut B)
    where
        B: BulkWrite<Document = D>,
    {
        match self {
            WriteOp::Insert(doc) => bulk.insert(doc),
            WriteOp::Remove(selector) => bulk.remove(selector),
            WriteOp::RemoveAll(selector) => bulk.remove_all(selector),
            WriteOp::Update { selector, update } => bulk.update(selector, update),
            WriteOp::UpdateAll { selector, update } => bulk.update_all(selector, update),
            WriteOp::Upsert { selector, update } => bulk.upsert(selector, update),
        }
    }
}

/// Counts reported by one successful bulk request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    /// Documents matched by update selectors.
    pub matched: u64,
    /// Documents actually changed by updates.
    pub modified: u64,
    pub inserted: u64,
    pub removed: u64,
    /// Documents created by upserts that matched nothing.
    pub upserted: u64,
}

impl BulkResult {
    /// Add another result's counts into this one.
    pub fn absorb(&mut self, other: &BulkResult) {
        self.matched += other.matched;
        self.modified += other.modified;
        self.inserted += other.inserted;
        self.removed += other.removed;
        self.upserted += other.upserted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_kind_display_is_snake_case() {
        assert_eq!(WriteKind::RemoveAll.to_string(), "remove_all");
        assert_eq!(WriteKind::UpdateAll.to_string(), "update_all");
        assert_eq!(WriteKind::Insert.to_string(), "insert");
    }

    #[test]
    fn write_kind_serialization() {
        let json = serde_json::to_string(&WriteKind::Upsert).expect("should serialize");
        assert_eq!(json, "\"upsert\"");
        let parsed: WriteKind = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(parsed, WriteKind::Upsert);
    }

    #[test]
    fn write_op_reports_its_kind() {
        assert_eq!(WriteOp::Insert(1).kind(), WriteKind::Insert);
        assert_eq!(WriteOp::Remove(1).kind(), WriteKind::Remove);
        assert_eq!(WriteOp::RemoveAll(1).kind(), WriteKind::RemoveAll);
        assert_eq!(
            WriteOp::Update {
                selector: 1,
                update: 2
            }
            .kind(),
            WriteKind::Update
        );
        assert_eq!(
            WriteOp::UpdateAll {
                selector: 1,
                update: 2
            }
            .kind(),
            WriteKind::UpdateAll
        );
        assert_eq!(
            WriteOp::Upsert {
                selector: 1,
                update: 2
            }
            .kind(),
            WriteKind::Upsert
        );
    }

    #[test]
    fn bulk_result_absorb_sums_counts() {
        let mut total = BulkResult {
            matched: 1,
            modified: 1,
            inserted: 2,
            removed: 0,
            upserted: 0,
        };
        total.absorb(&BulkResult {
            matched: 3,
            modified: 2,
            inserted: 0,
            removed: 4,
            upserted: 1,
        });
        assert_eq!(
            total,
            BulkResult {
                matched: 4,
                modified: 3,
                inserted: 2,
                removed: 4,
                upserted: 1,
            }
        );
    }
}
