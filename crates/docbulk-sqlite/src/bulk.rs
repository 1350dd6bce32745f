// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bulk request execution against the SQLite document store.
//!
//! A request runs inside one transaction. Operations that the store rejects
//! (bad documents, duplicate `_id`, invalid updates) become write errors;
//! unordered requests keep going past them, ordered requests stop at the
//! first. Everything that succeeded is committed either way. A SQLite failure
//! rolls the whole request back.
//!
//! Selectors that name `_id` go through the `(collection, doc_id)` index; other
//! selectors scan the collection once per operation.

use rusqlite::{params, Transaction};
use serde_json::Value;
use tracing::debug;

use docbulk_core::{BulkResult, BulkWrite, DocbulkError, WriteError, WriteErrors, WriteOp};

use crate::collection::candidate_documents;
use crate::database::{lock, storage_err, SharedConnection};
use crate::document::{self, Document, Rejection};

/// Outcome of one failed operation.
enum OpError {
    /// The operation was refused; the rest of the request may continue.
    Rejected(Rejection),
    /// The store itself failed; the request is abandoned.
    Storage(DocbulkError),
}

impl From<DocbulkError> for OpError {
    fn from(e: DocbulkError) -> Self {
        OpError::Storage(e)
    }
}

impl From<rusqlite::Error> for OpError {
    fn from(e: rusqlite::Error) -> Self {
        OpError::Storage(storage_err(e))
    }
}

/// How many matches an update or remove touches.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Multi {
    First,
    All,
}

/// Bulk request builder for a [`SqliteCollection`](crate::SqliteCollection).
pub struct SqliteBulk {
    collection: String,
    conn: SharedConnection,
    ordered: bool,
    ops: Vec<WriteOp<Value>>,
}

impl SqliteBulk {
    pub(crate) fn new(collection: String, conn: SharedConnection) -> Self {
        Self {
            collection,
            conn,
            ordered: true,
            ops: Vec::new(),
        }
    }

    /// Operations queued so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl BulkWrite for SqliteBulk {
    type Document = Value;

    fn unordered(&mut self) {
        self.ordered = false;
    }

    fn insert(&mut self, doc: Value) {
        self.ops.push(WriteOp::Insert(doc));
    }

    fn remove(&mut self, selector: Value) {
        self.ops.push(WriteOp::Remove(selector));
    }

    fn remove_all(&mut self, selector: Value) {
        self.ops.push(WriteOp::RemoveAll(selector));
    }

    fn update(&mut self, selector: Value, update: Value) {
        self.ops.push(WriteOp::Update { selector, update });
    }

    fn update_all(&mut self, selector: Value, update: Value) {
        self.ops.push(WriteOp::UpdateAll { selector, update });
    }

    fn upsert(&mut self, selector: Value, update: Value) {
        self.ops.push(WriteOp::Upsert { selector, update });
    }

    fn run(self) -> Result<BulkResult, DocbulkError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction().map_err(storage_err)?;

        let total = self.ops.len();
        let mut result = BulkResult::default();
        let mut rejected = Vec::new();

        for (index, op) in self.ops.into_iter().enumerate() {
            match execute(&tx, &self.collection, op, &mut result) {
                Ok(()) => {}
                Err(OpError::Rejected(message)) => {
                    rejected.push(WriteError { index, message });
                    if self.ordered {
                        break;
                    }
                }
                Err(OpError::Storage(e)) => return Err(e),
            }
        }

        tx.commit().map_err(storage_err)?;
        debug!(
            collection = %self.collection,
            operations = total,
            rejected = rejected.len(),
            ordered = self.ordered,
            "sqlite bulk request committed"
        );

        if rejected.is_empty() {
            Ok(result)
        } else {
            Err(WriteErrors::new(rejected).into())
        }
    }
}

fn execute(
    tx: &Transaction<'_>,
    collection: &str,
    op: WriteOp<Value>,
    result: &mut BulkResult,
) -> Result<(), OpError> {
    match op {
        WriteOp::Insert(doc) => {
            let mut doc = document::as_document(doc, "document").map_err(OpError::Rejected)?;
            document::ensure_id(&mut doc);
            insert(tx, collection, &doc)?;
            result.inserted += 1;
        }
        WriteOp::Remove(selector) => {
            result.removed += remove(tx, collection, selector, Multi::First)?;
        }
        WriteOp::RemoveAll(selector) => {
            result.removed += remove(tx, collection, selector, Multi::All)?;
        }
        WriteOp::Update { selector, update } => {
            update_matching(tx, collection, selector, update, Multi::First, false, result)?;
        }
        WriteOp::UpdateAll { selector, update } => {
            update_matching(tx, collection, selector, update, Multi::All, false, result)?;
        }
        WriteOp::Upsert { selector, update } => {
            update_matching(tx, collection, selector, update, Multi::First, true, result)?;
        }
    }
    Ok(())
}

fn insert(tx: &Transaction<'_>, collection: &str, doc: &Document) -> Result<(), OpError> {
    let id = document::id_key(doc);
    let body = serde_json::to_string(doc).map_err(storage_err)?;
    match tx.execute(
        "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)",
        params![collection, id, body],
    ) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(OpError::Rejected(format!("duplicate key: _id {id}")))
        }
        Err(e) => Err(e.into()),
    }
}

fn remove(
    tx: &Transaction<'_>,
    collection: &str,
    selector: Value,
    multi: Multi,
) -> Result<u64, OpError> {
    let selector = document::as_selector(selector).map_err(OpError::Rejected)?;
    let mut removed = 0;
    for stored in candidate_documents(tx, collection, &selector)? {
        if !document::matches(&selector, &stored.body) {
            continue;
        }
        tx.execute("DELETE FROM documents WHERE seq = ?1", params![stored.seq])?;
        removed += 1;
        if multi == Multi::First {
            break;
        }
    }
    Ok(removed)
}

fn update_matching(
    tx: &Transaction<'_>,
    collection: &str,
    selector: Value,
    update: Value,
    multi: Multi,
    upsert: bool,
    result: &mut BulkResult,
) -> Result<(), OpError> {
    let selector = document::as_selector(selector).map_err(OpError::Rejected)?;
    let update = document::as_document(update, "update").map_err(OpError::Rejected)?;

    // Validate and compute every change before writing any of them.
    let mut changes = Vec::new();
    for stored in candidate_documents(tx, collection, &selector)? {
        if !document::matches(&selector, &stored.body) {
            continue;
        }
        let next = document::apply_update(&stored.body, &update).map_err(OpError::Rejected)?;
        changes.push((stored.seq, stored.body != next, next));
        if multi == Multi::First {
            break;
        }
    }

    if changes.is_empty() {
        if upsert {
            let seed = document::upsert_seed(&selector, &update).map_err(OpError::Rejected)?;
            insert(tx, collection, &seed)?;
            result.upserted += 1;
        }
        return Ok(());
    }

    for (seq, modified, next) in changes {
        result.matched += 1;
        if modified {
            let body = serde_json::to_string(&next).map_err(storage_err)?;
            tx.execute(
                "UPDATE documents SET body = ?1 WHERE seq = ?2",
                params![body, seq],
            )?;
            result.modified += 1;
        }
    }
    Ok(())
}
