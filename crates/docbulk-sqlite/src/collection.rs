// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collection handles and read queries.

use rusqlite::{params, Connection};
use serde_json::Value;

use docbulk_core::{Collection, DocbulkError};

use crate::bulk::SqliteBulk;
use crate::database::{lock, storage_err, SharedConnection};
use crate::document::{self, Document, ID_FIELD};

/// A stored document together with its row sequence number.
pub(crate) struct StoredDocument {
    pub seq: i64,
    pub body: Document,
}

/// Load every document in `collection`, oldest first.
pub(crate) fn load_documents(
    conn: &Connection,
    collection: &str,
) -> Result<Vec<StoredDocument>, DocbulkError> {
    let mut stmt = conn
        .prepare_cached("SELECT seq, body FROM documents WHERE collection = ?1 ORDER BY seq")
        .map_err(storage_err)?;
    let rows = stmt
        .query_map(params![collection], row_pair)
        .map_err(storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(storage_err)?;
    parse_rows(collection, rows)
}

/// Documents in `collection` that can match `selector`, oldest first.
///
/// A selector naming `_id` is answered from the `(collection, doc_id)` index
/// and reads at most one row. Other selectors scan the collection. Callers
/// still apply [`document::matches`] to the result.
pub(crate) fn candidate_documents(
    conn: &Connection,
    collection: &str,
    selector: &Document,
) -> Result<Vec<StoredDocument>, DocbulkError> {
    if !selector.contains_key(ID_FIELD) {
        return load_documents(conn, collection);
    }

    let mut stmt = conn
        .prepare_cached("SELECT seq, body FROM documents WHERE collection = ?1 AND doc_id = ?2")
        .map_err(storage_err)?;
    let rows = stmt
        .query_map(params![collection, document::id_key(selector)], row_pair)
        .map_err(storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(storage_err)?;
    parse_rows(collection, rows)
}

fn row_pair(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn parse_rows(
    collection: &str,
    rows: Vec<(i64, String)>,
) -> Result<Vec<StoredDocument>, DocbulkError> {
    rows.into_iter()
        .map(|(seq, body)| {
            let value: Value = serde_json::from_str(&body).map_err(storage_err)?;
            match value {
                Value::Object(body) => Ok(StoredDocument { seq, body }),
                _ => Err(DocbulkError::Internal(format!(
                    "stored document {seq} in `{collection}` is not a JSON object"
                ))),
            }
        })
        .collect()
}

/// Handle to one named collection in a [`SqliteDatabase`](crate::SqliteDatabase).
#[derive(Clone)]
pub struct SqliteCollection {
    name: String,
    conn: SharedConnection,
}

impl SqliteCollection {
    pub(crate) fn new(name: &str, conn: SharedConnection) -> Self {
        Self {
            name: name.to_string(),
            conn,
        }
    }

    /// Documents matching `selector`, in insertion order.
    ///
    /// The selector is a JSON object compared field by field; `{}` matches all.
    pub fn find(&self, selector: &Value) -> Result<Vec<Value>, DocbulkError> {
        let selector = document::as_selector(selector.clone())
            .map_err(|reason| DocbulkError::Storage { source: reason.into() })?;
        let conn = lock(&self.conn)?;
        Ok(candidate_documents(&conn, &self.name, &selector)?
            .into_iter()
            .filter(|d| document::matches(&selector, &d.body))
            .map(|d| Value::Object(d.body))
            .collect())
    }

    /// Number of documents matching `selector`.
    pub fn count(&self, selector: &Value) -> Result<usize, DocbulkError> {
        Ok(self.find(selector)?.len())
    }
}

impl Collection for SqliteCollection {
    type Document = Value;
    type Bulk = SqliteBulk;

    fn name(&self) -> &str {
        &self.name
    }

    fn bulk(&self) -> SqliteBulk {
        SqliteBulk::new(self.name.clone(), self.conn.clone())
    }
}
