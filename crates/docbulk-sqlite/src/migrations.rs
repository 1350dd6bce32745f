// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!`
//! and applied every time a database is opened.

use docbulk_core::DocbulkError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), DocbulkError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| DocbulkError::Storage {
            source: Box::new(e),
        })?;
    tracing::debug!(
        applied = report.applied_migrations().len(),
        "document store migrations complete"
    );
    Ok(())
}
