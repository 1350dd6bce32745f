// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded SQLite document store for docbulk.
//!
//! Stores JSON documents per named collection and implements the
//! [`Database`](docbulk_core::Database) / [`Collection`](docbulk_core::Collection)
//! / [`BulkWrite`](docbulk_core::BulkWrite) traits, so a `docbulk::Bulk` can
//! write to it directly. Schema is managed by embedded refinery migrations.

pub mod bulk;
pub mod collection;
pub mod database;
mod document;
pub mod migrations;

pub use bulk::SqliteBulk;
pub use collection::SqliteCollection;
pub use database::SqliteDatabase;
