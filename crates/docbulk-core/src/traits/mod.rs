// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The document-database client surface the batching layer depends on.
//!
//! Any client that can open a named collection and run an unordered bulk
//! request against it satisfies these traits.

pub mod collection;
pub mod database;

pub use collection::{BulkWrite, Collection};
pub use database::Database;
