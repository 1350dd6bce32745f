// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for docbulk.
//!
//! Provides an in-memory database collaborator that records every bulk
//! request it receives and can be told to fail chosen submissions, so the
//! batching layer can be tested without a real database.
//!
//! # Components
//!
//! - [`MockDatabase`] - opens [`MockCollection`]s by name, optionally refusing some
//! - [`MockCollection`] - records submitted batches as [`RecordedBatch`]es

pub mod mock_collection;
pub mod mock_database;

pub use mock_collection::{MockBulk, MockCollection, RecordedBatch};
pub use mock_database::MockDatabase;
