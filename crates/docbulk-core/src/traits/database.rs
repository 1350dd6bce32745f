// SPDX-FileCopyrightText: 2026 Docbulk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle trait.

use crate::error::DocbulkError;
use crate::traits::collection::Collection;

/// A database that can open named collections.
pub trait Database {
    type Collection: Collection;

    /// Open the collection called `name`.
    fn collection(&self, name: &str) -> Result<Self::Collection, DocbulkError>;
}
