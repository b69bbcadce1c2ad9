// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database migration capability.

use crate::error::MaroidError;
use crate::migration::MigrationSource;

/// Capability: the plugin ships SQL migrations for its own schema.
pub trait MigrationProvider: Send + Sync {
    fn migrations(&self) -> Result<MigrationSource, MaroidError>;
}
