// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Migration sources handed over by plugins and the core.
//!
//! Migration files follow the `V{version}__{name}.sql` naming convention,
//! e.g. `V1__create_readings.sql`.

use std::path::PathBuf;

use crate::error::MaroidError;

/// One SQL migration: its name without extension and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub name: String,
    pub sql: String,
}

impl MigrationFile {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }
}

/// Where a component's migrations come from.
#[derive(Debug, Clone)]
pub enum MigrationSource {
    /// A directory of `*.sql` files read at migration time.
    Directory(PathBuf),
    /// Migrations compiled into the binary, usually via `include_str!`.
    Embedded(Vec<MigrationFile>),
}

impl MigrationSource {
    /// All migrations of this source, sorted by name.
    pub fn files(&self) -> Result<Vec<MigrationFile>, MaroidError> {
        let mut files = match self {
            Self::Embedded(files) => files.clone(),
            Self::Directory(dir) => {
                let mut files = Vec::new();
                for entry in std::fs::read_dir(dir).map_err(MaroidError::storage)? {
                    let path = entry.map_err(MaroidError::storage)?.path();
                    if path.extension().and_then(|e| e.to_str()) != Some("sql") {
                        continue;
                    }
                    let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    let sql = std::fs::read_to_string(&path).map_err(MaroidError::storage)?;
                    files.push(MigrationFile::new(name, sql));
                }
                files
            }
        };
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}
