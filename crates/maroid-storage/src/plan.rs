// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Building the ordered list of components to migrate.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use maroid_core::{MaroidError, MigrationSource};
use maroid_plugin::CORE_COMPONENT;
use maroid_plugin::registry::MigrationRegistry;

/// Target of `migrate up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationTarget {
    /// Only the host's own migrations.
    Core,
    /// Core first, then every plugin in registration order.
    All,
    /// A single plugin, by canonical ID.
    Plugin(String),
}

impl FromStr for MigrationTarget {
    type Err = MaroidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(MaroidError::UnknownMigrationTarget("<empty>".to_string())),
            "core" => Ok(Self::Core),
            "all" => Ok(Self::All),
            other => Ok(Self::Plugin(other.to_string())),
        }
    }
}

impl fmt::Display for MigrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => f.write_str("core"),
            Self::All => f.write_str("all"),
            Self::Plugin(id) => f.write_str(id),
        }
    }
}

/// Components to migrate, in order, with their sources.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    pub sources: IndexMap<String, MigrationSource>,
    pub order: Vec<String>,
}

impl MigrationPlan {
    /// Components with their sources, in plan order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, Option<&MigrationSource>)> {
        self.order
            .iter()
            .map(|component| (component.as_str(), self.sources.get(component)))
    }
}

/// Schema owning a component's tables and migration history.
pub fn schema_for(component: &str) -> String {
    if component == CORE_COMPONENT {
        "public".to_string()
    } else {
        component.replace(['.', '-'], "_")
    }
}

/// Plans the components `target` selects from `registry`.
pub fn build_plan(
    target: &MigrationTarget,
    registry: &MigrationRegistry,
) -> Result<MigrationPlan, MaroidError> {
    let core = registry.get(CORE_COMPONENT).cloned().ok_or_else(|| {
        MaroidError::UnknownMigrationTarget(format!(
            "{CORE_COMPONENT} (core migrations are not registered)"
        ))
    })?;

    match target {
        MigrationTarget::Core => Ok(MigrationPlan {
            sources: IndexMap::from([(CORE_COMPONENT.to_string(), core)]),
            order: vec![CORE_COMPONENT.to_string()],
        }),
        MigrationTarget::All => {
            let mut sources = IndexMap::from([(CORE_COMPONENT.to_string(), core)]);
            sources.extend(
                registry
                    .iter()
                    .filter(|(component, _)| *component != CORE_COMPONENT)
                    .map(|(component, source)| (component.to_string(), source.clone())),
            );
            let order = sources.keys().cloned().collect();
            Ok(MigrationPlan { sources, order })
        }
        MigrationTarget::Plugin(id) => {
            let source = registry
                .get(id)
                .filter(|_| id != CORE_COMPONENT)
                .cloned()
                .ok_or_else(|| {
                    MaroidError::UnknownMigrationTarget(format!("invalid plugin ID {id}"))
                })?;
            Ok(MigrationPlan {
                sources: IndexMap::from([(id.clone(), source)]),
                order: vec![id.clone()],
            })
        }
    }
}
