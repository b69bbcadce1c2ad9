// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin runtime for the Maroid hub.
//!
//! [`Loader`] opens plugin libraries (or accepts in-process plugins),
//! validates them, and fans each one out through the [`registrar`]s into the
//! six capability registries collected in [`Registries`].

pub mod loader;
pub mod registrar;
pub mod registries;
pub mod registry;

pub use loader::{Loader, validate_metadata};
pub use registrar::{Registrar, default_registrars};
pub use registries::{LoadedPlugin, PluginOrigin, Registries};
pub use registry::{CORE_COMPONENT, Registry};
