// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The exported entry point of a dynamically loaded plugin.
//!
//! A plugin library exposes exactly one static, [`DECLARATION_SYMBOL`], of
//! type [`PluginDeclaration`]. It is produced by [`export_plugin!`]:
//!
//! ```ignore
//! fn new(host: Arc<dyn Host>, config: PluginConfigMap) -> Result<Box<dyn Plugin>, MaroidError> {
//!     Ok(Box::new(MyPlugin::new(host, config)?))
//! }
//!
//! maroid_core::export_plugin!(new);
//! ```
//!
//! Plugin and host share Rust types across the library boundary, so both must
//! be built with the same compiler and the same `maroid-core` version. The
//! loader refuses a declaration whose revision or core version differs.

use std::sync::Arc;

use crate::error::MaroidError;
use crate::traits::{Host, Plugin};

/// Name of the exported declaration static.
pub const DECLARATION_SYMBOL: &str = "MAROID_PLUGIN_DECLARATION";

/// Layout revision of [`PluginDeclaration`]. Bumped on any change to it.
pub const ABI_REVISION: u32 = 1;

/// Version of `maroid-core` compiled into this binary.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Free-form plugin configuration taken from the host's config file.
pub type PluginConfigMap = serde_json::Map<String, serde_json::Value>;

/// Signature of a plugin constructor.
pub type PluginConstructor =
    fn(Arc<dyn Host>, PluginConfigMap) -> Result<Box<dyn Plugin>, MaroidError>;

/// The static a plugin library exports under [`DECLARATION_SYMBOL`].
///
/// `abi_revision` stays the first field so the loader can read it before
/// trusting the rest of the layout.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PluginDeclaration {
    pub abi_revision: u32,
    pub core_version: &'static str,
    pub constructor: PluginConstructor,
}

/// Exports a plugin constructor as the library's [`PluginDeclaration`].
#[macro_export]
macro_rules! export_plugin {
    ($constructor:path) => {
        #[unsafe(no_mangle)]
        pub static MAROID_PLUGIN_DECLARATION: $crate::declaration::PluginDeclaration =
            $crate::declaration::PluginDeclaration {
                abi_revision: $crate::declaration::ABI_REVISION,
                core_version: $crate::declaration::CORE_VERSION,
                constructor: $constructor,
            };
    };
}

/// Decodes a plugin's configuration map into a typed struct.
///
/// Missing fields take their serde defaults; unknown or mistyped fields are
/// reported as a plugin configuration error.
pub fn decode_config<T: serde::de::DeserializeOwned>(
    config: &PluginConfigMap,
) -> Result<T, MaroidError> {
    serde_json::from_value(serde_json::Value::Object(config.clone())).map_err(|e| {
        MaroidError::Plugin {
            message: format!("failed to decode plugin config: {e}"),
            source: Some(Box::new(e)),
        }
    })
}
