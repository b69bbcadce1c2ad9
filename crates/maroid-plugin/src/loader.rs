// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin loading: open, construct, validate, fan out.
//!
//! A plugin library exports one [`PluginDeclaration`] static. The loader
//! checks the declaration revision and core version before trusting the
//! constructor, builds the plugin with the host and its config map, validates
//! its metadata, rejects duplicate identities, and hands it to every
//! registrar. Any failure aborts: the caller treats loading as fail-fast.

// Opening libraries and reading the exported declaration needs FFI.
#![allow(unsafe_code)]

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;

use libloading::{Library, Symbol};
use maroid_core::declaration::{
    ABI_REVISION, CORE_VERSION, DECLARATION_SYMBOL, PluginConfigMap, PluginDeclaration,
};
use maroid_core::{API_VERSION, Host, MaroidError, Plugin, PluginId, PluginMetadata};
use tracing::{debug, info};

use crate::registrar::{Registrar, default_registrars};
use crate::registries::{LoadedPlugin, PluginOrigin, Registries};

/// Loads plugins and fans their capabilities out into [`Registries`].
pub struct Loader {
    host: Arc<dyn Host>,
    registrars: Vec<Box<dyn Registrar>>,
    registries: Registries,
}

impl Loader {
    /// A loader with the six standard registrars.
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self::with_registrars(host, default_registrars())
    }

    pub fn with_registrars(host: Arc<dyn Host>, registrars: Vec<Box<dyn Registrar>>) -> Self {
        Self {
            host,
            registrars,
            registries: Registries::new(),
        }
    }

    /// The registries being filled, e.g. to seed host-owned entries such as
    /// the core migration component before plugins load.
    pub fn registries_mut(&mut self) -> &mut Registries {
        &mut self.registries
    }

    /// Opens the library at `path`, constructs the plugin with `config` and
    /// registers it. Returns the plugin's ID.
    pub fn load(&mut self, path: &Path, config: PluginConfigMap) -> Result<PluginId, MaroidError> {
        let (library, declaration) = open_library(path)?;

        let host = Arc::clone(&self.host);
        let result = catch_unwind(AssertUnwindSafe(|| (declaration.constructor)(host, config)))
            .map_err(|_| MaroidError::Load {
                path: path.to_path_buf(),
                reason: "plugin constructor panicked".to_string(),
            })
            .and_then(|constructed| constructed)
            .and_then(|plugin| {
                self.register(Arc::from(plugin), PluginOrigin::Library(path.to_path_buf()))
            });

        match result {
            Ok(id) => {
                self.registries.retain_library(library);
                Ok(id)
            }
            Err(e) => {
                // The error may own values whose code lives in the library.
                std::mem::forget(library);
                Err(e)
            }
        }
    }

    /// Registers a plugin linked into the host binary. Goes through the same
    /// validation and fan-out as a loaded library.
    pub fn register_instance(&mut self, plugin: Arc<dyn Plugin>) -> Result<PluginId, MaroidError> {
        self.register(plugin, PluginOrigin::InProcess)
    }

    fn register(
        &mut self,
        instance: Arc<dyn Plugin>,
        origin: PluginOrigin,
    ) -> Result<PluginId, MaroidError> {
        let meta = instance.meta();
        let id = validate_metadata(&meta)?;

        if self.registries.plugin(&id).is_some() {
            return Err(MaroidError::PluginAlreadyRegistered(id.to_string()));
        }

        let mut loaded = LoadedPlugin {
            id: id.clone(),
            meta,
            origin,
            instance,
            capabilities: Vec::new(),
        };

        for registrar in &self.registrars {
            if !registrar.supports(loaded.instance.as_ref()) {
                continue;
            }
            registrar
                .register(&loaded, &mut self.registries)
                .map_err(|e| e.in_registration(id.to_string(), registrar.kind()))?;
            debug!(plugin = %id, capability = %registrar.kind(), "capability registered");
            loaded.capabilities.push(registrar.kind());
        }

        info!(
            plugin = %id,
            version = %loaded.meta.version,
            origin = %loaded.origin,
            capabilities = ?loaded.capabilities,
            "plugin loaded"
        );
        self.registries.plugins.push(loaded);
        Ok(id)
    }

    /// Ends the loading phase.
    pub fn finish(self) -> Registries {
        self.registries
    }
}

/// Checks a plugin's identity and API version.
pub fn validate_metadata(meta: &PluginMetadata) -> Result<PluginId, MaroidError> {
    let id = PluginId::parse(&meta.id)?;

    if meta.api_version != API_VERSION {
        return Err(MaroidError::IncompatibleApiVersion {
            plugin: id.to_string(),
            found: meta.api_version.clone(),
            expected: API_VERSION.to_string(),
        });
    }

    Ok(id)
}

/// Opens a plugin library and reads its declaration.
fn open_library(path: &Path) -> Result<(Library, PluginDeclaration), MaroidError> {
    if !path.is_file() {
        return Err(MaroidError::Load {
            path: path.to_path_buf(),
            reason: "file does not exist".to_string(),
        });
    }

    // SAFETY: opening a library runs its initializers. Plugin paths come from
    // the operator's configuration and are trusted code.
    let library = unsafe { Library::new(path) }.map_err(|e| MaroidError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // SAFETY: the symbol is only dereferenced through `read_declaration`,
    // which checks the leading revision field first. The library outlives
    // the returned copy because the caller retains it.
    let declaration = unsafe {
        let symbol: Symbol<*const PluginDeclaration> = library
            .get(DECLARATION_SYMBOL.as_bytes())
            .map_err(|e| MaroidError::SymbolNotFound {
                path: path.to_path_buf(),
                symbol: DECLARATION_SYMBOL.to_string(),
                reason: e.to_string(),
            })?;
        read_declaration(path, *symbol)?
    };

    Ok((library, declaration))
}

/// Copies the declaration behind `ptr` once its revision and core version
/// match this build.
///
/// # Safety
///
/// A non-null `ptr` must point to at least a readable `u32`, and to a full
/// [`PluginDeclaration`] whenever that `u32` equals [`ABI_REVISION`].
unsafe fn read_declaration(
    path: &Path,
    ptr: *const PluginDeclaration,
) -> Result<PluginDeclaration, MaroidError> {
    let unexpected = |detail: String| MaroidError::UnexpectedSymbolType {
        path: path.to_path_buf(),
        symbol: DECLARATION_SYMBOL.to_string(),
        detail,
    };

    if ptr.is_null() {
        return Err(unexpected("declaration is null".to_string()));
    }

    // SAFETY: upheld by the caller.
    let revision = unsafe { std::ptr::read(ptr.cast::<u32>()) };
    if revision != ABI_REVISION {
        return Err(unexpected(format!(
            "declaration revision {revision}, expected {ABI_REVISION}"
        )));
    }

    // SAFETY: the revision matches, so the caller guarantees a full declaration.
    let declaration = unsafe { *ptr };
    if declaration.core_version != CORE_VERSION {
        return Err(unexpected(format!(
            "built against maroid-core {}, host uses {CORE_VERSION}",
            declaration.core_version
        )));
    }
    Ok(declaration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_api_mismatch() {
        let mut meta = PluginMetadata::new("dev.maroid.foo", "1.0.0");
        meta.api_version = "v2".into();
        let err = validate_metadata(&meta).unwrap_err();
        assert!(matches!(err, MaroidError::IncompatibleApiVersion { ref found, .. } if found == "v2"));
    }

    #[test]
    fn validate_rejects_missing_id() {
        let meta = PluginMetadata::new("", "1.0.0");
        assert!(matches!(
            validate_metadata(&meta),
            Err(MaroidError::InvalidPluginId(_))
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let Err(err) = open_library(Path::new("/nonexistent/libmaroid_missing.so")) else {
            panic!("missing file opened");
        };
        assert!(matches!(err, MaroidError::Load { .. }));
    }

    #[test]
    fn non_library_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libbogus.so");
        std::fs::write(&path, b"not a shared object").unwrap();
        let Err(err) = open_library(&path) else {
            panic!("non-library file opened");
        };
        assert!(matches!(err, MaroidError::Load { .. }), "{err}");
    }

    fn refuse(_: Arc<dyn Host>, _: PluginConfigMap) -> Result<Box<dyn Plugin>, MaroidError> {
        Err(MaroidError::plugin("not constructible"))
    }

    fn declaration(abi_revision: u32, core_version: &'static str) -> PluginDeclaration {
        PluginDeclaration {
            abi_revision,
            core_version,
            constructor: refuse,
        }
    }

    fn read(decl: &PluginDeclaration) -> Result<PluginDeclaration, MaroidError> {
        // SAFETY: `decl` is a live, fully initialized declaration.
        unsafe { read_declaration(Path::new("libfixture.so"), decl) }
    }

    fn unexpected_detail(result: Result<PluginDeclaration, MaroidError>) -> String {
        match result {
            Err(MaroidError::UnexpectedSymbolType { symbol, detail, .. }) => {
                assert_eq!(symbol, DECLARATION_SYMBOL);
                detail
            }
            Err(other) => panic!("expected an unexpected-symbol error, got {other}"),
            Ok(_) => panic!("declaration accepted"),
        }
    }

    #[test]
    fn matching_declaration_is_accepted() {
        let decl = read(&declaration(ABI_REVISION, CORE_VERSION)).unwrap();
        assert_eq!(decl.core_version, CORE_VERSION);
    }

    #[test]
    fn null_declaration_is_rejected() {
        // SAFETY: null is checked before any read.
        let result = unsafe { read_declaration(Path::new("libfixture.so"), std::ptr::null()) };
        assert_eq!(unexpected_detail(result), "declaration is null");
    }

    #[test]
    fn foreign_revision_is_rejected() {
        let detail = unexpected_detail(read(&declaration(ABI_REVISION + 1, CORE_VERSION)));
        assert_eq!(
            detail,
            format!("declaration revision {}, expected {ABI_REVISION}", ABI_REVISION + 1)
        );
    }

    #[test]
    fn foreign_core_version_is_rejected() {
        let detail = unexpected_detail(read(&declaration(ABI_REVISION, "0.0.0-elsewhere")));
        assert!(detail.contains("built against maroid-core 0.0.0-elsewhere"), "{detail}");
    }
}
