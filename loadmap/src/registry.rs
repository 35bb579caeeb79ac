//! Loader registration
//!
//! A module loader accepts its configuration table once, before any module
//! is resolved. [`ModuleLoader`] is the configuration entry point;
//! [`Registry`] is the in-process implementation that owns the frozen
//! table and hands out resolvers over it.

use std::sync::Arc;

use loadmap_core::config::LoaderConfig;

use crate::error::RegistryError;
use crate::resolver::Resolver;

/// A module loader's configuration entry point.
pub trait ModuleLoader {
    /// Hands the completed table to the loader.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyConfigured`] if the loader already
    /// holds a table.
    fn configure(&mut self, config: Arc<LoaderConfig>) -> Result<(), RegistryError>;
}

/// Registers `config` with `loader`.
///
/// Accepts an owned table or an already shared one.
///
/// # Errors
///
/// Propagates the loader's refusal, e.g. when it is already configured.
pub fn register<L>(loader: &mut L, config: impl Into<Arc<LoaderConfig>>) -> Result<(), RegistryError>
where
    L: ModuleLoader + ?Sized,
{
    loader.configure(config.into())
}

/// Holds the registered table for the lifetime of the embedding application.
#[derive(Debug, Default)]
pub struct Registry {
    config: Option<Arc<LoaderConfig>>,
}

impl Registry {
    /// Creates an unconfigured registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { config: None }
    }

    /// Returns `true` once a table has been registered.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// The registered table.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotConfigured`] before registration.
    pub fn config(&self) -> Result<&Arc<LoaderConfig>, RegistryError> {
        self.config.as_ref().ok_or(RegistryError::NotConfigured)
    }

    /// A resolver over the registered table.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotConfigured`] before registration.
    pub fn resolver(&self) -> Result<Resolver, RegistryError> {
        self.config().map(|config| Resolver::new(Arc::clone(config)))
    }
}

impl ModuleLoader for Registry {
    fn configure(&mut self, config: Arc<LoaderConfig>) -> Result<(), RegistryError> {
        if self.config.is_some() {
            tracing::warn!("rejected second configuration of the module loader");
            return Err(RegistryError::AlreadyConfigured);
        }

        tracing::info!(
            default_js_extensions = config.default_js_extensions,
            transpiler = config.transpiler.as_deref().unwrap_or("none"),
            paths = config.paths.len(),
            aliases = config.alias_count(),
            scopes = config.scope_count(),
            "module loader configured"
        );

        self.config = Some(config);
        Ok(())
    }
}
