//! Aurelia Core - the orchestration layer behind the Aurelia antiques storefront.
//!
//! The storefront offers a catalog, a per-item curator assistant ("Aurelius")
//! and an image appraisal tool. The model work is done by an external
//! generative-AI service; this crate shapes requests for it, keeps the curator
//! conversation state, and guarantees callers always receive text back.
//!
//! # Architecture
//!
//! ```text
//! Shell → Appraiser (one-shot)       ┐
//!       → CuratorDesk → CuratorSession ┴→ ClientFactory (memoized) → LlmProvider → API
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use aurelia_core::{Aurelia, Config};
//!
//! #[tokio::main]
//! async fn main() -> aurelia_core::Result<()> {
//!     let aurelia = Aurelia::new(Config::load()?)?;
//!
//!     let mut desk = aurelia.curator_desk();
//!     let clock = aurelia.catalog().find("1").unwrap();
//!     let session = desk.view(clock)?;
//!     println!("{}", session.send("What era is this?").await);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod appraisal;
pub mod catalog;
pub mod config;
pub mod curator;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod types;

// Re-exports for convenient access
pub use appraisal::{Appraiser, APPRAISAL_FALLBACKS, APPRAISAL_PROMPT};
pub use catalog::{Catalog, CatalogItem};
pub use config::Config;
pub use curator::{
    CuratorDesk, CuratorSession, SessionPhase, ARCHIVES_UNAVAILABLE, CURATOR_FALLBACKS,
};
pub use error::{AureliaError, CatalogError, ConfigError, LlmError, Result};
pub use fallback::{Fallback, FallbackTexts};
pub use llm::{ClientFactory, ClientHandle, ImageInput};
pub use types::{ChatMessage, Role};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The storefront core: configuration, catalog, and the shared client factory.
pub struct Aurelia {
    config: Config,
    catalog: Catalog,
    factory: ClientFactory,
}

impl Aurelia {
    /// Create an instance from configuration.
    ///
    /// Loads the configured catalog file, or the built-in collection. The model
    /// client is not built until the first appraisal or curator session.
    pub fn new(config: Config) -> Result<Self> {
        tracing::debug!("Initializing Aurelia v{}", VERSION);
        let catalog = match config.catalog_path() {
            Some(path) => Catalog::load_from(&path)?,
            None => Catalog::builtin(),
        };
        let factory = ClientFactory::from_config(config.llm.clone());
        Ok(Self::with_parts(config, catalog, factory))
    }

    /// Assemble an instance from already-built parts.
    pub fn with_parts(config: Config, catalog: Catalog, factory: ClientFactory) -> Self {
        Self {
            config,
            catalog,
            factory,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn client_factory(&self) -> &ClientFactory {
        &self.factory
    }

    /// An appraiser bound to the shared client.
    pub fn appraiser(&self) -> std::result::Result<Appraiser, ConfigError> {
        Ok(Appraiser::new(self.factory.get_client()?))
    }

    /// A desk with no item on display.
    pub fn curator_desk(&self) -> CuratorDesk<'_> {
        CuratorDesk::new(&self.factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;
    use std::sync::Arc;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_new_uses_builtin_catalog() {
        let aurelia = Aurelia::new(Config::default()).unwrap();
        assert_eq!(aurelia.catalog().len(), 6);
        assert!(!aurelia.client_factory().is_initialized());
    }

    #[test]
    fn test_new_loads_configured_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            "[[items]]\nid = \"a\"\nname = \"Sextant\"\nprice = 700.0\ncategory = \"Nautical\"\n\
             era = \"1850s\"\ndescription = \"Brass.\"\nhistory = \"Whaler.\"\nimage = \"s.jpg\"\n",
        )
        .unwrap();
        let mut config = Config::default();
        config.catalog.path = Some(path.to_string_lossy().into_owned());

        let aurelia = Aurelia::new(config).unwrap();
        assert_eq!(aurelia.catalog().find("a").unwrap().name, "Sextant");
    }

    #[test]
    fn test_new_reports_bad_catalog() {
        let mut config = Config::default();
        config.catalog.path = Some("/nonexistent/catalog.toml".to_string());
        assert!(matches!(
            Aurelia::new(config),
            Err(AureliaError::Catalog(CatalogError::Read { .. }))
        ));
    }

    #[tokio::test]
    async fn test_appraiser_and_desk_share_one_client() {
        let provider = MockProvider::success("A handsome piece.");
        let calls = provider.call_count_handle();
        let client: ClientHandle = Arc::new(provider);
        let factory = ClientFactory::from_builder(move || Ok(client.clone()));
        let aurelia = Aurelia::with_parts(Config::default(), Catalog::builtin(), factory);

        let appraiser = aurelia.appraiser().unwrap();
        assert_eq!(appraiser.appraise("AAAA", "image/png").await, "A handsome piece.");

        let mut desk = aurelia.curator_desk();
        let session = desk.view(aurelia.catalog().find("6").unwrap()).unwrap();
        assert_eq!(session.send("Is it wool?").await, "A handsome piece.");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
