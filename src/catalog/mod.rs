//! Module catalog loading
//!
//! Handles:
//! - Fetching module descriptors from the content API
//! - Normalizing them into ordered modules
//! - Falling back to the built-in catalog on any failure

pub mod builtin;
pub mod model;
pub mod remote;

use tracing::{info, warn};

pub use model::{Assessment, Catalog, CatalogOrigin, FlowKind, Lesson, Module, QuizQuestion};
pub use remote::{CatalogSource, HttpCatalogSource, ModuleDescriptor, StaticCatalogSource};

/// Load the catalog from `source`. Never fails: network errors, non-2xx
/// responses and unusable payloads all yield the built-in catalog.
pub async fn load_catalog(source: &dyn CatalogSource) -> Catalog {
    let fetched = match source.fetch().await {
        Ok(descriptors) => remote::normalize(descriptors),
        Err(e) => Err(e),
    };

    match fetched {
        Ok(modules) => {
            info!(source = %source.describe(), modules = modules.len(), "Loaded remote catalog");
            Catalog::new(modules, CatalogOrigin::Remote)
        }
        Err(e) => {
            warn!(
                source = %source.describe(),
                error = %e,
                "Catalog unavailable, using built-in modules"
            );
            Catalog::builtin()
        }
    }
}
