//! License resolution chains against external package pages.
//!
//! [`LicenseResolver::resolve`] is total: every failed fetch or missing page
//! fragment degrades to the `unknown` label or an empty license text for that
//! one field, and never aborts the run.

pub mod fetch;
pub mod go;
pub mod locator;
pub mod npm;
pub mod rate_limit;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{DependencyRef, Ecosystem, LicenseResult};
use fetch::{Fetcher, LookupFailure};
use locator::{DocumentLocator, Marker};

#[async_trait]
pub trait LicenseResolver: Send + Sync {
    async fn resolve(&self, dep: &DependencyRef) -> LicenseResult;
}

/// Resolver for `ecosystem` backed by the site adapters for its registry.
pub fn for_ecosystem(ecosystem: Ecosystem, fetcher: Arc<dyn Fetcher>) -> Box<dyn LicenseResolver> {
    match ecosystem {
        Ecosystem::Npm => Box::new(npm::NpmResolver::new(fetcher, locator::NpmjsLocator)),
        Ecosystem::GoModule => {
            Box::new(go::GoModuleResolver::new(fetcher, locator::PkgGoDevLocator))
        }
    }
}

/// Fetch `url` and pull the fragment carrying `marker` out of it.
async fn lookup(
    fetcher: &dyn Fetcher,
    locator: &dyn DocumentLocator,
    url: &str,
    marker: Marker,
) -> Result<String, LookupFailure> {
    let document = fetcher.fetch(url).await?;
    locator
        .find_by_marker(&document, marker)
        .ok_or(LookupFailure::MarkerMissing(marker))
}

/// Log a failed lookup and drop it; the caller substitutes its placeholder.
fn recover(result: Result<String, LookupFailure>, dep: &DependencyRef, url: &str) -> Option<String> {
    match result {
        Ok(value) => Some(value),
        Err(failure) => {
            tracing::debug!(dependency = %dep.name, url, %failure, "license lookup failed");
            None
        }
    }
}
