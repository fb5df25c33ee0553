//! Detect → parse → resolve → aggregate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tokio::sync::watch;

use crate::detector::detect_manifest;
use crate::error::InventoryError;
use crate::manifest::parse_manifest;
use crate::models::{DependencyRef, Ecosystem, LicenseResult, ReportEntry};
use crate::report::aggregate;
use crate::resolver::fetch::Fetcher;
use crate::resolver::{self, LicenseResolver};

/// Result of one run over a project directory.
#[derive(Debug)]
pub struct Inventory {
    pub ecosystem: Ecosystem,
    pub manifest: PathBuf,
    pub entries: Vec<ReportEntry>,
    /// Set when cancellation left some dependencies unresolved; those rows
    /// carry the unknown placeholder.
    pub cancelled: bool,
}

pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    concurrency: usize,
    include_dev: bool,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, concurrency: usize, include_dev: bool) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            include_dev,
        }
    }

    /// Locate and parse the project's manifest.
    pub fn dependencies(&self, project: &Path) -> Result<(Ecosystem, PathBuf, Vec<DependencyRef>), InventoryError> {
        let manifest = detect_manifest(project)?;
        let deps = parse_manifest(&manifest, self.include_dev)?;
        Ok((manifest.ecosystem, manifest.path, deps))
    }

    pub async fn run(
        &self,
        project: &Path,
        cancel: &watch::Receiver<bool>,
        progress: Option<&ProgressBar>,
    ) -> Result<Inventory, InventoryError> {
        let (ecosystem, manifest, deps) = self.dependencies(project)?;
        tracing::info!(%ecosystem, manifest = %manifest.display(), count = deps.len(), "parsed manifest");

        if let Some(pb) = progress {
            pb.set_length(deps.len() as u64);
        }

        let resolver = resolver::for_ecosystem(ecosystem, self.fetcher.clone());
        let (licenses, cancelled) =
            resolve_all(resolver.as_ref(), &deps, self.concurrency, cancel, progress).await;

        Ok(Inventory {
            ecosystem,
            manifest,
            entries: aggregate(ecosystem, deps.into_iter().zip(licenses)),
            cancelled,
        })
    }
}

/// Resolve every dependency with at most `concurrency` in flight.
///
/// Results land in a slot per input index, so the output order is the input
/// order whatever the completion order. Dependencies not started before
/// `cancel` turns true get [`LicenseResult::unknown`]; the returned flag
/// reports whether that happened.
pub async fn resolve_all(
    resolver: &dyn LicenseResolver,
    deps: &[DependencyRef],
    concurrency: usize,
    cancel: &watch::Receiver<bool>,
    progress: Option<&ProgressBar>,
) -> (Vec<LicenseResult>, bool) {
    let mut slots: Vec<Option<LicenseResult>> = vec![None; deps.len()];

    let mut results = stream::iter(deps.iter().enumerate())
        .map(|(index, dep)| async move {
            if *cancel.borrow() {
                return (index, None);
            }
            (index, Some(resolver.resolve(dep).await))
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((index, result)) = results.next().await {
        if let Some(pb) = progress {
            pb.inc(1);
        }
        slots[index] = result;
    }

    let cancelled = slots.iter().any(Option::is_none);
    if cancelled {
        tracing::warn!("run cancelled; unresolved dependencies are reported as unknown");
    }

    let licenses = slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(LicenseResult::unknown))
        .collect();

    (licenses, cancelled)
}
