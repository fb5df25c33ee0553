use std::sync::Arc;

use async_trait::async_trait;

use super::fetch::{Fetcher, LookupFailure};
use super::locator::{DocumentLocator, Marker};
use super::{lookup, recover, LicenseResolver};
use crate::models::{DependencyRef, Ecosystem, LicenseResult, UNKNOWN_LICENSE};

const BRANCHES: [&str; 2] = ["main", "master"];
const LICENSE_FILES: [&str; 2] = ["LICENSE", "LICENSE.md"];

/// Resolves npm packages in two hops.
///
/// 1. The npmjs.com package page gives the license label.
/// 2. The same page, fetched independently, gives the source repository; the
///    full text is the first raw license file that exists in that repository.
pub struct NpmResolver<L> {
    fetcher: Arc<dyn Fetcher>,
    locator: L,
}

impl<L: DocumentLocator> NpmResolver<L> {
    pub fn new(fetcher: Arc<dyn Fetcher>, locator: L) -> Self {
        Self { fetcher, locator }
    }

    async fn license_text(&self, page: &str) -> Result<String, LookupFailure> {
        let link = lookup(self.fetcher.as_ref(), &self.locator, page, Marker::RepositoryLink).await?;
        let repo = RepositoryRef::parse(&link)
            .ok_or(LookupFailure::MarkerMissing(Marker::RepositoryLink))?;

        let mut last_failure = LookupFailure::MarkerMissing(Marker::LicenseContent);
        for url in repo.license_candidates() {
            match self.fetcher.fetch(&url).await {
                Ok(body) => return Ok(body.trim().to_string()),
                Err(failure) => {
                    tracing::trace!(url = %url, %failure, "license file candidate missed");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}

#[async_trait]
impl<L: DocumentLocator> LicenseResolver for NpmResolver<L> {
    async fn resolve(&self, dep: &DependencyRef) -> LicenseResult {
        let page = Ecosystem::Npm.reference_url(dep);

        let (label, text) = tokio::join!(
            lookup(self.fetcher.as_ref(), &self.locator, &page, Marker::LicenseLabel),
            self.license_text(&page),
        );

        LicenseResult::new(
            recover(label, dep, &page).unwrap_or_else(|| UNKNOWN_LICENSE.to_string()),
            recover(text, dep, &page).unwrap_or_default(),
        )
    }
}

/// GitHub-style `owner/repo` reference taken from a repository link such as
/// `github.com/owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    /// Split on `/` after dropping any scheme: segment 1 is the owner and
    /// segment 2 the repository.
    pub fn parse(link: &str) -> Option<Self> {
        let link = link.trim();
        let path = link.split_once("://").map_or(link, |(_, rest)| rest);

        let mut segments = path.split('/').skip(1);
        let owner = segments.next()?.trim();
        let repo = segments.next()?.trim();
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        if owner.is_empty() || repo.is_empty() {
            return None;
        }

        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Raw license file URLs in probe order: `main` before `master`,
    /// `LICENSE` before `LICENSE.md`.
    pub fn license_candidates(&self) -> Vec<String> {
        BRANCHES
            .iter()
            .flat_map(|branch| {
                LICENSE_FILES.iter().map(move |file| {
                    format!(
                        "https://raw.githubusercontent.com/{}/{}/refs/heads/{}/{}",
                        self.owner, self.repo, branch, file
                    )
                })
            })
            .collect()
    }
}
