use std::sync::Arc;

use async_trait::async_trait;

use super::fetch::Fetcher;
use super::locator::{DocumentLocator, Marker};
use super::{lookup, recover, LicenseResolver};
use crate::models::{DependencyRef, Ecosystem, LicenseResult, UNKNOWN_LICENSE};

/// Resolves Go modules from their pkg.go.dev documentation page.
///
/// The label comes from the versioned page header and the full text from the
/// `?tab=licenses` variant. The two fetches are independent of each other.
pub struct GoModuleResolver<L> {
    fetcher: Arc<dyn Fetcher>,
    locator: L,
}

impl<L: DocumentLocator> GoModuleResolver<L> {
    pub fn new(fetcher: Arc<dyn Fetcher>, locator: L) -> Self {
        Self { fetcher, locator }
    }
}

#[async_trait]
impl<L: DocumentLocator> LicenseResolver for GoModuleResolver<L> {
    async fn resolve(&self, dep: &DependencyRef) -> LicenseResult {
        let page = Ecosystem::GoModule.reference_url(dep);
        let licenses_tab = format!("{}?tab=licenses", page);

        let (label, text) = tokio::join!(
            lookup(self.fetcher.as_ref(), &self.locator, &page, Marker::LicenseLabel),
            lookup(self.fetcher.as_ref(), &self.locator, &licenses_tab, Marker::LicenseContent),
        );

        LicenseResult::new(
            recover(label, dep, &page).unwrap_or_else(|| UNKNOWN_LICENSE.to_string()),
            recover(text, dep, &licenses_tab).unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::locator::PkgGoDevLocator;
    use crate::resolver::testing::{FakeFetcher, FakeLocator};

    const PAGE: &str = "https://pkg.go.dev/golang.org/x/text@v0.14.0";
    const TAB: &str = "https://pkg.go.dev/golang.org/x/text@v0.14.0?tab=licenses";

    fn dep() -> DependencyRef {
        DependencyRef::new("golang.org/x/text", "v0.14.0")
    }

    #[tokio::test]
    async fn test_label_and_text_from_both_pages() {
        let fetcher = FakeFetcher::new()
            .with_page(PAGE, r#"<a data-test-id="UnitHeader-license">BSD-3-Clause</a>"#)
            .with_page(TAB, r#"<pre class="License-contents">Copyright 2009 The Go Authors.</pre>"#);
        let resolver = GoModuleResolver::new(Arc::new(fetcher), PkgGoDevLocator);

        let result = resolver.resolve(&dep()).await;
        assert_eq!(
            result,
            LicenseResult::new("BSD-3-Clause", "Copyright 2009 The Go Authors.")
        );
    }

    #[tokio::test]
    async fn test_label_failure_does_not_affect_text() {
        let fetcher = FakeFetcher::new().with_page(TAB, "licenses-tab");
        let locator = FakeLocator::default().answer("licenses-tab", Marker::LicenseContent, "MIT text");
        let resolver = GoModuleResolver::new(Arc::new(fetcher), locator);

        let result = resolver.resolve(&dep()).await;
        assert_eq!(result, LicenseResult::new("unknown", "MIT text"));
    }

    #[tokio::test]
    async fn test_missing_marker_on_text_page() {
        let fetcher = FakeFetcher::new()
            .with_page(PAGE, "main")
            .with_page(TAB, "licenses-tab");
        let locator = FakeLocator::default().answer("main", Marker::LicenseLabel, "Apache-2.0");
        let resolver = GoModuleResolver::new(Arc::new(fetcher), locator);

        let result = resolver.resolve(&dep()).await;
        assert_eq!(result, LicenseResult::new("Apache-2.0", ""));
    }

    #[tokio::test]
    async fn test_both_fetches_failing() {
        let fetcher = Arc::new(FakeFetcher::new());
        let resolver = GoModuleResolver::new(fetcher.clone(), PkgGoDevLocator);

        assert_eq!(resolver.resolve(&dep()).await, LicenseResult::unknown());

        let mut requested = fetcher.requests();
        requested.sort();
        assert_eq!(requested, vec![PAGE.to_string(), TAB.to_string()]);
    }
}
