//! Structural lookups inside fetched HTML pages.
//!
//! Each external site gets one small adapter; the resolution chains only see
//! [`DocumentLocator::find_by_marker`], so page layout changes stay here.

use scraper::{ElementRef, Html, Selector};

/// The fragments a resolution chain looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Short license name shown on the package page.
    LicenseLabel,
    /// Full license document text.
    LicenseContent,
    /// Source repository reference, e.g. `github.com/owner/repo`.
    RepositoryLink,
}

pub trait DocumentLocator: Send + Sync {
    /// Trimmed text of the fragment carrying `marker`, or `None` when the
    /// document has no such fragment (or it is empty).
    fn find_by_marker(&self, document: &str, marker: Marker) -> Option<String>;
}

/// pkg.go.dev documentation pages and their `?tab=licenses` variant.
pub struct PkgGoDevLocator;

impl DocumentLocator for PkgGoDevLocator {
    fn find_by_marker(&self, document: &str, marker: Marker) -> Option<String> {
        let selector = match marker {
            Marker::LicenseLabel => r#"a[data-test-id="UnitHeader-license"]"#,
            Marker::LicenseContent => "pre.License-contents",
            Marker::RepositoryLink => return None,
        };
        select_text(&Html::parse_document(document), selector)
    }
}

/// www.npmjs.com package pages.
pub struct NpmjsLocator;

impl DocumentLocator for NpmjsLocator {
    fn find_by_marker(&self, document: &str, marker: Marker) -> Option<String> {
        let html = Html::parse_document(document);
        match marker {
            Marker::LicenseLabel => license_after_heading(&html),
            Marker::RepositoryLink => select_text(&html, "span#repository-link"),
            Marker::LicenseContent => None,
        }
    }
}

fn select_text(html: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    html.select(&selector).next().and_then(element_text)
}

/// The `<p>` following the `<h3>License</h3>` heading in the page's main element.
fn license_after_heading(html: &Html) -> Option<String> {
    let headings = Selector::parse("main#main h3").ok()?;
    let heading = html
        .select(&headings)
        .find(|h| h.text().collect::<String>().trim() == "License")?;

    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "p")
        .and_then(element_text)
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
