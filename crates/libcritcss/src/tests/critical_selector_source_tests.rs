use crate::tests::utils::parse_clean;
use crate::CriticalSelectorSource;
use crate::StaticSelectorSource;
use crate::UpstreamFailure;
use crate::Viewport;
use indexmap::IndexSet;
use url::Url;

/// A source that fails the way a page loader can.
struct FailingSource(UpstreamFailure);

impl CriticalSelectorSource for FailingSource {
    type Error = UpstreamFailure;

    fn critical_selectors(
        &mut self,
        _page_url: &Url,
        _viewport: &Viewport,
    ) -> Result<IndexSet<String>, UpstreamFailure> {
        Err(self.0.clone())
    }
}

/// Verifies that static selector sets are normalized and deduplicated.
#[test]
fn static_source_normalizes_entries() {
    let source = StaticSelectorSource::new(["ul  >  li", "", "ul > li", "  .a  "]);
    assert_eq!(
        source.selectors().iter().map(String::as_str).collect::<Vec<_>>(),
        ["ul>li", ".a"],
    );
}

/// Verifies that a static source drives pruning like a literal set.
#[test]
fn static_source_drives_pruning() {
    let mut source = StaticSelectorSource::from_lines(".hero\n\n.nav  a\n");
    let page = Url::parse("https://example.com/").unwrap();
    let critical = source
        .critical_selectors(&page, &Viewport::new(1300, 900))
        .unwrap();

    let ast = parse_clean(".hero { a: b } .nav a { c: d } .footer { e: f }");
    assert_eq!(ast.pruned(&critical).to_css(), ".hero { a: b }.nav a { c: d }");
}

/// Verifies the messages and page urls of upstream failures.
#[test]
fn upstream_failures() {
    let url = "https://example.com/".to_string();
    let cases = [
        (
            UpstreamFailure::LoadTimeout { url: url.clone() },
            "timed out loading https://example.com/",
        ),
        (
            UpstreamFailure::Http { url: url.clone(), code: 503 },
            "https://example.com/ responded with HTTP status 503",
        ),
        (
            UpstreamFailure::Redirect {
                url: url.clone(),
                redirect_url: "https://example.com/login".to_string(),
            },
            "https://example.com/ redirected to https://example.com/login",
        ),
        (
            UpstreamFailure::Unknown {
                url: url.clone(),
                message: "renderer crashed".to_string(),
            },
            "failed to load https://example.com/: renderer crashed",
        ),
    ];
    for (failure, message) in cases {
        assert_eq!(failure.to_string(), message);
        assert_eq!(failure.url(), url);
    }
}

/// Verifies that a failing source surfaces its error to the caller.
#[test]
fn failing_source_reports_error() {
    let failure = UpstreamFailure::CrossDomain {
        url: "https://other.example/".to_string(),
    };
    let mut source = FailingSource(failure.clone());
    let page = Url::parse("https://other.example/").unwrap();
    assert_eq!(
        source.critical_selectors(&page, &Viewport::new(800, 600)),
        Err(failure),
    );
}

#[test]
fn viewport_display() {
    assert_eq!(Viewport::new(1280, 800).to_string(), "1280x800");
}
