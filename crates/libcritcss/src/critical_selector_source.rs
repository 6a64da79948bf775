//! The boundary to whatever decides which selectors are critical.
//!
//! Usually that is a page loader: it renders a page at a given viewport
//! size and reports the selectors that matched visible elements. This
//! crate never loads pages itself; it only consumes the resulting set.

use indexmap::IndexSet;
use url::Url;

/// The size of the rendering surface critical selectors are computed for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Why a page loader could not produce a critical selector set.
///
/// None of these are recoverable by this crate: without a selector set
/// there is nothing to prune against.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("timed out loading {url}")]
    LoadTimeout { url: String },

    #[error("{url} could not be inspected because it is on a different origin")]
    CrossDomain { url: String },

    #[error("{url} responded with HTTP status {code}")]
    Http { url: String, code: u16 },

    #[error("{url} redirected to {redirect_url}")]
    Redirect { url: String, redirect_url: String },

    #[error("{url} refuses to be displayed in a frame")]
    FrameDenied { url: String },

    #[error("{url} failed page verification")]
    PageVerification { url: String },

    #[error("failed to load {url}: {message}")]
    Unknown { url: String, message: String },
}

impl UpstreamFailure {
    /// The page url the failure is about.
    pub fn url(&self) -> &str {
        match self {
            UpstreamFailure::LoadTimeout { url }
            | UpstreamFailure::CrossDomain { url }
            | UpstreamFailure::Http { url, .. }
            | UpstreamFailure::Redirect { url, .. }
            | UpstreamFailure::FrameDenied { url }
            | UpstreamFailure::PageVerification { url }
            | UpstreamFailure::Unknown { url, .. } => url,
        }
    }
}

/// Supplies the selectors that matched visible content on a page.
pub trait CriticalSelectorSource {
    type Error: std::error::Error;

    fn critical_selectors(
        &mut self,
        page_url: &Url,
        viewport: &Viewport,
    ) -> Result<IndexSet<String>, Self::Error>;
}

/// A [`CriticalSelectorSource`] that returns the same set for every page,
/// for example one read from a file.
///
/// ```
/// use libcritcss::CriticalSelectorSource;
/// use libcritcss::StaticSelectorSource;
/// use libcritcss::Viewport;
/// use url::Url;
///
/// let mut source = StaticSelectorSource::from_lines("\n.hero\n  nav > a  \n");
/// let page = Url::parse("https://example.com/").unwrap();
/// let selectors = source.critical_selectors(&page, &Viewport::new(1280, 800)).unwrap();
/// assert_eq!(selectors.into_iter().collect::<Vec<_>>(), [".hero", "nav>a"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticSelectorSource {
    selectors: IndexSet<String>,
}

impl StaticSelectorSource {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = selectors
            .into_iter()
            .map(|selector| crate::ast::normalize_selector(selector.as_ref()))
            .filter(|selector| !selector.is_empty())
            .collect();
        Self { selectors }
    }

    /// Reads one selector per line. Blank lines are ignored.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn selectors(&self) -> &IndexSet<String> {
        &self.selectors
    }
}

impl CriticalSelectorSource for StaticSelectorSource {
    type Error = std::convert::Infallible;

    fn critical_selectors(
        &mut self,
        _page_url: &Url,
        _viewport: &Viewport,
    ) -> Result<IndexSet<String>, Self::Error> {
        Ok(self.selectors.clone())
    }
}
