use url::Url;

use pypi_simple_normalize::PackageName;

/// Options for parsing a repository page.
#[derive(Debug, Default, Clone)]
pub struct ParseOptions {
    pub(crate) base_url: Option<Url>,
    pub(crate) encoding: Option<String>,
    pub(crate) project: Option<PackageName>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The URL of the page being parsed, used to resolve relative links. A `<base href>` in the
    /// page itself is joined against this URL.
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// A character-encoding hint for byte input, usually the `charset` parameter of the
    /// response's `Content-Type` header. Ignored for text input.
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// The name of the project whose page is being parsed, used to disambiguate source
    /// distribution filenames.
    #[must_use]
    pub fn project(mut self, project: PackageName) -> Self {
        self.project = Some(project);
        self
    }
}
