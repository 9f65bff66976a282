use tracing::instrument;

use pypi_simple_filename::DistributionPackage;

use crate::html::{parse_links, Error, Links};
use crate::input::HtmlSource;
use crate::options::ParseOptions;

/// A single entry on an index page: a project name and the URL of its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub url: String,
}

/// Parse a repository index page into a lazy stream of [`IndexEntry`] values, in document
/// order. This is [`parse_links`] with the attributes dropped.
pub fn parse_simple_index<'h>(
    html: impl Into<HtmlSource<'h>>,
    options: &ParseOptions,
) -> Result<IndexLinks<'h>, Error> {
    Ok(IndexLinks {
        links: parse_links(html, options)?,
    })
}

/// The lazy stream produced by [`parse_simple_index`].
pub struct IndexLinks<'h> {
    links: Links<'h>,
}

impl Iterator for IndexLinks<'_> {
    type Item = Result<IndexEntry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.links.next()?;
        Some(link.map(|link| IndexEntry {
            name: link.text,
            url: link.url,
        }))
    }
}

/// Parse a project page into its distribution files, in document order.
///
/// Every link on the page is handed to the classifier together with the project name from
/// [`ParseOptions::project`], if set; classification errors surface unchanged.
#[instrument(skip_all, fields(project = ?options.project))]
pub fn parse_project_page<'h>(
    html: impl Into<HtmlSource<'h>>,
    options: &ParseOptions,
) -> Result<Vec<DistributionPackage>, Error> {
    parse_links(html, options)?
        .map(|link| {
            let link = link?;
            DistributionPackage::from_link(&link, options.project.as_ref()).map_err(Error::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use url::Url;

    use pypi_simple_normalize::PackageName;
    use pypi_simple_types::Yanked;

    use super::{parse_project_page, parse_simple_index, IndexEntry};
    use crate::ParseOptions;

    #[test]
    fn index_entries() {
        let html = r#"
            <html><body>
            <a href="http://x/a">PkgA</a>
            <a href="http://x/b">PkgB</a>
            </body></html>
        "#;
        let entries: Vec<IndexEntry> = parse_simple_index(html, &ParseOptions::new())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        insta::assert_debug_snapshot!(entries, @r#"
        [
            IndexEntry {
                name: "PkgA",
                url: "http://x/a",
            },
            IndexEntry {
                name: "PkgB",
                url: "http://x/b",
            },
        ]
        "#);
    }

    #[test]
    fn index_entries_resolve_against_base() {
        let html = r#"<a href="flask/">flask</a><a href="jinja2/">jinja2</a>"#;
        let options = ParseOptions::new().base_url(Url::parse("https://pypi.org/simple/").unwrap());
        let entries: Vec<IndexEntry> = parse_simple_index(html, &options)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            entries,
            [
                IndexEntry {
                    name: "flask".to_string(),
                    url: "https://pypi.org/simple/flask/".to_string(),
                },
                IndexEntry {
                    name: "jinja2".to_string(),
                    url: "https://pypi.org/simple/jinja2/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn project_page() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <body>
            <h1>Links for jinja2</h1>
            <a href="/whl/Jinja2-3.1.2-py3-none-any.whl#sha256=6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61" data-requires-python="&gt;=3.7">Jinja2-3.1.2-py3-none-any.whl</a><br/>
            </body>
            </html>
        "#;
        let options = ParseOptions::new()
            .base_url(Url::parse("https://download.pytorch.org/whl/jinja2/").unwrap());
        let packages = parse_project_page(html, &options).unwrap();
        insta::assert_debug_snapshot!(packages, @r#"
        [
            DistributionPackage {
                filename: "Jinja2-3.1.2-py3-none-any.whl",
                url: "https://download.pytorch.org/whl/Jinja2-3.1.2-py3-none-any.whl#sha256=6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61",
                name: PackageName(
                    "jinja2",
                ),
                version: "3.1.2",
                extension: Wheel,
                requires_python: Some(
                    ">=3.7",
                ),
                has_sig: None,
                yanked: None,
                hashes: Hashes {
                    md5: None,
                    sha256: Some(
                        "6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61",
                    ),
                    sha384: None,
                    sha512: None,
                    blake2b: None,
                },
            },
        ]
        "#);
    }

    #[test]
    fn project_page_with_hint() {
        let html = r#"
            <a href="a-1-1.tar.gz">a-1-1.tar.gz</a>
            <a href="a-1.0-py3-none-any.whl" data-yanked="broken">a-1.0-py3-none-any.whl</a>
        "#;
        let options = ParseOptions::new()
            .base_url(Url::parse("https://pypi.org/simple/a/").unwrap())
            .project(PackageName::from_str("a").unwrap());
        let packages = parse_project_page(html, &options).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name.as_str(), "a");
        assert_eq!(packages[0].version, "1-1");
        assert_eq!(packages[1].version, "1.0");
        assert_eq!(
            packages[1].yanked,
            Some(Yanked::Reason("broken".to_string()))
        );
    }

    #[test]
    fn project_page_preserves_document_order() {
        let html = r#"
            <a href="pkg-2.0.tar.gz">pkg-2.0.tar.gz</a>
            <a href="pkg-1.0.tar.gz">pkg-1.0.tar.gz</a>
            <a href="pkg-3.0.tar.gz">pkg-3.0.tar.gz</a>
        "#;
        let packages = parse_project_page(html, &ParseOptions::new()).unwrap();
        let versions: Vec<&str> = packages
            .iter()
            .map(|package| package.version.as_str())
            .collect();
        assert_eq!(versions, ["2.0", "1.0", "3.0"]);
    }

    #[test]
    fn project_page_classification_error_propagates() {
        let html = r#"<a href="not-a-distribution.txt">not-a-distribution.txt</a>"#;
        assert!(parse_project_page(html, &ParseOptions::new()).is_err());
    }
}
