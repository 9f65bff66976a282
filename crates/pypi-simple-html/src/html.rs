use tl::{HTMLTag, VDom, VDomGuard};
use tracing::debug;
use url::Url;

use pypi_simple_filename::DistributionPackageError;
use pypi_simple_types::{Attributes, BaseUrl, Link};

use crate::input::{decode, HtmlSource};
use crate::options::ParseOptions;

/// Parse an HTML page into a lazy stream of the links it contains.
///
/// Each item carries the anchor text (outer whitespace stripped), the `href` resolved against
/// the page's effective base URL, and the anchor's attributes keyed by lowercase name — the
/// unresolved `href` included. Anchors without an `href` attribute are skipped.
///
/// The stream is finite, forward-only, and not restartable: to iterate again, parse again.
/// Dropping it early releases the parse tree.
pub fn parse_links<'h>(
    html: impl Into<HtmlSource<'h>>,
    options: &ParseOptions,
) -> Result<Links<'h>, Error> {
    let dom = Dom::parse(html.into(), options.encoding.as_deref())?;
    let base = effective_base(dom.get(), options.base_url.as_ref())?;
    Ok(Links {
        dom,
        base,
        cursor: 0,
    })
}

/// The parse tree, borrowing the caller's text where possible and owning the decoded buffer
/// otherwise.
enum Dom<'h> {
    Borrowed(VDom<'h>),
    Owned(VDomGuard),
}

impl<'h> Dom<'h> {
    fn parse(source: HtmlSource<'h>, encoding: Option<&str>) -> Result<Self, Error> {
        match source {
            HtmlSource::Text(text) => Ok(Self::Borrowed(tl::parse(
                text,
                tl::ParserOptions::default(),
            )?)),
            HtmlSource::Bytes(bytes) => match decode(bytes, encoding) {
                std::borrow::Cow::Borrowed(text) => Ok(Self::Borrowed(tl::parse(
                    text,
                    tl::ParserOptions::default(),
                )?)),
                std::borrow::Cow::Owned(text) => Ok(Self::Owned(unsafe {
                    tl::parse_owned(text, tl::ParserOptions::default())
                }?)),
            },
        }
    }

    fn get(&self) -> &VDom<'_> {
        match self {
            Self::Borrowed(dom) => dom,
            Self::Owned(guard) => guard.get_ref(),
        }
    }
}

/// Determine the base URL to which the page's links resolve.
///
/// The first `<base>` element carrying an `href` overrides the caller's base URL; when both are
/// present, the declared href is itself resolved against the caller's. A relative declared base
/// with no caller base is unresolvable and surfaces the underlying URL error.
fn effective_base(dom: &VDom<'_>, supplied: Option<&Url>) -> Result<Option<BaseUrl>, Error> {
    let declared = dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .filter(|tag| tag.name().as_bytes().eq_ignore_ascii_case(b"base"))
        .find_map(|tag| attribute_value(tag, "href"));

    let base = match (supplied, declared) {
        (Some(supplied), Some(declared)) => Some(
            supplied
                .join(&declared)
                .map_err(|err| Error::UrlParse(declared, err))?,
        ),
        (None, Some(declared)) => {
            Some(Url::parse(&declared).map_err(|err| Error::UrlParse(declared, err))?)
        }
        (Some(supplied), None) => Some(supplied.clone()),
        (None, None) => None,
    };
    Ok(base.map(BaseUrl::from))
}

/// Look up an attribute by name, ASCII case-insensitively, decoding HTML entities in its value.
/// A valueless attribute reads as the empty string.
fn attribute_value(tag: &HTMLTag<'_>, name: &str) -> Option<String> {
    tag.attributes()
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| match value {
            Some(value) => html_escape::decode_html_entities(value.as_ref()).into_owned(),
            None => String::new(),
        })
}

/// The lazy stream of [`Link`]s produced by [`parse_links`], in document order.
pub struct Links<'h> {
    dom: Dom<'h>,
    base: Option<BaseUrl>,
    cursor: usize,
}

impl Links<'_> {
    /// The effective base URL of the page, if any.
    pub fn base_url(&self) -> Option<&BaseUrl> {
        self.base.as_ref()
    }
}

impl Iterator for Links<'_> {
    type Item = Result<Link, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dom = self.dom.get();
            let node = dom.nodes().get(self.cursor)?;
            self.cursor += 1;

            let Some(tag) = node.as_tag() else {
                continue;
            };
            if !tag.name().as_bytes().eq_ignore_ascii_case(b"a") {
                continue;
            }

            let mut attributes = Attributes::default();
            for (name, value) in tag.attributes().iter() {
                let value = match value {
                    Some(value) => html_escape::decode_html_entities(value.as_ref()).into_owned(),
                    None => String::new(),
                };
                attributes.insert(&name, value);
            }

            let Some(href) = attributes.get_str("href") else {
                debug!("Skipping anchor without an href attribute");
                continue;
            };

            let url = match &self.base {
                Some(base) => match base.join_relative(href) {
                    Ok(url) => url.to_string(),
                    Err(err) => return Some(Err(Error::UrlParse(href.to_string(), err))),
                },
                None => href.to_string(),
            };

            let text = tag.inner_text(dom.parser());
            let text = html_escape::decode_html_entities(text.as_ref())
                .trim()
                .to_string();

            return Some(Ok(Link {
                text,
                url,
                attributes,
            }));
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    HtmlParse(#[from] tl::ParseError),

    #[error("Failed to parse URL: {0}")]
    UrlParse(String, #[source] url::ParseError),

    #[error(transparent)]
    Classify(#[from] DistributionPackageError),
}
