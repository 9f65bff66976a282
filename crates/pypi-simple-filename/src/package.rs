use std::str::Utf8Error;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pypi_simple_normalize::PackageName;
use pypi_simple_types::{HashError, Hashes, Link, Yanked};

use crate::{DistExtension, DistFilename, DistFilenameError};

/// A distribution file listed on a project page, classified from its link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPackage {
    /// The distribution filename, as embedded in the link's URL.
    pub filename: String,
    /// The file's URL, resolved against the page's base URL when one is known.
    pub url: String,
    /// The normalized project name, inferred from the filename.
    pub name: PackageName,
    /// The version, as spelled in the filename.
    pub version: String,
    /// The distribution format, inferred from the filename extension.
    pub extension: DistExtension,
    /// The `data-requires-python` attribute, verbatim.
    pub requires_python: Option<String>,
    /// Whether a GPG signature is advertised via `data-gpg-sig`.
    pub has_sig: Option<bool>,
    /// The `data-yanked` attribute, per PEP 592.
    pub yanked: Option<Yanked>,
    /// The digest carried in the URL fragment, if any.
    pub hashes: Hashes,
}

impl DistributionPackage {
    /// Classify a [`Link`] from a project page into a distribution record.
    ///
    /// The filename is taken from the last path component of the unresolved `href`; the digest,
    /// if any, from the URL fragment; and the remaining metadata from the anchor's `data-*`
    /// attributes.
    pub fn from_link(
        link: &Link,
        project: Option<&PackageName>,
    ) -> Result<Self, DistributionPackageError> {
        let href = link
            .href()
            .ok_or_else(|| DistributionPackageError::MissingHref(link.text.clone()))?;

        // Extract the digest, which should be in the fragment.
        let (path, hashes) = if let Some((path, fragment)) = href.split_once('#') {
            let fragment = percent_decode_str(fragment).decode_utf8()?;
            (
                path,
                if fragment.trim().is_empty() {
                    Hashes::default()
                } else {
                    parse_hash_fragment(&fragment)?
                },
            )
        } else {
            (href, Hashes::default())
        };

        // Extract the filename from the last path component of the URL.
        let filename = path
            .split('/')
            .next_back()
            .ok_or_else(|| DistributionPackageError::MissingFilename(href.to_string()))?;

        // Strip any query string from the filename.
        let filename = filename.split('?').next().unwrap_or(filename);

        // Unquote the filename.
        let filename = percent_decode_str(filename)
            .decode_utf8()
            .map_err(|_| DistributionPackageError::UnsupportedFilename(filename.to_string()))?;

        let dist = DistFilename::parse(&filename, project)?;

        // A bare `data-yanked` reads as "yanked, no reason given", per PEP 592.
        let yanked = link.attributes.get_str("data-yanked").map(|reason| {
            if reason.is_empty() {
                Yanked::Bool(true)
            } else {
                Yanked::Reason(reason.to_string())
            }
        });

        Ok(Self {
            filename: filename.into_owned(),
            url: link.url.clone(),
            name: dist.name().clone(),
            version: dist.version().to_string(),
            extension: dist.extension(),
            requires_python: link
                .attributes
                .get_str("data-requires-python")
                .map(String::from),
            has_sig: link
                .attributes
                .get_str("data-gpg-sig")
                .map(|sig| sig == "true"),
            yanked,
            hashes,
        })
    }
}

/// Parse a digest fragment, ignoring fragments that plainly aren't digests (`#main`, `#egg=...`).
fn parse_hash_fragment(fragment: &str) -> Result<Hashes, DistributionPackageError> {
    match Hashes::parse_fragment(fragment) {
        Ok(hashes) => Ok(hashes),
        Err(err @ (HashError::InvalidFragment(..) | HashError::InvalidStructure(..))) => {
            // If the URL includes an irrelevant fragment (e.g., `#main`), ignore it.
            debug!("{err}");
            Ok(Hashes::default())
        }
        Err(HashError::UnsupportedHashAlgorithm(fragment)) => {
            if fragment.split('=').next() == Some("egg") {
                // If the URL references an egg fragment, ignore it.
                debug!("{}", HashError::UnsupportedHashAlgorithm(fragment));
                Ok(Hashes::default())
            } else {
                // If the URL references a digest, but with an unsupported algorithm, error.
                Err(HashError::UnsupportedHashAlgorithm(fragment).into())
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum DistributionPackageError {
    #[error("Missing href attribute on anchor link: `{0}`")]
    MissingHref(String),

    #[error("Expected distribution filename as last path component of URL: {0}")]
    MissingFilename(String),

    #[error("Expected distribution filename to be UTF-8: {0}")]
    UnsupportedFilename(String),

    #[error(transparent)]
    FragmentDecode(#[from] Utf8Error),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Filename(#[from] DistFilenameError),
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pypi_simple_normalize::PackageName;
    use pypi_simple_types::{Attributes, Link, Yanked};

    use super::DistributionPackage;
    use crate::{DistExtension, SourceDistExtension};

    fn make_link(href: &str, extra: &[(&str, &str)]) -> Link {
        let mut attributes = Attributes::default();
        attributes.insert("href", href.to_string());
        for (name, value) in extra {
            attributes.insert(name, (*value).to_string());
        }
        Link {
            text: href.rsplit('/').next().unwrap_or(href).to_string(),
            url: format!("https://example.org{href}"),
            attributes,
        }
    }

    #[test]
    fn classify_wheel() {
        let link = make_link(
            "/whl/Jinja2-3.1.2-py3-none-any.whl#sha256=6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61",
            &[("data-requires-python", ">=3.7")],
        );
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.filename, "Jinja2-3.1.2-py3-none-any.whl");
        assert_eq!(package.name.as_str(), "jinja2");
        assert_eq!(package.version, "3.1.2");
        assert_eq!(package.extension, DistExtension::Wheel);
        assert_eq!(package.requires_python.as_deref(), Some(">=3.7"));
        assert_eq!(
            package.hashes.sha256.as_deref(),
            Some("6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61")
        );
        assert_eq!(package.yanked, None);
        assert_eq!(package.has_sig, None);
    }

    #[test]
    fn classify_sdist_with_hint() {
        let hint = PackageName::from_str("a").unwrap();
        let link = make_link("/packages/a-1-1.tar.gz", &[]);
        let package = DistributionPackage::from_link(&link, Some(&hint)).unwrap();
        assert_eq!(package.name.as_str(), "a");
        assert_eq!(package.version, "1-1");
        assert_eq!(
            package.extension,
            DistExtension::Source(SourceDistExtension::TarGz)
        );
    }

    #[test]
    fn classify_sdist_without_hint() {
        let link = make_link("/packages/a-1-1.tar.gz", &[]);
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.name.as_str(), "a-1");
        assert_eq!(package.version, "1");
    }

    #[test]
    fn quoted_filename() {
        let link = make_link("cpu/torchtext-0.17.0%2Bcpu-cp39-cp39-win_amd64.whl", &[]);
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.filename, "torchtext-0.17.0+cpu-cp39-cp39-win_amd64.whl");
        assert_eq!(package.version, "0.17.0+cpu");
    }

    #[test]
    fn query_string_stripped() {
        let link = make_link("/whl/Jinja2-3.1.2-py3-none-any.whl?project=legacy", &[]);
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.filename, "Jinja2-3.1.2-py3-none-any.whl");
    }

    #[test]
    fn irrelevant_fragments_ignored() {
        for href in [
            "/whl/Jinja2-3.1.2-py3-none-any.whl#main",
            "/whl/Jinja2-3.1.2-py3-none-any.whl#egg=jinja2",
            "/whl/Jinja2-3.1.2-py3-none-any.whl#",
        ] {
            let package = DistributionPackage::from_link(&make_link(href, &[]), None).unwrap();
            assert!(package.hashes.is_empty(), "{href}");
        }
    }

    #[test]
    fn unsupported_hash_algorithm() {
        let link = make_link("/whl/Jinja2-3.1.2-py3-none-any.whl#blake2=abc", &[]);
        assert!(DistributionPackage::from_link(&link, None).is_err());
    }

    #[test]
    fn yanked() {
        let link = make_link("/packages/flask-3.0.1.tar.gz", &[("data-yanked", "")]);
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.yanked, Some(Yanked::Bool(true)));
        assert!(package.yanked.unwrap().is_yanked());

        let link = make_link(
            "/packages/flask-3.0.1.tar.gz",
            &[("data-yanked", "broken metadata")],
        );
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(
            package.yanked,
            Some(Yanked::Reason("broken metadata".to_string()))
        );
    }

    #[test]
    fn gpg_sig() {
        let link = make_link("/packages/flask-3.0.1.tar.gz", &[("data-gpg-sig", "true")]);
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.has_sig, Some(true));

        let link = make_link("/packages/flask-3.0.1.tar.gz", &[("data-gpg-sig", "false")]);
        let package = DistributionPackage::from_link(&link, None).unwrap();
        assert_eq!(package.has_sig, Some(false));
    }

    #[test]
    fn unclassifiable() {
        let link = make_link("/docs/index.html", &[]);
        assert!(DistributionPackage::from_link(&link, None).is_err());
    }

    #[test]
    fn missing_href() {
        let link = Link {
            text: "no href".to_string(),
            url: String::new(),
            attributes: Attributes::default(),
        };
        assert!(DistributionPackage::from_link(&link, None).is_err());
    }
}
