use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The hex digests advertised for a file, keyed by algorithm.
///
/// On HTML pages, a digest is carried in the URL fragment as `#<algorithm>=<hash>`; only one
/// digest can be present at a time, but the type mirrors the PEP 691 hash dictionary so that
/// JSON-sourced metadata can share it.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Hashes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha384: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha512: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blake2b: Option<String>,
}

impl Hashes {
    /// Parse the hash from a fragment, as in: `sha256=6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61`
    pub fn parse_fragment(fragment: &str) -> Result<Self, HashError> {
        let mut parts = fragment.split('=');

        // Verify that the fragment is of the form `sha256=...`.
        let name = parts
            .next()
            .ok_or_else(|| HashError::InvalidFragment(fragment.to_string()))?;
        let Some(value) = parts.next() else {
            return Err(HashError::InvalidFragment(fragment.to_string()));
        };
        if parts.next().is_some() {
            return Err(HashError::InvalidStructure(fragment.to_string()));
        }

        let mut hashes = Self::default();
        match name {
            "md5" => hashes.md5 = Some(value.to_string()),
            "sha256" => hashes.sha256 = Some(value.to_string()),
            "sha384" => hashes.sha384 = Some(value.to_string()),
            "sha512" => hashes.sha512 = Some(value.to_string()),
            "blake2b" => hashes.blake2b = Some(value.to_string()),
            _ => {
                return Err(HashError::UnsupportedHashAlgorithm(fragment.to_string()));
            }
        }
        Ok(hashes)
    }

    /// Returns `true` if no digest is present.
    pub fn is_empty(&self) -> bool {
        self.md5.is_none()
            && self.sha256.is_none()
            && self.sha384.is_none()
            && self.sha512.is_none()
            && self.blake2b.is_none()
    }
}

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Unexpected hash (expected `<algorithm>:<hash>`): {0}")]
    InvalidStructure(String),

    #[error("Fragment must be of the form `<algorithm>=<hash>`, found: `{0}`")]
    InvalidFragment(String),

    #[error(
        "Unsupported hash algorithm (expected one of: `md5`, `sha256`, `sha384`, `sha512`, or `blake2b`) on: `{0}`"
    )]
    UnsupportedHashAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::{HashError, Hashes};

    #[test]
    fn parse_fragment_sha256() {
        let hashes = Hashes::parse_fragment(
            "sha256=6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61",
        )
        .unwrap();
        assert_eq!(
            hashes.sha256.as_deref(),
            Some("6088930bfe239f0e6710546ab9c19c9ef35e29792895fed6e6e31a023a182a61")
        );
        assert!(hashes.md5.is_none());
    }

    #[test]
    fn parse_fragment_unsupported() {
        let err = Hashes::parse_fragment("blake2=abc").unwrap_err();
        assert!(matches!(err, HashError::UnsupportedHashAlgorithm(_)));
        assert_eq!(
            err.to_string(),
            "Unsupported hash algorithm (expected one of: `md5`, `sha256`, `sha384`, `sha512`, or `blake2b`) on: `blake2=abc`"
        );
    }

    #[test]
    fn parse_fragment_invalid() {
        assert!(matches!(
            Hashes::parse_fragment("main").unwrap_err(),
            HashError::InvalidFragment(_)
        ));
        assert!(matches!(
            Hashes::parse_fragment("sha256=a=b").unwrap_err(),
            HashError::InvalidStructure(_)
        ));
    }
}
