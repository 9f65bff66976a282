use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use pypi_simple_normalize::{InvalidNameError, PackageName};

use crate::SourceDistExtension;

/// A source distribution filename, split into name, version, and extension.
///
/// Note that this is a normalized and not an exact representation; keep the original string if
/// you need the latter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceDistFilename {
    pub name: PackageName,
    pub version: String,
    pub extension: SourceDistExtension,
}

impl SourceDistFilename {
    /// No `FromStr` impl since we need to know the package name to be able to reasonably parse
    /// these (consider e.g. `a-1-1.zip`).
    pub fn parse(
        filename: &str,
        extension: SourceDistExtension,
        package_name: &PackageName,
    ) -> Result<Self, SourceDistFilenameError> {
        let Some(stem) = extension.strip_suffix(filename) else {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Extension,
            });
        };

        // The stem must be `<name>-<version>`, with the name spelled the way the filename
        // spells it. Normalization is length-preserving for already-collapsed names, which is
        // the only spelling a compliant index produces.
        let name_len = package_name.as_ref().len();
        if stem.len() <= name_len + 1 || !stem.is_char_boundary(name_len) {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Filename(package_name.clone()),
            });
        }
        let actual_package_name =
            PackageName::from_str(&stem[..name_len]).map_err(|err| SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::PackageName(err),
            })?;
        if &actual_package_name != package_name || stem.as_bytes()[name_len] != b'-' {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Filename(package_name.clone()),
            });
        }

        Ok(Self {
            name: package_name.clone(),
            version: stem[name_len + 1..].to_string(),
            extension,
        })
    }

    /// Like [`SourceDistFilename::parse`], but without knowing the package name.
    ///
    /// Source dist filenames can be ambiguous, e.g. `a-1-1.tar.gz`. Without knowing the package
    /// name, we assume that the version doesn't contain a minus (the name is normalized).
    pub fn parsed_normalized_filename(filename: &str) -> Result<Self, SourceDistFilenameError> {
        let Ok(extension) = SourceDistExtension::from_path(filename) else {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Extension,
            });
        };
        let Some(stem) = extension.strip_suffix(filename) else {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Extension,
            });
        };

        let Some((package_name, version)) = stem.rsplit_once('-') else {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Minus,
            });
        };
        let package_name =
            PackageName::from_str(package_name).map_err(|err| SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::PackageName(err),
            })?;
        if version.is_empty() {
            return Err(SourceDistFilenameError {
                filename: filename.to_string(),
                kind: SourceDistFilenameErrorKind::Version,
            });
        }

        Ok(Self {
            name: package_name,
            version: version.to_string(),
            extension,
        })
    }
}

impl Display for SourceDistFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}.{}",
            self.name.as_dist_info_name(),
            self.version,
            self.extension
        )
    }
}

#[derive(Error, Debug, Clone)]
pub struct SourceDistFilenameError {
    filename: String,
    kind: SourceDistFilenameErrorKind,
}

impl Display for SourceDistFilenameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to parse source distribution filename {}: {}",
            self.filename, self.kind
        )
    }
}

#[derive(Error, Debug, Clone)]
enum SourceDistFilenameErrorKind {
    #[error("Name doesn't start with package name {0}")]
    Filename(PackageName),
    #[error("File extension is invalid")]
    Extension,
    #[error("Version section is invalid")]
    Version,
    #[error(transparent)]
    PackageName(#[from] InvalidNameError),
    #[error("Missing name-version separator")]
    Minus,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pypi_simple_normalize::PackageName;

    use crate::{SourceDistExtension, SourceDistFilename};

    /// Only test already normalized names since the parsing is lossy.
    #[test]
    fn roundtrip() {
        for normalized in [
            "foo_lib-1.2.3.zip",
            "foo_lib-1.2.3a3.zip",
            "foo_lib-1.2.3.tar.gz",
            "foo_lib-1.2.3.tar.bz2",
            "foo_lib-1.2.3.tar.zst",
        ] {
            let ext = SourceDistExtension::from_path(normalized).unwrap();
            assert_eq!(
                SourceDistFilename::parse(
                    normalized,
                    ext,
                    &PackageName::from_str("foo_lib").unwrap()
                )
                .unwrap()
                .to_string(),
                normalized
            );
        }
    }

    #[test]
    fn ambiguous_name() {
        let filename = SourceDistFilename::parse(
            "a-1-1.tar.gz",
            SourceDistExtension::TarGz,
            &PackageName::from_str("a").unwrap(),
        )
        .unwrap();
        assert_eq!(filename.version, "1-1");

        // Without the hint, the trailing component is taken as the version.
        let filename = SourceDistFilename::parsed_normalized_filename("a-1-1.tar.gz").unwrap();
        assert_eq!(filename.name.as_str(), "a-1");
        assert_eq!(filename.version, "1");
    }

    #[test]
    fn errors() {
        for invalid in ["b-1.2.3.zip", "foobar-1.2.3.zip"] {
            let ext = SourceDistExtension::from_path(invalid).unwrap();
            assert!(
                SourceDistFilename::parse(invalid, ext, &PackageName::from_str("a").unwrap())
                    .is_err()
            );
        }
    }

    #[test]
    fn name_too_long() {
        assert!(SourceDistFilename::parse(
            "foo.zip",
            SourceDistExtension::Zip,
            &PackageName::from_str("foo-lib").unwrap()
        )
        .is_err());
    }
}
