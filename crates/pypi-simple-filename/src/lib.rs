use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use pypi_simple_normalize::PackageName;

pub use extension::{DistExtension, ExtensionError, SourceDistExtension};
pub use package::{DistributionPackage, DistributionPackageError};
pub use source_dist::{SourceDistFilename, SourceDistFilenameError};
pub use wheel::{WheelFilename, WheelFilenameError};

mod extension;
mod package;
mod source_dist;
mod wheel;

/// A distribution filename, classified as either a wheel or a source distribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistFilename {
    SourceDistFilename(SourceDistFilename),
    WheelFilename(WheelFilename),
}

impl DistFilename {
    /// Classify a filename.
    ///
    /// The project name, when known, disambiguates source distribution filenames in which the
    /// version itself contains a `-` (consider `a-1-1.tar.gz`).
    pub fn parse(
        filename: &str,
        project: Option<&PackageName>,
    ) -> Result<Self, DistFilenameError> {
        match DistExtension::from_path(filename) {
            Ok(DistExtension::Wheel) => Ok(Self::WheelFilename(WheelFilename::from_str(filename)?)),
            Ok(DistExtension::Source(extension)) => {
                let filename = match project {
                    Some(project) => SourceDistFilename::parse(filename, extension, project)?,
                    None => SourceDistFilename::parsed_normalized_filename(filename)?,
                };
                Ok(Self::SourceDistFilename(filename))
            }
            Err(err) => Err(DistFilenameError::Extension(filename.to_string(), err)),
        }
    }

    pub fn name(&self) -> &PackageName {
        match self {
            Self::SourceDistFilename(filename) => &filename.name,
            Self::WheelFilename(filename) => &filename.name,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Self::SourceDistFilename(filename) => &filename.version,
            Self::WheelFilename(filename) => &filename.version,
        }
    }

    pub fn extension(&self) -> DistExtension {
        match self {
            Self::SourceDistFilename(filename) => DistExtension::Source(filename.extension),
            Self::WheelFilename(_) => DistExtension::Wheel,
        }
    }
}

impl Display for DistFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceDistFilename(filename) => filename.fmt(f),
            Self::WheelFilename(filename) => filename.fmt(f),
        }
    }
}

#[derive(Error, Debug)]
pub enum DistFilenameError {
    #[error("Expected a wheel or source distribution filename, found `{0}`")]
    Extension(String, #[source] ExtensionError),
    #[error(transparent)]
    Wheel(#[from] WheelFilenameError),
    #[error(transparent)]
    SourceDist(#[from] SourceDistFilenameError),
}
