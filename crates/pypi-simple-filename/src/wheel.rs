use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

use pypi_simple_normalize::{InvalidNameError, PackageName};

/// A wheel filename, split into its PEP 427 components.
///
/// The version and tags are carried as the verbatim filename segments; interpreting them is a
/// resolver concern, not a filename concern.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct WheelFilename {
    pub name: PackageName,
    pub version: String,
    pub build_tag: Option<String>,
    pub python_tag: Vec<String>,
    pub abi_tag: Vec<String>,
    pub platform_tag: Vec<String>,
}

impl FromStr for WheelFilename {
    type Err = WheelFilenameError;

    fn from_str(filename: &str) -> Result<Self, Self::Err> {
        let stem = filename.strip_suffix(".whl").ok_or_else(|| {
            WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must end with .whl".to_string(),
            )
        })?;

        // The stem contains either five or six `-`-separated components. If six, the third is
        // the build tag. https://www.python.org/dev/peps/pep-0427/#file-name-convention
        let (name, version, build_tag, python_tag, abi_tag, platform_tag) =
            match *stem.split('-').collect::<Vec<_>>().as_slice() {
                [name, version, python_tag, abi_tag, platform_tag] => {
                    (name, version, None, python_tag, abi_tag, platform_tag)
                }
                [name, version, build_tag, python_tag, abi_tag, platform_tag] => {
                    (name, version, Some(build_tag), python_tag, abi_tag, platform_tag)
                }
                _ => {
                    return Err(WheelFilenameError::InvalidWheelFileName(
                        filename.to_string(),
                        "Must have 5 or 6 components".to_string(),
                    ))
                }
            };

        if version.is_empty() {
            return Err(WheelFilenameError::InvalidWheelFileName(
                filename.to_string(),
                "Must have a version".to_string(),
            ));
        }

        // Build tags sort numerically, so they must lead with a digit.
        if let Some(build_tag) = build_tag {
            if !build_tag.starts_with(|char: char| char.is_ascii_digit()) {
                return Err(WheelFilenameError::InvalidBuildTag(
                    filename.to_string(),
                    build_tag.to_string(),
                ));
            }
        }

        let name = PackageName::from_str(name)
            .map_err(|err| WheelFilenameError::InvalidPackageName(filename.to_string(), err))?;

        Ok(Self {
            name,
            version: version.to_string(),
            build_tag: build_tag.map(String::from),
            python_tag: python_tag.split('.').map(String::from).collect(),
            abi_tag: abi_tag.split('.').map(String::from).collect(),
            platform_tag: platform_tag.split('.').map(String::from).collect(),
        })
    }
}

impl Display for WheelFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}.whl",
            self.name.as_dist_info_name(),
            self.version,
            self.tags()
        )
    }
}

impl WheelFilename {
    /// The tag section of the filename: `[build-]python-abi-platform`.
    fn tags(&self) -> String {
        let mut tags = String::new();
        if let Some(build_tag) = &self.build_tag {
            tags.push_str(build_tag);
            tags.push('-');
        }
        tags.push_str(&self.python_tag.join("."));
        tags.push('-');
        tags.push_str(&self.abi_tag.join("."));
        tags.push('-');
        tags.push_str(&self.platform_tag.join("."));
        tags
    }
}

#[derive(Error, Debug, Clone)]
pub enum WheelFilenameError {
    #[error("The wheel filename \"{0}\" is invalid: {1}")]
    InvalidWheelFileName(String, String),
    #[error("The wheel filename \"{0}\" has an invalid package name: {1}")]
    InvalidPackageName(String, #[source] InvalidNameError),
    #[error("The wheel filename \"{0}\" has an invalid build tag: {1}")]
    InvalidBuildTag(String, String),
}
