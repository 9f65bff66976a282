use serde::{Deserialize, Serialize};

/// A file may be yanked with or without a reason, per PEP 592.
///
/// On HTML pages this is the `data-yanked` attribute: its presence marks the file as yanked,
/// and its (optional) value carries the reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Yanked {
    Bool(bool),
    Reason(String),
}

impl Yanked {
    pub fn is_yanked(&self) -> bool {
        match self {
            Yanked::Bool(is_yanked) => *is_yanked,
            Yanked::Reason(_) => true,
        }
    }
}
