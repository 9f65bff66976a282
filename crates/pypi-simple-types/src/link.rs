use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Anchor attributes whose values are whitespace-separated token lists.
const TOKEN_LIST_ATTRIBUTES: &[&str] = &["class", "rel", "rev"];

/// A single attribute value on an anchor tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A plain string value, e.g. `data-requires-python=">=3.8"`.
    Single(String),
    /// An ordered token list, e.g. `class="internal stable"`.
    List(Vec<String>),
}

impl AttributeValue {
    /// Return the plain string value, if this is not a token list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// Return the token list, if this is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::List(values) => Some(values),
        }
    }

    fn for_attribute(name: &str, value: String) -> Self {
        if TOKEN_LIST_ATTRIBUTES.contains(&name) {
            Self::List(value.split_ascii_whitespace().map(String::from).collect())
        } else {
            Self::Single(value)
        }
    }
}

/// The attributes of an anchor tag, keyed by lowercase attribute name. Entries keep their
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, AttributeValue>);

impl Attributes {
    /// Insert a raw attribute. The name is lowercased and the value is split into tokens for
    /// multi-valued attributes (`class` and friends). Duplicate attributes keep the first
    /// occurrence, as in the HTML parsing spec.
    pub fn insert(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        if let Entry::Vacant(entry) = self.0.entry(name) {
            let value = AttributeValue::for_attribute(entry.key(), value);
            entry.insert(value);
        }
    }

    /// Look up an attribute by its lowercase name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Look up a plain string attribute by its lowercase name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    /// Iterate over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A hyperlink extracted from a page: the anchor text, the resolved URL, and the anchor's
/// attributes.
///
/// The unresolved `href` stays available in [`Link::attributes`] under the `href` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The anchor text, with leading and trailing whitespace removed.
    pub text: String,
    /// The `href`, resolved against the page's base URL when one is known.
    pub url: String,
    /// All attributes of the anchor tag, keyed by lowercase name.
    pub attributes: Attributes,
}

impl Link {
    /// The anchor's raw, unresolved `href` value.
    pub fn href(&self) -> Option<&str> {
        self.attributes.get_str("href")
    }
}
