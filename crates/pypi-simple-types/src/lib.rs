pub use base_url::BaseUrl;
pub use hashes::{HashError, Hashes};
pub use link::{AttributeValue, Attributes, Link};
pub use yanked::Yanked;

mod base_url;
mod hashes;
mod link;
mod yanked;
