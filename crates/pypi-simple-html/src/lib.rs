pub use html::{parse_links, Error, Links};
pub use input::HtmlSource;
pub use options::ParseOptions;
pub use pages::{parse_project_page, parse_simple_index, IndexEntry, IndexLinks};

mod html;
mod input;
mod options;
mod pages;
