use std::borrow::Cow;

use encoding_rs::Encoding;
use tracing::debug;

/// Page content handed to the parser: either decoded text, or the raw response body along with
/// an optional encoding hint in [`crate::ParseOptions`].
#[derive(Debug, Clone, Copy)]
pub enum HtmlSource<'h> {
    Text(&'h str),
    Bytes(&'h [u8]),
}

impl<'h> From<&'h str> for HtmlSource<'h> {
    fn from(text: &'h str) -> Self {
        Self::Text(text)
    }
}

impl<'h> From<&'h String> for HtmlSource<'h> {
    fn from(text: &'h String) -> Self {
        Self::Text(text)
    }
}

impl<'h> From<&'h [u8]> for HtmlSource<'h> {
    fn from(bytes: &'h [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'h> From<&'h Vec<u8>> for HtmlSource<'h> {
    fn from(bytes: &'h Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Decode raw page bytes. A byte-order mark wins over the caller's hint; an unrecognized or
/// missing hint falls back to UTF-8. Malformed sequences are replaced, not reported: garbled
/// markup is the HTML parser's problem, not ours.
pub(crate) fn decode<'b>(bytes: &'b [u8], label: Option<&str>) -> Cow<'b, str> {
    let encoding = label
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Lossily decoded page content as {}", encoding.name());
    }
    text
}
