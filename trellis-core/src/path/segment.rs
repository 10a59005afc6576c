//! Path segments.
//!
//! A segment is one step of a path. Segments are compared by their decoded
//! string form; integer inputs are coerced to their decimal form at
//! construction, so `Segment::from(1)` and `Segment::from("1")` address the
//! same location.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a segment is serialized into the string form of
/// a path. `/` would be read back as a delimiter and `%` as the start of an
/// escape sequence, so both must never appear raw.
const SEGMENT_ESCAPES: &AsciiSet = &CONTROLS.add(b'/').add(b'%');

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment(String);

impl Segment {
    /// Create a segment from its decoded string form.
    pub fn new(segment: impl Into<String>) -> Self {
        Self(segment.into())
    }

    /// The decoded string form of this segment.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty segment, which marks an absolute path when it
    /// appears in the first position.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode a raw segment taken from the string form of a path.
    ///
    /// Invalid escape sequences degrade to their literal bytes rather than
    /// failing; path parsing never errors on odd input.
    pub(crate) fn decode(raw: &str) -> Self {
        Self(percent_decode_str(raw).decode_utf8_lossy().into_owned())
    }

    /// Encode this segment for the string form of a path.
    pub(crate) fn encoded(&self) -> Cow<'_, str> {
        utf8_percent_encode(&self.0, SEGMENT_ESCAPES).into()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Segment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Segment {
    fn from(segment: &str) -> Self {
        Self::new(segment)
    }
}

impl From<String> for Segment {
    fn from(segment: String) -> Self {
        Self::new(segment)
    }
}

impl From<u64> for Segment {
    fn from(index: u64) -> Self {
        Self(index.to_string())
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Self(index.to_string())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_segments_coerce_to_strings() {
        assert_eq!(Segment::from(1u64), Segment::from("1"));
        assert_eq!(Segment::from(42usize).as_str(), "42");
    }

    #[test]
    fn encoding_escapes_delimiter_and_escape_char() {
        let segment = Segment::new("a/b%c");
        assert_eq!(segment.encoded(), "a%2Fb%25c");
    }

    #[test]
    fn decoding_reverses_encoding() {
        let original = Segment::new("a/b%c");
        let decoded = Segment::decode(&original.encoded());
        assert_eq!(decoded, original);
    }

    #[test]
    fn plain_segments_pass_through() {
        let segment = Segment::new("plain");
        assert_eq!(segment.encoded(), "plain");
        assert_eq!(Segment::decode("plain"), segment);
    }

    #[test]
    fn invalid_escapes_degrade_to_literals() {
        // A stray `%` that is not a valid escape sequence stays literal.
        assert_eq!(Segment::decode("100%").as_str(), "100%");
    }
}
