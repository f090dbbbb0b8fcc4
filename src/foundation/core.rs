use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{KakijunError, KakijunResult};

/// Side length of the em square glyph documents are expressed in.
pub const EM_SIZE: f64 = 1024.0;

/// Portion of the em square below the baseline, in em units.
pub const DESCENDER: f64 = 124.0;

/// SVG group transform mapping glyph document coordinates (y-up, baseline
/// at `EM_SIZE - DESCENDER`) onto y-down SVG viewport coordinates.
pub const SVG_DISPLAY_TRANSFORM: &str = "translate(0, 900) scale(1, -1)";

/// A single Han or kana character whose stroke order is being visualized.
///
/// `Glyph` is the cache key for stroke data. It wraps one `char`, so an
/// identifier can never be empty or span multiple characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Glyph(char);

impl Glyph {
    pub fn new(c: char) -> Self {
        Self(c)
    }

    /// Parse an identifier that must contain exactly one character.
    pub fn parse(s: &str) -> KakijunResult<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self(c)),
            (None, _) => Err(KakijunError::validation(
                "glyph identifier must be non-empty",
            )),
            (Some(_), Some(_)) => Err(KakijunError::validation(
                "glyph identifier must be a single character",
            )),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Glyph {
    type Err = KakijunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<char> for Glyph {
    fn from(c: char) -> Self {
        Self(c)
    }
}
