pub type KakijunResult<T> = Result<T, KakijunError>;

#[derive(thiserror::Error, Debug)]
pub enum KakijunError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KakijunError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Failure resolving a glyph's stroke data.
///
/// Cloneable: resolved failures are cached, and every later resolution of
/// the same glyph observes the same terminal error.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// The endpoint has no stroke data for this character.
    #[error("stroke data not available for this character")]
    NotFound,

    /// Request-level failure: connect error, timeout, unexpected status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered but the body is not a usable stroke document.
    #[error("malformed stroke data: {0}")]
    Malformed(String),
}

impl GlyphError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            KakijunError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            GlyphError::transport("x")
                .to_string()
                .contains("transport error:")
        );
        assert!(
            GlyphError::malformed("x")
                .to_string()
                .contains("malformed stroke data:")
        );
    }

    #[test]
    fn not_found_reads_like_the_user_facing_message() {
        assert_eq!(
            GlyphError::NotFound.to_string(),
            "stroke data not available for this character"
        );
    }

    #[test]
    fn glyph_errors_convert_transparently() {
        let err = KakijunError::from(GlyphError::NotFound);
        assert_eq!(
            err.to_string(),
            "stroke data not available for this character"
        );
    }
}
