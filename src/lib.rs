//! Kakijun is a stroke-order playback engine for Han and kana characters.
//!
//! Two collaborating halves:
//!
//! - [`GlyphStore`] resolves a character to its vector stroke description,
//!   fetching each glyph's document at most once per store lifetime and
//!   caching the outcome, success or failure.
//! - [`StrokePlayer`] binds one glyph at a time to a rendering surface and
//!   drives play / pause / reset transitions over its strokes with a fixed
//!   inter-stroke delay, reporting readiness, progress and completion as
//!   [`PlaybackEvent`]s.
//!
//! Rendering goes through the [`StrokeSurface`] seam; [`SvgSurface`] is the
//! built-in implementation producing SVG documents of the current state.
#![forbid(unsafe_code)]

pub mod foundation;
pub mod glyph;
pub mod playback;
pub mod render;

pub use crate::foundation::core::{DESCENDER, EM_SIZE, Glyph, SVG_DISPLAY_TRANSFORM};
pub use crate::foundation::error::{GlyphError, KakijunError, KakijunResult};
pub use crate::glyph::model::{GlyphDocument, Stroke, StrokeGeometry};
pub use crate::glyph::store::{
    GlyphFetcher, GlyphStore, HttpFetcherOpts, HttpGlyphFetcher, Resolution,
};
pub use crate::playback::player::{PlaybackEvent, PlayerOpts, StrokePlayer};
pub use crate::playback::state::PlaybackState;
pub use crate::render::surface::StrokeSurface;
pub use crate::render::svg::{SvgSurface, SvgTheme};
