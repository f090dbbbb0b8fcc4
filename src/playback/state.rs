use std::sync::Arc;

use crate::foundation::core::Glyph;
use crate::foundation::error::GlyphError;
use crate::glyph::model::StrokeGeometry;

/// Observable playback phase, as reported by
/// [`StrokePlayer::state`](crate::playback::player::StrokePlayer::state).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No glyph bound.
    Unbound,
    /// Geometry resolution in flight for the bound glyph.
    Loading,
    /// Idle, full glyph shown statically; playback can start.
    Ready,
    /// Stroke-by-stroke playback in progress.
    Animating,
    /// Playback halted mid-sequence, progress retained.
    Paused,
    /// Resolution failed; terminal until the next bind.
    Failed,
}

/// One glyph bound to its geometry and playback progress.
#[derive(Clone, Debug)]
pub(crate) struct Session {
    pub(crate) glyph: Glyph,
    pub(crate) geometry: Arc<StrokeGeometry>,
    /// Index of the next stroke to draw.
    pub(crate) next_stroke: usize,
}

/// Internal tagged state machine.
///
/// A session lives exactly in the variants that can draw, so phase and
/// progress can never disagree.
#[derive(Debug)]
pub(crate) enum PlayerState {
    Unbound,
    Loading { glyph: Glyph },
    Ready { session: Session },
    Animating { session: Session },
    Paused { session: Session },
    Failed { glyph: Glyph, error: GlyphError },
}

impl PlayerState {
    pub(crate) fn snapshot(&self) -> PlaybackState {
        match self {
            Self::Unbound => PlaybackState::Unbound,
            Self::Loading { .. } => PlaybackState::Loading,
            Self::Ready { .. } => PlaybackState::Ready,
            Self::Animating { .. } => PlaybackState::Animating,
            Self::Paused { .. } => PlaybackState::Paused,
            Self::Failed { .. } => PlaybackState::Failed,
        }
    }

    pub(crate) fn glyph(&self) -> Option<Glyph> {
        match self {
            Self::Unbound => None,
            Self::Loading { glyph } | Self::Failed { glyph, .. } => Some(*glyph),
            Self::Ready { session } | Self::Animating { session } | Self::Paused { session } => {
                Some(session.glyph)
            }
        }
    }

    pub(crate) fn session(&self) -> Option<&Session> {
        match self {
            Self::Ready { session } | Self::Animating { session } | Self::Paused { session } => {
                Some(session)
            }
            _ => None,
        }
    }
}
