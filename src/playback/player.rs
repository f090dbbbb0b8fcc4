use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::foundation::core::Glyph;
use crate::foundation::error::GlyphError;
use crate::glyph::store::GlyphStore;
use crate::playback::state::{PlaybackState, PlayerState, Session};
use crate::render::surface::StrokeSurface;

/// Options for [`StrokePlayer`].
#[derive(Clone, Debug)]
pub struct PlayerOpts {
    /// Fixed delay between consecutive stroke draws. Constant for the
    /// player's lifetime, never per-stroke.
    pub stroke_delay: Duration,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            stroke_delay: Duration::from_millis(1000),
        }
    }
}

/// Events the player emits for the surrounding interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Geometry arrived; the glyph is shown idle and can be animated.
    Ready { glyph: Glyph },
    /// One stroke was drawn during playback.
    StrokeDrawn { glyph: Glyph, index: usize },
    /// The final stroke of an animation run was drawn.
    AnimationComplete { glyph: Glyph },
    /// Resolution failed; the binding is terminally failed.
    Error { glyph: Glyph, error: GlyphError },
}

struct PlayerInner {
    state: PlayerState,
    surface: Box<dyn StrokeSurface>,
    /// Bumped on every user transition. Spawned tasks re-check it under the
    /// lock before touching the surface, so a late wakeup against a
    /// replaced session draws nothing.
    epoch: u64,
    subscribers: Vec<mpsc::UnboundedSender<PlaybackEvent>>,
}

impl PlayerInner {
    fn emit(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Stroke-order playback controller.
///
/// A player owns one rendering surface and is bound to at most one glyph at
/// a time. `bind`, `animate`, `pause`, `reset` and `unbind` complete their
/// state change before returning; geometry resolution and stroke sequencing
/// continue on background tasks, which makes every method non-blocking.
/// Calls from states that do not support an operation decline silently.
///
/// Methods that start background work (`bind`, `animate`) must be called
/// within a tokio runtime.
pub struct StrokePlayer {
    inner: Arc<Mutex<PlayerInner>>,
    store: Arc<GlyphStore>,
    opts: PlayerOpts,
}

impl StrokePlayer {
    pub fn new(store: Arc<GlyphStore>, surface: Box<dyn StrokeSurface>, opts: PlayerOpts) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PlayerInner {
                state: PlayerState::Unbound,
                surface,
                epoch: 0,
                subscribers: Vec::new(),
            })),
            store,
            opts,
        }
    }

    /// Subscribe to playback events. Every subscriber receives every event
    /// emitted after the call; dropped receivers are pruned on emit.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<PlaybackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.inner).subscribers.push(tx);
        rx
    }

    pub fn state(&self) -> PlaybackState {
        lock(&self.inner).state.snapshot()
    }

    /// The currently bound glyph, if any.
    pub fn glyph(&self) -> Option<Glyph> {
        lock(&self.inner).state.glyph()
    }

    /// Stroke count of the bound geometry, once resolved.
    pub fn stroke_count(&self) -> Option<usize> {
        lock(&self.inner)
            .state
            .session()
            .map(|s| s.geometry.stroke_count())
    }

    /// Terminal failure of the current binding, if any.
    pub fn failure(&self) -> Option<GlyphError> {
        match &lock(&self.inner).state {
            PlayerState::Failed { error, .. } => Some(error.clone()),
            _ => None,
        }
    }

    /// Bind a glyph, discarding any prior session and its progress.
    ///
    /// The player tears down in-flight work, clears the surface and enters
    /// `Loading` before returning. Resolution finishes on a background
    /// task, leaving the player `Ready` (idle glyph drawn, [`PlaybackEvent::Ready`])
    /// or `Failed` ([`PlaybackEvent::Error`]). Binding never re-fetches a
    /// glyph the store has already resolved.
    pub fn bind(&self, glyph: Glyph) {
        let epoch = {
            let mut inner = lock(&self.inner);
            inner.epoch += 1;
            inner.surface.clear();
            inner.state = PlayerState::Loading { glyph };
            inner.epoch
        };
        tracing::debug!(%glyph, "binding glyph");

        let store = Arc::clone(&self.store);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = store.resolve(glyph).await;
            let mut guard = lock(&inner);
            if guard.epoch != epoch {
                // Rebound while loading; this outcome belongs to a dead session.
                return;
            }
            match outcome {
                Ok(geometry) => {
                    let inner = &mut *guard;
                    inner.surface.clear();
                    inner.surface.draw_outline(&geometry);
                    inner.state = PlayerState::Ready {
                        session: Session {
                            glyph,
                            geometry,
                            next_stroke: 0,
                        },
                    };
                    inner.emit(PlaybackEvent::Ready { glyph });
                }
                Err(error) => {
                    guard.state = PlayerState::Failed {
                        glyph,
                        error: error.clone(),
                    };
                    guard.emit(PlaybackEvent::Error { glyph, error });
                }
            }
        });
    }

    /// Start or resume stroke-by-stroke playback.
    ///
    /// From `Ready` the surface is cleared back to the outline guide and
    /// strokes replay from the beginning; from `Paused` drawing resumes at
    /// the retained stroke index. Strokes are drawn in canonical order with
    /// the configured delay between them; on completion the player returns
    /// to `Ready` with the glyph fully drawn and emits
    /// [`PlaybackEvent::AnimationComplete`]. Any other state is a silent
    /// no-op, including `Animating` itself: a second call cannot start a
    /// second run.
    pub fn animate(&self) {
        let epoch = {
            let mut guard = lock(&self.inner);
            let inner = &mut *guard;
            match std::mem::replace(&mut inner.state, PlayerState::Unbound) {
                PlayerState::Ready { mut session } => {
                    session.next_stroke = 0;
                    inner.surface.clear();
                    inner.surface.draw_outline(&session.geometry);
                    tracing::debug!(glyph = %session.glyph, "animation started");
                    inner.state = PlayerState::Animating { session };
                }
                PlayerState::Paused { session } => {
                    tracing::debug!(glyph = %session.glyph, stroke = session.next_stroke, "animation resumed");
                    inner.state = PlayerState::Animating { session };
                }
                other => {
                    inner.state = other;
                    return;
                }
            }
            inner.epoch += 1;
            inner.epoch
        };

        let delay = self.opts.stroke_delay;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(run_animation(inner, epoch, delay));
    }

    /// Halt an in-flight animation, retaining the next stroke index.
    ///
    /// Cancels the pending stroke timer. A no-op unless `Animating`; in
    /// particular a pause requested while still `Loading` does not persist.
    pub fn pause(&self) {
        let mut inner = lock(&self.inner);
        match std::mem::replace(&mut inner.state, PlayerState::Unbound) {
            PlayerState::Animating { session } => {
                inner.epoch += 1;
                tracing::debug!(glyph = %session.glyph, stroke = session.next_stroke, "playback paused");
                inner.state = PlayerState::Paused { session };
            }
            other => inner.state = other,
        }
    }

    /// Return a bound session to the idle `Ready` rendering.
    ///
    /// Cancels any in-flight animation, clears the surface and immediately
    /// redraws the full static glyph (no animation, no re-fetch). A no-op
    /// from `Unbound`, `Loading` and `Failed`.
    pub fn reset(&self) {
        let mut guard = lock(&self.inner);
        let inner = &mut *guard;
        match std::mem::replace(&mut inner.state, PlayerState::Unbound) {
            PlayerState::Ready { mut session }
            | PlayerState::Animating { mut session }
            | PlayerState::Paused { mut session } => {
                inner.epoch += 1;
                session.next_stroke = 0;
                inner.surface.clear();
                inner.surface.draw_outline(&session.geometry);
                inner.state = PlayerState::Ready { session };
            }
            other => inner.state = other,
        }
    }

    /// Discard the current binding entirely and release the surface.
    pub fn unbind(&self) {
        let mut inner = lock(&self.inner);
        inner.epoch += 1;
        inner.surface.clear();
        inner.state = PlayerState::Unbound;
    }
}

/// Draw strokes until the run completes, pauses, or is replaced.
///
/// Each tick re-validates the epoch under the lock. A pause, reset, rebind
/// or unbind bumps the epoch, and this task then exits without drawing, so
/// a cancelled timer can never fire against a stale session.
async fn run_animation(inner: Arc<Mutex<PlayerInner>>, epoch: u64, delay: Duration) {
    loop {
        {
            let mut guard = lock(&inner);
            if guard.epoch != epoch {
                return;
            }
            let glyph;
            let done;
            {
                let inner = &mut *guard;
                let PlayerState::Animating { session } = &mut inner.state else {
                    return;
                };
                let index = session.next_stroke;
                let geometry = Arc::clone(&session.geometry);
                glyph = session.glyph;
                inner.surface.draw_stroke(&geometry, index);
                session.next_stroke = index + 1;
                done = session.next_stroke >= geometry.stroke_count();
                inner.emit(PlaybackEvent::StrokeDrawn { glyph, index });
            }
            if done {
                if let PlayerState::Animating { mut session } =
                    std::mem::replace(&mut guard.state, PlayerState::Unbound)
                {
                    session.next_stroke = 0;
                    guard.state = PlayerState::Ready { session };
                }
                tracing::debug!(%glyph, "animation complete");
                guard.emit(PlaybackEvent::AnimationComplete { glyph });
                return;
            }
        }
        tokio::time::sleep(delay).await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::store::{GlyphFetcher, GlyphStore};
    use crate::glyph::model::StrokeGeometry;

    struct NeverFetcher;

    #[async_trait::async_trait]
    impl GlyphFetcher for NeverFetcher {
        async fn fetch(&self, _glyph: Glyph) -> Result<StrokeGeometry, GlyphError> {
            Err(GlyphError::NotFound)
        }
    }

    struct NullSurface;

    impl StrokeSurface for NullSurface {
        fn clear(&mut self) {}
        fn draw_outline(&mut self, _geometry: &StrokeGeometry) {}
        fn draw_stroke(&mut self, _geometry: &StrokeGeometry, _index: usize) {}
    }

    fn player() -> StrokePlayer {
        StrokePlayer::new(
            Arc::new(GlyphStore::new(Arc::new(NeverFetcher))),
            Box::new(NullSurface),
            PlayerOpts::default(),
        )
    }

    #[test]
    fn a_fresh_player_is_unbound() {
        let player = player();
        assert_eq!(player.state(), PlaybackState::Unbound);
        assert_eq!(player.glyph(), None);
        assert_eq!(player.stroke_count(), None);
        assert_eq!(player.failure(), None);
    }

    #[test]
    fn transitions_on_an_unbound_player_are_no_ops() {
        let player = player();
        player.pause();
        player.reset();
        player.unbind();
        assert_eq!(player.state(), PlaybackState::Unbound);
    }

    // animate() declines before spawning, so no runtime is needed here.
    #[test]
    fn animate_declines_without_a_session() {
        let player = player();
        player.animate();
        assert_eq!(player.state(), PlaybackState::Unbound);
    }
}
