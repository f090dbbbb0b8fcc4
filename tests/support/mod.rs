#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kakijun::{Glyph, GlyphDocument, GlyphError, GlyphFetcher, StrokeGeometry, StrokeSurface};

/// Three-stroke document, loosely shaped like the real glyph data.
pub fn three_stroke_document() -> GlyphDocument {
    GlyphDocument {
        strokes: vec![
            "M 100 800 L 900 800 L 900 700 L 100 700 Z".to_string(),
            "M 100 500 L 900 500 L 900 400 L 100 400 Z".to_string(),
            "M 100 200 L 900 200 L 900 100 L 100 100 Z".to_string(),
        ],
        medians: vec![
            vec![[100.0, 750.0], [900.0, 750.0]],
            vec![[100.0, 450.0], [900.0, 450.0]],
            vec![[100.0, 150.0], [900.0, 150.0]],
        ],
        rad_strokes: vec![0],
    }
}

enum MockOutcome {
    Document(GlyphDocument),
    Fail(GlyphError),
}

/// Fetcher serving one canned outcome for every glyph, counting calls.
pub struct MockFetcher {
    outcome: MockOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn ok(document: GlyphDocument) -> Self {
        Self {
            outcome: MockOutcome::Document(document),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail(error: GlyphError) -> Self {
        Self {
            outcome: MockOutcome::Fail(error),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every fetch sleep first, so tests can observe the pending state.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GlyphFetcher for MockFetcher {
    async fn fetch(&self, _glyph: Glyph) -> Result<StrokeGeometry, GlyphError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            MockOutcome::Document(doc) => StrokeGeometry::from_document(doc.clone()),
            MockOutcome::Fail(error) => Err(error.clone()),
        }
    }
}

/// A draw call observed by [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Clear,
    Outline { strokes: usize },
    Stroke { index: usize },
}

/// Surface that records draw calls; clones share the log.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Indices of strokes drawn so far, in draw order.
    pub fn stroke_indices(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DrawCall::Stroke { index } => Some(index),
                _ => None,
            })
            .collect()
    }

    pub fn strokes_drawn(&self) -> usize {
        self.stroke_indices().len()
    }

    /// Forget everything recorded so far.
    pub fn reset_log(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl StrokeSurface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.lock().unwrap().push(DrawCall::Clear);
    }

    fn draw_outline(&mut self, geometry: &StrokeGeometry) {
        self.calls.lock().unwrap().push(DrawCall::Outline {
            strokes: geometry.stroke_count(),
        });
    }

    fn draw_stroke(&mut self, _geometry: &StrokeGeometry, index: usize) {
        self.calls.lock().unwrap().push(DrawCall::Stroke { index });
    }
}

/// Let spawned tasks run without letting paused time advance.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
