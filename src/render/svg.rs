use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::foundation::core::{EM_SIZE, SVG_DISPLAY_TRANSFORM};
use crate::glyph::model::StrokeGeometry;
use crate::render::surface::StrokeSurface;

/// Fill colors used by [`SvgSurface`].
#[derive(Clone, Debug)]
pub struct SvgTheme {
    /// Fill for the static outline guide.
    pub outline_fill: String,
    /// Fill for strokes drawn during playback.
    pub stroke_fill: String,
    /// Fill for drawn strokes that belong to the radical.
    pub radical_fill: String,
}

impl Default for SvgTheme {
    fn default() -> Self {
        Self {
            outline_fill: "#d8d8d8".to_string(),
            stroke_fill: "#1a1a1a".to_string(),
            radical_fill: "#a33b3b".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
struct DrawnStroke {
    path: String,
    radical: bool,
}

#[derive(Debug, Default)]
struct SvgState {
    theme: SvgTheme,
    outline: Vec<String>,
    drawn: Vec<DrawnStroke>,
}

/// SVG rendering surface.
///
/// Clones share one underlying document, so a caller can keep a handle for
/// [`SvgSurface::document`] snapshots while the player owns the drawing
/// end.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    state: Arc<Mutex<SvgState>>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::with_theme(SvgTheme::default())
    }

    pub fn with_theme(theme: SvgTheme) -> Self {
        Self {
            state: Arc::new(Mutex::new(SvgState {
                theme,
                outline: Vec::new(),
                drawn: Vec::new(),
            })),
        }
    }

    /// Render the current surface contents as a standalone SVG document.
    pub fn document(&self) -> String {
        let state = lock(&self.state);
        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {EM_SIZE} {EM_SIZE}\">\n"
        ));
        out.push_str(&format!("<g transform=\"{SVG_DISPLAY_TRANSFORM}\">\n"));
        for path in &state.outline {
            out.push_str(&format!(
                "<path d=\"{}\" fill=\"{}\"/>\n",
                path, state.theme.outline_fill
            ));
        }
        for stroke in &state.drawn {
            let fill = if stroke.radical {
                &state.theme.radical_fill
            } else {
                &state.theme.stroke_fill
            };
            out.push_str(&format!("<path d=\"{}\" fill=\"{fill}\"/>\n", stroke.path));
        }
        out.push_str("</g>\n</svg>\n");
        out
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeSurface for SvgSurface {
    fn clear(&mut self) {
        let mut state = lock(&self.state);
        state.outline.clear();
        state.drawn.clear();
    }

    fn draw_outline(&mut self, geometry: &StrokeGeometry) {
        let mut state = lock(&self.state);
        state.outline = geometry
            .strokes()
            .iter()
            .map(|s| s.outline.to_svg())
            .collect();
    }

    fn draw_stroke(&mut self, geometry: &StrokeGeometry, index: usize) {
        let Some(stroke) = geometry.stroke(index) else {
            return;
        };
        let mut state = lock(&self.state);
        state.drawn.push(DrawnStroke {
            path: stroke.outline.to_svg(),
            radical: geometry.is_radical_stroke(index),
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
