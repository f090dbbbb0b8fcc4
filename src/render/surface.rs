use crate::glyph::model::StrokeGeometry;

/// Rendering surface a playback session draws onto.
///
/// Calls are synchronous side effects. The player owns its surface and
/// issues draw calls under its state lock, so an implementation never sees
/// two sessions interleaved.
pub trait StrokeSurface: Send {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Draw the complete glyph as a static outline guide.
    fn draw_outline(&mut self, geometry: &StrokeGeometry);

    /// Draw one stroke, filled, over whatever is already shown. An index
    /// past the end of the geometry is ignored.
    fn draw_stroke(&mut self, geometry: &StrokeGeometry, index: usize);
}
