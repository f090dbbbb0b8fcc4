use kurbo::{BezPath, Point};

use crate::foundation::error::GlyphError;

/// Wire form of a glyph's stroke description, as served by the remote
/// endpoint (`GET /{character}.json`).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlyphDocument {
    /// SVG path data, one entry per stroke, in canonical drawing order.
    pub strokes: Vec<String>,

    /// Median polyline per stroke as `[x, y]` pairs. May be absent.
    #[serde(default)]
    pub medians: Vec<Vec<[f64; 2]>>,

    /// Indices of strokes that belong to the radical. May be absent.
    #[serde(default, rename = "radStrokes")]
    pub rad_strokes: Vec<usize>,
}

/// One stroke of a glyph.
#[derive(Clone, Debug)]
pub struct Stroke {
    /// Filled outline of the stroke.
    pub outline: BezPath,

    /// Polyline running down the middle of the stroke, start to end.
    /// Empty when the document carries no medians.
    pub median: Vec<Point>,
}

/// Parsed, validated stroke description of one glyph.
///
/// Immutable once built. Playback sessions share it by `Arc` and never
/// mutate it; the drawing order of [`StrokeGeometry::strokes`] is the
/// canonical stroke order.
#[derive(Clone, Debug)]
pub struct StrokeGeometry {
    strokes: Vec<Stroke>,
    radical_strokes: Vec<usize>,
}

impl StrokeGeometry {
    /// Parse and validate a wire document.
    pub fn from_document(doc: GlyphDocument) -> Result<Self, GlyphError> {
        if doc.strokes.is_empty() {
            return Err(GlyphError::malformed("document has no strokes"));
        }
        if !doc.medians.is_empty() && doc.medians.len() != doc.strokes.len() {
            return Err(GlyphError::malformed(format!(
                "median count {} does not match stroke count {}",
                doc.medians.len(),
                doc.strokes.len()
            )));
        }

        let mut strokes = Vec::with_capacity(doc.strokes.len());
        for (i, path) in doc.strokes.iter().enumerate() {
            let outline = BezPath::from_svg(path)
                .map_err(|e| GlyphError::malformed(format!("stroke {i}: {e}")))?;
            let median = doc
                .medians
                .get(i)
                .map(|m| m.iter().map(|&[x, y]| Point::new(x, y)).collect())
                .unwrap_or_default();
            strokes.push(Stroke { outline, median });
        }

        for &idx in &doc.rad_strokes {
            if idx >= strokes.len() {
                return Err(GlyphError::malformed(format!(
                    "radical stroke index {idx} out of range for {} strokes",
                    strokes.len()
                )));
            }
        }

        Ok(Self {
            strokes,
            radical_strokes: doc.rad_strokes,
        })
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    /// Indices of strokes belonging to the radical, in document order.
    pub fn radical_strokes(&self) -> &[usize] {
        &self.radical_strokes
    }

    pub fn is_radical_stroke(&self, index: usize) -> bool {
        self.radical_strokes.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(strokes: &[&str]) -> GlyphDocument {
        GlyphDocument {
            strokes: strokes.iter().map(|s| s.to_string()).collect(),
            medians: Vec::new(),
            rad_strokes: Vec::new(),
        }
    }

    #[test]
    fn parses_a_minimal_document() {
        let json = r#"{
            "strokes": ["M 0 0 L 100 0 L 100 40 L 0 40 Z"],
            "medians": [[[0, 20], [100, 20]]],
            "radStrokes": [0]
        }"#;
        let wire: GlyphDocument = serde_json::from_str(json).unwrap();
        let geometry = StrokeGeometry::from_document(wire).unwrap();

        assert_eq!(geometry.stroke_count(), 1);
        assert_eq!(geometry.strokes()[0].median.len(), 2);
        assert_eq!(geometry.radical_strokes(), &[0]);
        assert!(geometry.is_radical_stroke(0));
    }

    #[test]
    fn medians_are_optional() {
        let geometry = StrokeGeometry::from_document(doc(&["M 0 0 L 10 10"])).unwrap();
        assert!(geometry.strokes()[0].median.is_empty());
    }

    #[test]
    fn rejects_a_document_with_no_strokes() {
        let err = StrokeGeometry::from_document(doc(&[])).unwrap_err();
        assert!(matches!(err, GlyphError::Malformed(_)));
    }

    #[test]
    fn rejects_unparseable_path_data() {
        let err = StrokeGeometry::from_document(doc(&["not a path"])).unwrap_err();
        assert!(err.to_string().contains("stroke 0"));
    }

    #[test]
    fn rejects_mismatched_median_count() {
        let mut wire = doc(&["M 0 0 L 10 10", "M 0 0 L 20 20"]);
        wire.medians = vec![vec![[0.0, 0.0]]];
        let err = StrokeGeometry::from_document(wire).unwrap_err();
        assert!(matches!(err, GlyphError::Malformed(_)));
    }

    #[test]
    fn rejects_out_of_range_radical_indices() {
        let mut wire = doc(&["M 0 0 L 10 10"]);
        wire.rad_strokes = vec![3];
        let err = StrokeGeometry::from_document(wire).unwrap_err();
        assert!(err.to_string().contains("radical stroke index 3"));
    }
}
