//! Text and graphics state tracking for content stream interpretation.
//!
//! A deliberately small model of the PDF text machinery: enough state
//! to place simple-font glyphs on the page and to keep positions
//! consistent while a content stream is rewritten. Clipping, color and
//! rendering-mode state are ignored.

use lopdf::Object;
use lopdf::content::Operation;
use pdfredact_core::Region;

use crate::page_geometry::PageGeometry;

/// Default vertical extents for fonts without descriptor metrics, in
/// thousandths of text space.
pub const DEFAULT_ASCENT: f64 = 750.0;
pub const DEFAULT_DESCENT: f64 = -250.0;

/// A 2D affine transform in PDF row-vector convention:
/// `[a b c d e f]` maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self * other` in row-vector convention: applies `self` first.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// The outcome of showing one glyph: where it landed and how far the
/// pen moved in unscaled text space.
#[derive(Debug, Clone, Copy)]
pub struct GlyphPlacement {
    /// Display-space bounding box (baseline to ascent/descent extents).
    pub bbox: Region,
    /// Horizontal displacement in text space, after Tz scaling.
    pub advance: f64,
}

/// Interpreter state shared by extraction and content rewriting.
///
/// Both walkers feed every non-show operation through
/// [`TextCursor::apply_state_op`] so their view of the page stays in
/// lockstep with what a conforming reader would compute.
#[derive(Debug, Clone)]
pub struct TextCursor {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_name: Option<String>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scale: f64,
    leading: f64,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_name: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
        }
    }
}

impl TextCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name of the current font, as set by `Tf`.
    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn h_scale(&self) -> f64 {
        self.h_scale
    }

    /// Handle a state-changing operation. Returns `false` for show
    /// operations (`Tj`, `TJ`, `'`, `"`), which the caller interprets
    /// itself.
    pub fn apply_state_op(&mut self, op: &Operation) -> bool {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => {
                self.ctm_stack.push(self.ctm);
            }
            "Q" => {
                if let Some(saved) = self.ctm_stack.pop() {
                    self.ctm = saved;
                }
            }
            "cm" => {
                if let [a, b, c, d, e, f] = numbers(operands)[..] {
                    self.ctm = Matrix::new(a, b, c, d, e, f).multiply(&self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let (Some(Object::Name(name)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(number))
                {
                    self.font_name = Some(String::from_utf8_lossy(name).into_owned());
                    self.font_size = size;
                }
            }
            "Td" => {
                if let [tx, ty] = numbers(operands)[..] {
                    self.translate_line(tx, ty);
                }
            }
            "TD" => {
                if let [tx, ty] = numbers(operands)[..] {
                    self.leading = -ty;
                    self.translate_line(tx, ty);
                }
            }
            "Tm" => {
                if let [a, b, c, d, e, f] = numbers(operands)[..] {
                    self.line_matrix = Matrix::new(a, b, c, d, e, f);
                    self.text_matrix = self.line_matrix;
                }
            }
            "T*" => self.next_line(),
            "TL" => {
                if let Some(l) = operands.first().and_then(number) {
                    self.leading = l;
                }
            }
            "Tc" => {
                if let Some(c) = operands.first().and_then(number) {
                    self.char_spacing = c;
                }
            }
            "Tw" => {
                if let Some(w) = operands.first().and_then(number) {
                    self.word_spacing = w;
                }
            }
            "Tz" => {
                if let Some(s) = operands.first().and_then(number) {
                    self.h_scale = s / 100.0;
                }
            }
            "Tj" | "TJ" | "'" | "\"" => return false,
            _ => {}
        }
        true
    }

    /// Move to the next line, as `T*` and the `'`/`"` operators do.
    pub fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    pub fn set_char_spacing(&mut self, c: f64) {
        self.char_spacing = c;
    }

    pub fn set_word_spacing(&mut self, w: f64) {
        self.word_spacing = w;
    }

    fn translate_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// Apply a `TJ` positioning adjustment, in thousandths of text space.
    pub fn adjust(&mut self, amount: f64) {
        let tx = -amount / 1000.0 * self.font_size * self.h_scale;
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }

    /// Show a single glyph with the given width (thousandths of text
    /// space) and advance the pen past it.
    pub fn show_glyph(
        &mut self,
        width: f64,
        is_space: bool,
        geometry: &PageGeometry,
    ) -> GlyphPlacement {
        let advance = (width / 1000.0 * self.font_size
            + self.char_spacing
            + if is_space { self.word_spacing } else { 0.0 })
            * self.h_scale;

        let trm = self.text_matrix.multiply(&self.ctm);
        let ascent = DEFAULT_ASCENT / 1000.0 * self.font_size;
        let descent = DEFAULT_DESCENT / 1000.0 * self.font_size;
        let (x0, y0) = trm.transform(0.0, descent);
        let (x1, y1) = trm.transform(advance, ascent);
        let bbox = geometry.display_region(x0, y0, x1, y1);

        self.text_matrix = Matrix::translation(advance, 0.0).multiply(&self.text_matrix);
        GlyphPlacement { bbox, advance }
    }
}

/// Extract a numeric operand, tolerating both integer and real forms.
pub fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> PageGeometry {
        PageGeometry::new([0.0, 0.0, 612.0, 792.0])
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    #[test]
    fn matrix_translation_composes() {
        let m = Matrix::translation(10.0, 5.0).multiply(&Matrix::translation(2.0, 3.0));
        assert_eq!(m.transform(0.0, 0.0), (12.0, 8.0));
    }

    #[test]
    fn glyph_placement_on_baseline() {
        let mut cursor = TextCursor::new();
        cursor.apply_state_op(&op("BT", vec![]));
        cursor.apply_state_op(&op(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
        ));
        cursor.apply_state_op(&op("Td", vec![Object::Integer(72), Object::Integer(720)]));

        let placed = cursor.show_glyph(600.0, false, &geo());
        assert!((placed.advance - 7.2).abs() < 1e-9);
        assert!((placed.bbox.x0 - 72.0).abs() < 1e-9);
        assert!((placed.bbox.x1 - 79.2).abs() < 1e-9);
        // Baseline at display y = 72; ascent 9pt above, descent 3pt below.
        assert!((placed.bbox.top - 63.0).abs() < 1e-9);
        assert!((placed.bbox.bottom - 75.0).abs() < 1e-9);

        // The pen moved to the right edge of the first glyph.
        let next = cursor.show_glyph(600.0, false, &geo());
        assert!((next.bbox.x0 - 79.2).abs() < 1e-9);
    }

    #[test]
    fn word_spacing_applies_to_spaces_only() {
        let mut cursor = TextCursor::new();
        cursor.apply_state_op(&op(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(10)],
        ));
        cursor.apply_state_op(&op("Tw", vec![Object::Real(2.0)]));
        let plain = cursor.show_glyph(500.0, false, &geo());
        let space = cursor.show_glyph(500.0, true, &geo());
        assert!((space.advance - plain.advance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn tj_adjustment_moves_pen() {
        let mut cursor = TextCursor::new();
        cursor.apply_state_op(&op(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(10)],
        ));
        let before = cursor.show_glyph(0.0, false, &geo()).bbox.x0;
        // Negative adjustment moves the pen to the right.
        cursor.adjust(-1000.0);
        let after = cursor.show_glyph(0.0, false, &geo()).bbox.x0;
        assert!((after - before - 10.0).abs() < 1e-9);
    }

    #[test]
    fn q_restores_ctm() {
        let mut cursor = TextCursor::new();
        cursor.apply_state_op(&op("q", vec![]));
        cursor.apply_state_op(&op(
            "cm",
            vec![
                Object::Real(2.0),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(2.0),
                Object::Real(0.0),
                Object::Real(0.0),
            ],
        ));
        cursor.apply_state_op(&op(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(10)],
        ));
        let scaled = cursor.show_glyph(1000.0, false, &geo());
        assert!((scaled.bbox.width() - 20.0).abs() < 1e-9);

        cursor.apply_state_op(&op("Q", vec![]));
        cursor.apply_state_op(&op("BT", vec![]));
        let unscaled = cursor.show_glyph(1000.0, false, &geo());
        assert!((unscaled.bbox.width() - 10.0).abs() < 1e-9);
    }
}
