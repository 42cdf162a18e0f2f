use crate::{font::Font, units::Px, MarkerError};
use id_arena::{Arena, Id};
use owned_ttf_parser::{GlyphId, OutlineBuilder, Rect};
use rustybuzz::UnicodeBuffer;
use std::{fmt::Write as _, path::Path};

/// Measures how wide a piece of text renders in a given font.
///
/// Implementations must be pure: measuring the same text with the same font
/// twice must give the same answer, since line planning re-measures growing and
/// shrinking prefixes of a line and compares the results against each other.
pub trait WidthOracle {
    /// Whatever the oracle needs to know to pick a font, passed through opaquely
    type Font;

    /// The rendered width of `text`, in device pixels
    fn measure(&self, text: &str, font: &Self::Font) -> Px;
}

impl<T: WidthOracle + ?Sized> WidthOracle for &T {
    type Font = T::Font;

    fn measure(&self, text: &str, font: &Self::Font) -> Px {
        (**self).measure(text, font)
    }
}

/// Selects a font from a [FontBook] and the size to measure it at
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontSpec {
    pub id: Id<Font>,
    pub size: Px,
}

/// The set of fonts text can be measured with. Fonts are referred to by the
/// [Id] returned from [FontBook::add_font], much like a document refers to its
/// embedded fonts.
#[derive(Default)]
pub struct FontBook {
    pub fonts: Arena<Font>,
}

/// One shaped glyph positioned relative to the start of the run, in pixels
#[derive(Debug, Clone, Copy)]
struct PlacedGlyph {
    id: GlyphId,
    x: f32,
    y: f32,
    bbox: Option<Rect>,
}

impl FontBook {
    pub fn new() -> FontBook {
        FontBook::default()
    }

    /// Add a font to the book, returning the id used to refer to it in a [FontSpec]
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        self.fonts.alloc(font)
    }

    /// Convenience for building a [FontSpec] for a font in this book
    pub fn spec<S: Into<Px>>(&self, id: Id<Font>, size: S) -> FontSpec {
        FontSpec {
            id,
            size: size.into(),
        }
    }

    /// Shape `text` and lay its glyphs out along the baseline. Shaping applies
    /// kerning and ligatures, and positions combining marks over their base
    /// instead of after it.
    fn place_glyphs(&self, text: &str, spec: &FontSpec) -> Vec<PlacedGlyph> {
        let font = &self.fonts[spec.id];
        let scaling = font.scaling(spec.size);
        let shaper = font.shaper();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let shaped = rustybuzz::shape(&shaper, &[], buffer);

        let mut pen = 0.0f32;
        shaped
            .glyph_infos()
            .iter()
            .zip(shaped.glyph_positions())
            .map(|(info, position)| {
                let id = GlyphId(info.glyph_id as u16);
                let glyph = PlacedGlyph {
                    id,
                    x: pen + scaling * position.x_offset as f32,
                    y: scaling * position.y_offset as f32,
                    bbox: font.face().glyph_bounding_box(id),
                };
                pen += scaling * position.x_advance as f32;
                glyph
            })
            .collect()
    }

    /// The horizontal ink extents `(min_x, max_x)` of the placed glyphs, relative
    /// to the start of the text
    fn ink_extents(glyphs: &[PlacedGlyph], scaling: f32) -> Option<(f32, f32)> {
        glyphs
            .iter()
            .filter_map(|glyph| {
                glyph.bbox.map(|bbox| {
                    (
                        glyph.x + scaling * bbox.x_min as f32,
                        glyph.x + scaling * bbox.x_max as f32,
                    )
                })
            })
            .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
    }

    /// Render the glyph outlines of `text` and its measured bounding box into a
    /// standalone SVG document, to check measurements by eye when calibrating
    pub fn debug_svg(&self, text: &str, spec: &FontSpec) -> String {
        let font = &self.fonts[spec.id];
        let scaling = font.scaling(spec.size);
        let ascent = font.ascent(spec.size).0;
        let height = ascent - font.descent(spec.size).0;

        let glyphs = self.place_glyphs(text, spec);
        let (min_x, max_x) = Self::ink_extents(&glyphs, scaling).unwrap_or((0.0, 0.0));
        let advance = glyphs
            .iter()
            .map(|glyph| {
                glyph.x
                    + scaling * font.face().glyph_hor_advance(glyph.id).unwrap_or_default() as f32
            })
            .fold(0.0f32, f32::max);
        let left = min_x.min(0.0);
        let width = max_x.max(advance) - left;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{left} 0 {width} {height}">"#
        );
        for glyph in glyphs.iter() {
            let mut path = SvgPath {
                data: String::new(),
                offset: glyph.x,
                baseline: ascent - glyph.y,
                scaling,
            };
            if font.face().outline_glyph(glyph.id, &mut path).is_some() {
                let _ = writeln!(svg, r#"  <path d="{}" fill="black"/>"#, path.data.trim_end());
            }
        }
        let _ = writeln!(
            svg,
            r#"  <rect x="{min_x}" y="0" width="{}" height="{height}" fill="none" stroke="red" stroke-width="0.5"/>"#,
            max_x - min_x
        );
        svg.push_str("</svg>\n");
        svg
    }

    /// Measure `text` and write the [FontBook::debug_svg] rendering of it to `path`
    pub fn measure_with_debug<P: AsRef<Path>>(
        &self,
        text: &str,
        spec: &FontSpec,
        path: P,
    ) -> Result<Px, MarkerError> {
        std::fs::write(path, self.debug_svg(text, spec))?;
        Ok(self.measure(text, spec))
    }
}

impl WidthOracle for FontBook {
    type Font = FontSpec;

    /// Width of the shaped text's ink bounding box: the sum of its left and right
    /// extents from the start of the text. Slanted and overhanging glyphs are
    /// counted in full, which a plain sum of advances would undercount.
    fn measure(&self, text: &str, font: &FontSpec) -> Px {
        let scaling = self.fonts[font.id].scaling(font.size);
        let glyphs = self.place_glyphs(text, font);
        match Self::ink_extents(&glyphs, scaling) {
            Some((min_x, max_x)) => Px(max_x - min_x),
            None => Px::ZERO,
        }
    }
}

/// Collects glyph outlines as SVG path data, flipping the y axis to match SVG
struct SvgPath {
    data: String,
    offset: f32,
    baseline: f32,
    scaling: f32,
}

impl SvgPath {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.offset + x * self.scaling,
            self.baseline - y * self.scaling,
        )
    }
}

impl OutlineBuilder for SvgPath {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "M{x} {y} ");
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "L{x} {y} ");
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "Q{x1} {y1} {x} {y} ");
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        let _ = write!(self.data, "C{x1} {y1} {x2} {y2} {x} {y} ");
    }

    fn close(&mut self) {
        self.data.push_str("Z ");
    }
}
