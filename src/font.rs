use crate::{units::Px, MarkerError};
use owned_ttf_parser::{AsFaceRef, Face, OwnedFace};

/// A parsed font object. Fonts can be TTF or OTF fonts, and are only ever used to
/// measure text: this crate never embeds or renders them for real.
///
/// The font used for measuring must be the font the content is finally rendered
/// with, otherwise the measured widths mean nothing.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, MarkerError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    /// Load a font from a file on disk
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Font, MarkerError> {
        let bytes = std::fs::read(path)?;
        Font::load(bytes)
    }

    pub(crate) fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Pixels per font unit at the given size
    pub fn scaling(&self, size: Px) -> f32 {
        size.0 / self.face().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Px) -> Px {
        Px(self.scaling(size) * self.face().ascender() as f32)
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        Px(self.scaling(size) * self.face().descender() as f32)
    }

    pub fn is_monospaced(&self) -> bool {
        self.face().is_monospaced()
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.face().glyph_index('\u{FFFD}').map(|i| i.0)
    }

    /// A shaping face over this font, for laying out runs of text the way a
    /// renderer would: with kerning, ligatures and marks placed on their bases
    pub(crate) fn shaper(&self) -> rustybuzz::Face<'_> {
        rustybuzz::Face::from_face(self.face().clone())
    }
}
