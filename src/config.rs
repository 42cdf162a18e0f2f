use crate::{segment::Segmenter, selector::Selector, units::Px, MarkerError};

/// Everything one run of [insert_line_continuation_markers](crate::insert_line_continuation_markers)
/// needs to know. `F` is the font type of the [WidthOracle](crate::WidthOracle) doing the
/// measuring, e.g. a [FontSpec](crate::FontSpec) for a [FontBook](crate::FontBook).
#[derive(Debug, Clone)]
pub struct MarkerConfig<F> {
    /// The widest a line may render before it needs a marker
    pub max_width: Px,
    /// The font the content is rendered in, handed to the oracle as-is
    pub font: F,
    /// How much room the marker takes up at the end of a line
    pub marker_width: Px,
    /// Class given to every inserted marker element
    pub marker_class_name: String,
    pub selector: Selector,
    /// Delimiter between logical lines
    pub line_break: String,
    pub segmenter: Segmenter,
}

impl<F> MarkerConfig<F> {
    /// Create a configuration with the default selector (`pre > code`), newline
    /// line breaks and extended graphemes
    pub fn new<W: Into<Px>, M: Into<Px>, S: ToString>(
        max_width: W,
        font: F,
        marker_width: M,
        marker_class_name: S,
    ) -> MarkerConfig<F> {
        MarkerConfig {
            max_width: max_width.into(),
            font,
            marker_width: marker_width.into(),
            marker_class_name: marker_class_name.to_string(),
            selector: Selector::default(),
            line_break: "\n".to_string(),
            segmenter: Segmenter::default(),
        }
    }

    pub fn with_selector(mut self, selector: Selector) -> MarkerConfig<F> {
        self.selector = selector;
        self
    }

    pub fn with_line_break<S: ToString>(mut self, line_break: S) -> MarkerConfig<F> {
        self.line_break = line_break.to_string();
        self
    }

    pub fn with_locale<S: ToString>(mut self, locale: S) -> MarkerConfig<F> {
        self.segmenter = Segmenter::new(Some(locale.to_string()))
            .with_extended(self.segmenter.is_extended());
        self
    }

    /// Use extended (`true`, the default) or legacy grapheme clusters
    pub fn with_extended_graphemes(mut self, extended: bool) -> MarkerConfig<F> {
        self.segmenter = self.segmenter.with_extended(extended);
        self
    }

    /// Check the configuration can be acted on at all. Runs before any tree is
    /// touched.
    pub fn validate(&self) -> Result<(), MarkerError> {
        for (name, value) in [
            ("max_width", self.max_width),
            ("marker_width", self.marker_width),
        ] {
            if !value.is_finite() || value < Px::ZERO {
                return Err(MarkerError::InvalidWidth { name, value });
            }
        }

        if self.marker_width >= self.max_width {
            return Err(MarkerError::MarkerTooWide {
                marker_width: self.marker_width,
                max_width: self.max_width,
            });
        }

        if self.line_break.is_empty() {
            return Err(MarkerError::EmptyLineBreak);
        }

        Ok(())
    }
}
