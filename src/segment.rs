use unicode_segmentation::UnicodeSegmentation;

/// Splits text into user-perceived characters (grapheme clusters).
///
/// Every offset this crate computes, whether over a whole line or over a single
/// text node, is counted in the graphemes produced by one `Segmenter`. Mixing
/// segmenters within a run would let line offsets and node offsets drift apart.
///
/// Unicode's extended grapheme cluster rules do not vary by locale, so the
/// locale is carried along for diagnostics only. Legacy clusters can be
/// selected with [Segmenter::with_extended].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmenter {
    locale: Option<String>,
    extended: bool,
}

impl Default for Segmenter {
    fn default() -> Self {
        Segmenter {
            locale: None,
            extended: true,
        }
    }
}

impl Segmenter {
    /// Create a segmenter using extended grapheme clusters for the given locale
    pub fn new(locale: Option<String>) -> Segmenter {
        Segmenter {
            locale,
            ..Segmenter::default()
        }
    }

    /// Choose between extended (`true`, the default) and legacy grapheme clusters
    pub fn with_extended(mut self, extended: bool) -> Segmenter {
        self.extended = extended;
        self
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Split `text` into its graphemes, in order
    pub fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.graphemes(self.extended).collect()
    }

    /// Count the graphemes in `text` without collecting them
    pub fn count(&self, text: &str) -> usize {
        text.graphemes(self.extended).count()
    }

    /// Byte offsets of every grapheme boundary in `text`, from `0` up to and
    /// including `text.len()`. The position of a boundary in this list is the
    /// number of graphemes before it.
    pub fn boundaries(&self, text: &str) -> Vec<usize> {
        text.grapheme_indices(self.extended)
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect()
    }
}
