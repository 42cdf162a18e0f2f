use crate::units::Px;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error(transparent)]
    /// An I/O error occurred, usually while writing debug output
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("marker width {marker_width} must be smaller than the maximum width {max_width}")]
    /// No marker can ever fit on a line next to any text
    MarkerTooWide { marker_width: Px, max_width: Px },

    #[error("{name} must be a finite, non-negative width (got {value})")]
    /// A width in the configuration is NaN, infinite or negative
    InvalidWidth { name: &'static str, value: Px },

    #[error("the line break delimiter must not be empty")]
    /// Lines cannot be split on an empty delimiter
    EmptyLineBreak,

    #[error("invalid selector `{selector}`: {reason}")]
    /// The container selector could not be parsed as CSS
    InvalidSelector { selector: String, reason: String },

    #[error("container {container}, line {line}: {source}")]
    /// A grapheme on a line cannot share the line with the marker
    Unplaceable {
        container: usize,
        line: usize,
        #[source]
        source: UnplaceableBreak,
    },

    #[error("container {container}: {kind}")]
    /// The tree does not match the offsets computed from its text content
    StructuralMismatch { container: usize, kind: MismatchKind },
}

/// The planner found a grapheme that does not fit next to the marker, even when
/// it starts the run on its own
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "grapheme {segment:?} at index {index} measures {width}, leaving no room for a {marker_width} marker within {max_width}"
)]
pub struct UnplaceableBreak {
    pub index: usize,
    pub segment: String,
    pub width: Px,
    pub marker_width: Px,
    pub max_width: Px,
}

/// The ways the tree of a container can disagree with its flattened text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    #[error("offset {offset} is past the end of the content ({total} graphemes)")]
    /// A break lies beyond the last grapheme of the container or text node
    OffsetOutOfRange { offset: usize, total: usize },

    #[error("offset {offset} does not follow the previous offset {previous}")]
    /// Breaks must be spliced in strictly ascending order
    OffsetNotAscending { offset: usize, previous: usize },

    #[error("a grapheme is split across text nodes near grapheme {offset}")]
    /// Markup separates the parts of one grapheme, e.g. a base letter and its accent
    SplitGrapheme { offset: usize },

    #[error("the text node to split is no longer attached to the tree")]
    /// The text node to split has no parent to splice the marker into
    DetachedLeaf,
}
