use crate::{
    error::MismatchKind,
    segment::Segmenter,
    tree::{NodeId, Tree},
};

/// Where in a container's tree a flattened offset lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Split text node `leaf` before its grapheme `index`
    Split { leaf: NodeId, index: usize },
    /// The offset is the end of the container's content
    End,
}

/// Find the text node and in-node grapheme index a flattened `offset` refers to.
///
/// Walks the text nodes below `container` in document order, re-segmenting each
/// one, until `offset` graphemes have been passed. An offset on the boundary
/// between two text nodes lands at the end of the earlier one, so a marker
/// stays inside whatever inline markup wrapped the text before it. Empty text
/// nodes are never chosen.
pub fn locate_offset(
    tree: &Tree,
    container: NodeId,
    offset: usize,
    segmenter: &Segmenter,
) -> Result<Placement, MismatchKind> {
    let mut seen = 0usize;
    let mut candidate: Option<Placement> = None;
    for leaf in tree.text_leaves(container) {
        let count = segmenter.count(tree.text(leaf).unwrap_or_default());
        if candidate.is_none() && count > 0 && offset <= seen + count {
            candidate = Some(Placement::Split {
                leaf,
                index: offset - seen,
            });
        }
        seen += count;
    }

    if offset > seen {
        return Err(MismatchKind::OffsetOutOfRange {
            offset,
            total: seen,
        });
    }
    if offset == seen {
        return Ok(Placement::End);
    }
    candidate.ok_or(MismatchKind::OffsetOutOfRange {
        offset,
        total: seen,
    })
}

/// Make sure every boundary between two text nodes of `container` is also a
/// grapheme boundary of the container's full text.
///
/// Markup that splits one user-perceived character across two text nodes (say
/// a base letter and its combining accent) would make node-by-node grapheme
/// counts disagree with the counts over the whole text, so such containers are
/// rejected rather than guessed at.
pub fn check_leaf_boundaries(
    tree: &Tree,
    container: NodeId,
    boundaries: &[usize],
    segmenter: &Segmenter,
) -> Result<(), MismatchKind> {
    let mut bytes = 0usize;
    let mut graphemes = 0usize;
    for leaf in tree.text_leaves(container) {
        let text = tree.text(leaf).unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        if boundaries.binary_search(&bytes).is_err() {
            return Err(MismatchKind::SplitGrapheme { offset: graphemes });
        }
        bytes += text.len();
        graphemes += segmenter.count(text);
    }

    let whole = boundaries.len().saturating_sub(1);
    if graphemes != whole {
        return Err(MismatchKind::SplitGrapheme {
            offset: graphemes.min(whole),
        });
    }
    Ok(())
}
