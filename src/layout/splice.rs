use super::mapper::Placement;
use crate::{
    error::MismatchKind,
    segment::Segmenter,
    tree::{Element, NodeId, Tree},
};

/// Tag of the inserted marker elements
pub const MARKER_TAG: &str = "span";

/// Insert an empty marker element carrying `class_name` at `placement`.
///
/// A [Placement::Split] replaces the text node, in place, with three siblings:
/// the text before the split, the marker, and the text after it. Either text
/// node may come out empty; it is created regardless. A [Placement::End] appends
/// the marker as the last child of `container`. No other node is touched.
///
/// Returns the id of the new marker.
pub fn splice_marker(
    tree: &mut Tree,
    container: NodeId,
    placement: Placement,
    class_name: &str,
    segmenter: &Segmenter,
) -> Result<NodeId, MismatchKind> {
    let marker = Element::new(MARKER_TAG).with_class(class_name);

    let (leaf, index) = match placement {
        Placement::End => return Ok(tree.append_element(container, marker)),
        Placement::Split { leaf, index } => (leaf, index),
    };

    let text = tree.text(leaf).unwrap_or_default();
    let segments = segmenter.segment(text);
    if index > segments.len() {
        return Err(MismatchKind::OffsetOutOfRange {
            offset: index,
            total: segments.len(),
        });
    }
    let before = segments[..index].concat();
    let after = segments[index..].concat();

    let before = tree.create_text(before);
    let marker = tree.create_element(marker);
    let after = tree.create_text(after);
    if !tree.replace_with(leaf, &[before, marker, after]) {
        return Err(MismatchKind::DetachedLeaf);
    }
    Ok(marker)
}
