use crate::{
    config::MarkerConfig,
    error::MismatchKind,
    layout::{check_leaf_boundaries, locate_offset, plan_line_breaks, splice_marker},
    oracle::WidthOracle,
    tree::{NodeId, Tree},
    MarkerError,
};
use tracing::{debug, info_span, warn};

/// What a run of [insert_line_continuation_markers] did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsertionReport {
    /// Containers matched by the selector and processed
    pub containers: usize,
    /// Logical lines across all processed containers
    pub lines: usize,
    /// Markers inserted
    pub markers: usize,
}

/// Insert continuation markers into every container of `tree` matched by the
/// configured selector, in document order.
///
/// The configuration is validated before anything is touched. A selector
/// matching no containers is not an error: the tree is left as it is and an
/// empty report comes back.
///
/// Each container is planned in full before its first marker is inserted, so a
/// container that fails is left exactly as it was. Processing stops at the
/// first failing container; containers before it keep their markers.
pub fn insert_line_continuation_markers<O: WidthOracle + ?Sized>(
    tree: &mut Tree,
    config: &MarkerConfig<O::Font>,
    oracle: &O,
) -> Result<InsertionReport, MarkerError> {
    config.validate()?;

    let _span = info_span!(
        "line_continuation",
        selector = config.selector.as_str(),
        max_width = %config.max_width,
        marker_width = %config.marker_width,
        locale = config.segmenter.locale(),
    )
    .entered();

    let containers = outermost(tree, config.selector.select(tree));
    if containers.is_empty() {
        debug!("selector matched no containers, nothing to do");
        return Ok(InsertionReport::default());
    }

    let mut report = InsertionReport::default();
    for (index, &container) in containers.iter().enumerate() {
        let (lines, markers) = insert_markers_into(tree, container, index, config, oracle)
            .inspect_err(|error| warn!(container = index, %error, "failed to insert markers"))?;
        report.containers += 1;
        report.lines += lines;
        report.markers += markers;
    }

    debug!(
        containers = report.containers,
        markers = report.markers,
        "inserted line continuation markers"
    );
    Ok(report)
}

/// Drop every selected container nested inside another selected container.
/// The outer container already places markers in the inner one's text.
fn outermost(tree: &Tree, selected: Vec<NodeId>) -> Vec<NodeId> {
    let mut kept: Vec<NodeId> = Vec::with_capacity(selected.len());
    for container in selected {
        let mut ancestor = tree.parent(container);
        let nested = loop {
            match ancestor {
                Some(node) if kept.contains(&node) => break true,
                Some(node) => ancestor = tree.parent(node),
                None => break false,
            }
        };
        if nested {
            debug!(?container, "skipping container nested in another selected container");
        } else {
            kept.push(container);
        }
    }
    kept
}

/// Grapheme offsets into the container's text where markers go, plus the
/// number of logical lines. Does not touch the tree.
fn plan_container<O: WidthOracle + ?Sized>(
    text: &str,
    boundaries: &[usize],
    container_index: usize,
    config: &MarkerConfig<O::Font>,
    oracle: &O,
) -> Result<(Vec<usize>, usize), MarkerError> {
    let mut offsets: Vec<usize> = Vec::new();
    let mut lines = 0usize;
    let mut line_start = 0usize;

    for (line_index, line) in text.split(config.line_break.as_str()).enumerate() {
        let segments = config.segmenter.segment(line);
        let breaks = plan_line_breaks(
            &segments,
            config.max_width,
            config.marker_width,
            oracle,
            &config.font,
        )
        .map_err(|source| MarkerError::Unplaceable {
            container: container_index,
            line: line_index,
            source,
        })?;

        // line-local grapheme indices to byte positions, then to graphemes of the whole text
        let mut byte = line_start;
        let mut consumed = 0usize;
        for position in breaks {
            byte += segments[consumed..position]
                .iter()
                .map(|s| s.len())
                .sum::<usize>();
            consumed = position;
            let offset = boundaries.binary_search(&byte).map_err(|_| {
                MarkerError::StructuralMismatch {
                    container: container_index,
                    kind: MismatchKind::SplitGrapheme {
                        offset: boundaries.partition_point(|&b| b < byte),
                    },
                }
            })?;
            offsets.push(offset);
        }

        line_start += line.len() + config.line_break.len();
        lines += 1;
    }

    Ok((offsets, lines))
}

/// Insert markers into one container. `container_index` is only used to label
/// errors and log events. Returns the number of logical lines and of inserted
/// markers.
pub fn insert_markers_into<O: WidthOracle + ?Sized>(
    tree: &mut Tree,
    container: NodeId,
    container_index: usize,
    config: &MarkerConfig<O::Font>,
    oracle: &O,
) -> Result<(usize, usize), MarkerError> {
    let _span = info_span!("container", index = container_index).entered();
    let mismatch = |kind: MismatchKind| MarkerError::StructuralMismatch {
        container: container_index,
        kind,
    };

    let text = tree.text_content(container);
    let boundaries = config.segmenter.boundaries(&text);
    check_leaf_boundaries(tree, container, &boundaries, &config.segmenter).map_err(mismatch)?;

    let (offsets, lines) = plan_container(&text, &boundaries, container_index, config, oracle)?;

    let mut previous: Option<usize> = None;
    for &offset in offsets.iter() {
        if let Some(previous) = previous {
            if offset <= previous {
                return Err(mismatch(MismatchKind::OffsetNotAscending { offset, previous }));
            }
        }
        previous = Some(offset);

        let placement = locate_offset(tree, container, offset, &config.segmenter).map_err(mismatch)?;
        splice_marker(
            tree,
            container,
            placement,
            &config.marker_class_name,
            &config.segmenter,
        )
        .map_err(mismatch)?;
        debug!(offset, "placed marker");
    }

    Ok((lines, offsets.len()))
}
