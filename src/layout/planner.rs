use crate::{error::UnplaceableBreak, oracle::WidthOracle, units::Px};

/// Decides where on one logical line continuation markers must go.
///
/// `segments` are the graphemes of the line. The returned positions are
/// grapheme indices into `segments`, in ascending order: a marker goes
/// immediately before `segments[position]`.
///
/// # Algorithm
///
/// The planner grows a run of graphemes one at a time, re-measuring the whole
/// run each time (kerning, ligatures and combining marks make widths
/// non-additive). While the run fits within `max_width` it keeps growing. Once
/// it overflows, trailing graphemes are dropped until the run plus the marker
/// fits within `max_width`, a break is recorded there, and a new run starts at
/// the first dropped grapheme. Runs never reach back past the previous break.
///
/// A line that fits entirely yields no breaks. The final run of a line needs no
/// room for a marker, as nothing continues after it.
///
/// # Errors
///
/// If a run shrinks to nothing before the marker fits, the grapheme starting
/// the run cannot share a line with the marker at all and
/// [UnplaceableBreak] is returned instead of a break that would overflow.
pub fn plan_line_breaks<O: WidthOracle + ?Sized>(
    segments: &[&str],
    max_width: Px,
    marker_width: Px,
    oracle: &O,
    font: &O::Font,
) -> Result<Vec<usize>, UnplaceableBreak> {
    let mut breaks: Vec<usize> = Vec::new();

    // the current run is segments[start..end], its text in `run`
    let mut start = 0usize;
    let mut end = 0usize;
    let mut run = String::new();

    while end < segments.len() {
        run.push_str(segments[end]);
        end += 1;
        if oracle.measure(&run, font) <= max_width {
            continue;
        }

        // overflowed: drop trailing graphemes until the marker fits beside the run
        loop {
            end -= 1;
            run.truncate(run.len() - segments[end].len());
            if end == start {
                return Err(UnplaceableBreak {
                    index: start,
                    segment: segments[start].to_string(),
                    width: oracle.measure(segments[start], font),
                    marker_width,
                    max_width,
                });
            }

            let width = oracle.measure(&run, font);
            tracing::trace!(end, %width, "backtracking to fit marker");
            if width + marker_width <= max_width {
                break;
            }
        }

        breaks.push(end);
        start = end;
        run.clear();
    }

    Ok(breaks)
}
