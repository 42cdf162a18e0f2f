//! A deterministic width oracle for unit tests, standing in for a real font.

use crate::{oracle::WidthOracle, units::Px};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Gives every grapheme a fixed width, except for the ones listed in `widths`.
/// Pairs listed in `kerning` pull the second grapheme closer to the first, so
/// the width of a run is not the sum of its parts.
#[derive(Debug, Clone)]
pub struct CellOracle {
    pub cell: f32,
    pub widths: HashMap<String, f32>,
    pub kerning: HashMap<(String, String), f32>,
}

impl CellOracle {
    pub fn new(cell: f32) -> CellOracle {
        CellOracle {
            cell,
            widths: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    pub fn with_width(mut self, grapheme: &str, width: f32) -> CellOracle {
        self.widths.insert(grapheme.to_string(), width);
        self
    }

    pub fn with_kerning(mut self, left: &str, right: &str, adjust: f32) -> CellOracle {
        self.kerning
            .insert((left.to_string(), right.to_string()), adjust);
        self
    }
}

impl WidthOracle for CellOracle {
    type Font = ();

    fn measure(&self, text: &str, _font: &()) -> Px {
        let mut width = 0.0;
        let mut previous: Option<&str> = None;
        for grapheme in text.graphemes(true) {
            width += self.widths.get(grapheme).copied().unwrap_or(self.cell);
            if let Some(prev) = previous {
                width += self
                    .kerning
                    .get(&(prev.to_string(), grapheme.to_string()))
                    .copied()
                    .unwrap_or_default();
            }
            previous = Some(grapheme);
        }
        Px(width)
    }
}
