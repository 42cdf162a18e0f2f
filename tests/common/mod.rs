//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use line_continuation::{Element, NodeId, Px, Tree, WidthOracle};
use std::{collections::HashMap, sync::Once};
use unicode_segmentation::UnicodeSegmentation;

pub const MARKER: &str = "line-continuation";

/// Route the crate's tracing output to the test harness. Honours `RUST_LOG`,
/// defaulting to debug events from this crate.
pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("line_continuation=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A monospace-like test font: every grapheme is `cell` pixels wide unless it
/// has its own entry in `widths`. Measuring counts graphemes, never chars, the
/// way a font with combining marks and ligatures would.
#[derive(Debug, Clone)]
pub struct TestFont {
    pub cell: f32,
    pub widths: HashMap<&'static str, f32>,
}

impl TestFont {
    pub fn monospace(cell: f32) -> TestFont {
        TestFont {
            cell,
            widths: HashMap::new(),
        }
    }

    pub fn with_width(mut self, grapheme: &'static str, width: f32) -> TestFont {
        self.widths.insert(grapheme, width);
        self
    }
}

impl WidthOracle for TestFont {
    type Font = ();

    fn measure(&self, text: &str, _font: &()) -> Px {
        Px(text
            .graphemes(true)
            .map(|g| self.widths.get(g).copied().unwrap_or(self.cell))
            .sum())
    }
}

/// `<pre><code>` holding `text` as a single text node
pub fn code_block(tree: &mut Tree, text: &str) -> NodeId {
    let pre = tree.append_element(tree.root(), Element::new("pre"));
    let code = tree.append_element(pre, Element::new("code"));
    tree.append_text(code, text);
    code
}

/// Markers below `container`, in document order
pub fn markers(tree: &Tree, container: NodeId) -> Vec<NodeId> {
    tree.descendants(container)
        .into_iter()
        .filter(|&node| tree.is_marker(node, MARKER))
        .collect()
}

/// The visual runs of `container`'s text: its content cut at every newline and
/// every marker. The flag is `true` for runs that end at a marker.
pub fn visual_runs(tree: &Tree, container: NodeId) -> Vec<(String, bool)> {
    let mut runs = vec![(String::new(), false)];
    for node in tree.descendants(container) {
        if tree.is_marker(node, MARKER) {
            if let Some(last) = runs.last_mut() {
                last.1 = true;
            }
            runs.push((String::new(), false));
        } else if let Some(text) = tree.text(node) {
            let mut parts = text.split('\n');
            if let (Some(first), Some(last)) = (parts.next(), runs.last_mut()) {
                last.0.push_str(first);
            }
            for part in parts {
                runs.push((part.to_string(), false));
            }
        }
    }
    runs
}
