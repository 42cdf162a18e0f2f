//! Insert line continuation markers into preformatted text blocks.
//!
//! Code listings headed for print cannot scroll sideways: a line wider than the
//! page gets clipped or silently reflowed. This crate finds the logical lines of
//! each selected container (by default `pre > code`) that render wider than a
//! pixel budget, and inserts an empty marker element wherever such a line must
//! continue on the next visual line, leaving room for the marker itself. The
//! marker can then be styled (e.g. with a `↩` glyph) by the print stylesheet.
//!
//! Widths come from a [WidthOracle]; [FontBook] is one backed by real TrueType
//! and OpenType fonts. All positions are counted in grapheme clusters, so a
//! marker never lands inside a user-perceived character.
//!
//! ```
//! use line_continuation::{insert_line_continuation_markers, Element, MarkerConfig, Px, Tree, WidthOracle};
//!
//! struct Monospace;
//!
//! impl WidthOracle for Monospace {
//!     type Font = ();
//!
//!     fn measure(&self, text: &str, _font: &()) -> Px {
//!         Px(10.0 * text.chars().count() as f32)
//!     }
//! }
//!
//! let mut tree = Tree::new();
//! let pre = tree.append_element(tree.root(), Element::new("pre"));
//! let code = tree.append_element(pre, Element::new("code"));
//! tree.append_text(code, "let answer = 42;");
//!
//! let config = MarkerConfig::new(100.0, (), 15.0, "line-continuation");
//! let report = insert_line_continuation_markers(&mut tree, &config, &Monospace).unwrap();
//! assert_eq!(report.markers, 1);
//! assert_eq!(
//!     tree.to_string(),
//!     r#"<pre><code>let answ<span class="line-continuation"></span>er = 42;</code></pre>"#
//! );
//! ```

mod config;
pub use config::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod insert;
pub use insert::*;

/// Planning, locating and splicing markers within a single container
pub mod layout;

mod oracle;
pub use oracle::*;

mod segment;
pub use segment::*;

mod selector;
pub use selector::*;

mod tree;
pub use tree::*;

mod units;
pub use units::*;

#[cfg(test)]
pub(crate) mod testing;

/// Re-export of the font parser backing [Font], for callers inspecting faces directly
pub use owned_ttf_parser;
