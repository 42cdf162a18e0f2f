//! Placing continuation markers inside a container.
//!
//! Placing markers happens in three steps, each usable on its own:
//!
//! - [`plan_line_breaks`](crate::layout::plan_line_breaks) - decides where on one logical line markers go
//! - [`locate_offset`](crate::layout::locate_offset) - maps a grapheme offset in a container's text to a text node
//! - [`splice_marker`](crate::layout::splice_marker) - splits that text node around a new marker element
//!
//! [`insert_line_continuation_markers`](crate::insert_line_continuation_markers)
//! drives all three over every selected container of a tree.
//!
//! # Example
//!
//! ```
//! use line_continuation::layout::plan_line_breaks;
//! use line_continuation::{Px, WidthOracle};
//!
//! /// Every character is 10px wide
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
//! let line = "fn main() { println!(\"hello\"); }";
//! let segments: Vec<&str> = line.split_inclusive(|_| true).collect();
//! let breaks = plan_line_breaks(&segments, Px(205.0), Px(8.0), &Monospace, &()).unwrap();
//! assert_eq!(breaks, vec![19]);
//! ```

mod mapper;
mod planner;
mod splice;

pub use mapper::*;
pub use planner::*;
pub use splice::*;
