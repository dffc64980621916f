//! A dynamic layout engine for character-grid widget trees.
//!
//! Widgets attach to a [`LayoutTree`] with a fixed role and per-child
//! [`LayoutParams`]. Sizing runs in two passes: measurement propagates
//! [`MeasureSpec`] constraints down the tree and natural sizes back up, and
//! layout commits final cell geometry. Containers track their own dirtiness;
//! a renderer drives passes through [`LayoutTree::do_layout`] and reads the
//! committed geometry back out.
//!
//! The engine computes geometry and grid borders only. Drawing glyphs,
//! styling, and input are the renderer's business, reached through the
//! [`Surface`] seam.

pub mod error;
pub mod tutils;

mod frame;
mod grid;
mod linear;
mod manager;
mod measure;
mod params;
mod scroll;
mod surface;
mod tree;

pub use error::{Error, Result};
pub use geom::{Expanse, Padding, Point, Rect};
pub use measure::{MeasureKind, MeasureSpec, SizeSpec, UNBOUNDED};
pub use params::{AxisGravity, Gravity, LayoutParams};
pub use scroll::RedrawPlan;
pub use surface::{BorderGlyphs, Surface, DOUBLE, SINGLE};
pub use tree::{Arrangement, LayoutTree, NodeKind, Widget, WidgetId};
