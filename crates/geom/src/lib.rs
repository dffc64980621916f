//! Geometry primitives for character-cell layout.

/// Width/height size type.
mod expanse;
/// Per-edge padding.
mod padding;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use expanse::Expanse;
pub use padding::Padding;
pub use point::Point;
pub use rect::Rect;
