//! The seam between the layout engine and the rendering collaborator.

use geom::{Expanse, Point};

/// A character-cell drawing target. The renderer supplies the real
/// implementation; the engine only writes grid border glyphs through it, and
/// widgets receive it in [`crate::Widget::draw`].
pub trait Surface {
    /// The drawable size.
    fn size(&self) -> Expanse;

    /// Place a glyph. Implementations must ignore out-of-bounds writes.
    fn put(&mut self, p: Point, glyph: char);
}

/// The set of glyphs used to draw grid borders.
pub struct BorderGlyphs {
    /// Top-left outer corner.
    pub topleft: char,
    /// Top-right outer corner.
    pub topright: char,
    /// Bottom-left outer corner.
    pub bottomleft: char,
    /// Bottom-right outer corner.
    pub bottomright: char,
    /// Horizontal divider line.
    pub horizontal: char,
    /// Vertical divider line.
    pub vertical: char,
    /// Top-edge junction with an interior column divider.
    pub tee_down: char,
    /// Bottom-edge junction with an interior column divider.
    pub tee_up: char,
    /// Left-edge junction with an interior row divider.
    pub tee_right: char,
    /// Right-edge junction with an interior row divider.
    pub tee_left: char,
    /// Interior row/column crossing.
    pub cross: char,
}

/// Single line thin Unicode box drawing set.
pub const SINGLE: BorderGlyphs = BorderGlyphs {
    topleft: '┌',
    topright: '┐',
    bottomleft: '└',
    bottomright: '┘',
    horizontal: '─',
    vertical: '│',
    tee_down: '┬',
    tee_up: '┴',
    tee_right: '├',
    tee_left: '┤',
    cross: '┼',
};

/// Double line Unicode box drawing set.
pub const DOUBLE: BorderGlyphs = BorderGlyphs {
    topleft: '╔',
    topright: '╗',
    bottomleft: '╚',
    bottomright: '╝',
    horizontal: '═',
    vertical: '║',
    tee_down: '╦',
    tee_up: '╩',
    tee_right: '╠',
    tee_left: '╣',
    cross: '╬',
};
