//! Test helpers: a fixed-size widget and an in-memory character surface.

use geom::{Expanse, Point, Rect};

use crate::surface::Surface;
use crate::tree::Widget;

/// A widget with a fixed preferred size that paints a single fill glyph.
pub struct Block {
    size: Expanse,
    fill: char,
}

impl Block {
    /// A block preferring `w` by `h` cells, filled with 'x'.
    pub fn sized(w: u32, h: u32) -> Self {
        Self {
            size: Expanse::new(w, h),
            fill: 'x',
        }
    }

    /// Builder: set the fill glyph.
    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }
}

impl Widget for Block {
    fn name(&self) -> &str {
        "block"
    }

    fn preferred_size(&self) -> Expanse {
        self.size
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Rect) {
        for y in 0..region.h {
            for x in 0..region.w {
                surface.put(region.tl + Point::new(x, y), self.fill);
            }
        }
    }
}

/// A character matrix implementing [`Surface`], for asserting on rendered
/// glyphs.
pub struct Buffer {
    size: Expanse,
    cells: Vec<Vec<char>>,
}

impl Buffer {
    /// A buffer of the given size, filled with spaces.
    pub fn new(size: Expanse) -> Self {
        Self {
            size,
            cells: vec![vec![' '; size.w as usize]; size.h as usize],
        }
    }

    /// One row as a string.
    pub fn row(&self, y: u32) -> String {
        self.cells[y as usize].iter().collect()
    }

    /// The whole buffer, rows joined with newlines.
    pub fn text(&self) -> String {
        (0..self.size.h)
            .map(|y| self.row(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for Buffer {
    fn size(&self) -> Expanse {
        self.size
    }

    fn put(&mut self, p: Point, glyph: char) {
        if p.x < self.size.w && p.y < self.size.h {
            self.cells[p.y as usize][p.x as usize] = glyph;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_ignores_out_of_bounds() {
        let mut b = Buffer::new(Expanse::new(3, 2));
        b.put(Point::new(10, 10), '!');
        b.put(Point::new(1, 1), 'y');
        assert_eq!(b.text(), "   \n y ");
    }
}
