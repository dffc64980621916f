use super::{Expanse, Point};

/// Per-edge padding in character cells. Subtracted from an available area
/// before children are measured, and added back when a container reports its
/// own preferred size. All arithmetic saturates at zero.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Padding {
    /// Cells reserved on the left edge.
    pub left: u32,
    /// Cells reserved on the top edge.
    pub top: u32,
    /// Cells reserved on the right edge.
    pub right: u32,
    /// Cells reserved on the bottom edge.
    pub bottom: u32,
}

impl Padding {
    /// Construct padding from individual edges.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Equal padding on all four edges.
    pub fn uniform(n: u32) -> Self {
        Self::new(n, n, n, n)
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }

    /// Shrink an area by this padding, saturating at zero.
    pub fn shrink(&self, e: Expanse) -> Expanse {
        Expanse {
            w: e.w.saturating_sub(self.horizontal()),
            h: e.h.saturating_sub(self.vertical()),
        }
    }

    /// Grow a measured size back out by this padding.
    pub fn grow(&self, e: Expanse) -> Expanse {
        Expanse {
            w: e.w + self.horizontal(),
            h: e.h + self.vertical(),
        }
    }

    /// Offset a position by the top-left padding edges.
    pub fn offset(&self, p: Point) -> Point {
        Point {
            x: p.x + self.left,
            y: p.y + self.top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_saturates() {
        let p = Padding::new(2, 1, 2, 1);
        assert_eq!(p.shrink(Expanse::new(10, 10)), Expanse::new(6, 8));
        assert_eq!(p.shrink(Expanse::new(3, 1)), Expanse::new(0, 0));
    }

    #[test]
    fn grow_offsets() {
        let p = Padding::uniform(1);
        assert_eq!(p.grow(Expanse::new(4, 4)), Expanse::new(6, 6));
        assert_eq!(p.offset(Point::new(3, 3)), Point::new(4, 4));
    }
}
