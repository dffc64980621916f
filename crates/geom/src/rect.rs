use super::{Expanse, Point};

/// A rectangle positioned on a character grid.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl Rect {
    /// Construct a rect from its top-left corner and dimensions.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The dimensions of this rect, discarding its location.
    pub fn expanse(&self) -> Expanse {
        Expanse {
            w: self.w,
            h: self.h,
        }
    }

    /// Does this rect contain the point?
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.tl.x && p.x < self.tl.x + self.w && p.y >= self.tl.y && p.y < self.tl.y + self.h
    }

    /// Does this rect fully enclose the other?
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.tl.x + other.w <= self.tl.x + self.w
            && other.tl.y + other.h <= self.tl.y + self.h
    }

    /// The same rect relocated to a new top-left corner.
    pub fn at(&self, p: impl Into<Point>) -> Self {
        Self {
            tl: p.into(),
            w: self.w,
            h: self.h,
        }
    }

    /// The overlap between this rect and another, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x1 = self.tl.x.max(other.tl.x);
        let y1 = self.tl.y.max(other.tl.y);
        let x2 = (self.tl.x + self.w).min(other.tl.x + other.w);
        let y2 = (self.tl.y + self.h).min(other.tl.y + other.h);
        if x1 < x2 && y1 < y2 {
            Some(Self::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

impl From<(u32, u32, u32, u32)> for Rect {
    fn from(v: (u32, u32, u32, u32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() {
        let r = Rect::new(2, 2, 4, 4);
        assert!(r.contains(&Point::new(2, 2)));
        assert!(r.contains(&Point::new(5, 5)));
        assert!(!r.contains(&Point::new(6, 6)));
        assert!(r.contains_rect(&Rect::new(3, 3, 2, 2)));
        assert!(!r.contains_rect(&Rect::new(3, 3, 4, 2)));
    }

    #[test]
    fn intersect() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(
            r.intersect(&Rect::new(5, 5, 10, 10)),
            Some(Rect::new(5, 5, 5, 5))
        );
        assert_eq!(r.intersect(&Rect::new(10, 10, 2, 2)), None);
    }
}
