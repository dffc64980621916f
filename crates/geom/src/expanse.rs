use super::{Point, Rect};

/// A width and height with no location. Measurement traffics in expanses;
/// a `Rect` only appears once geometry is committed somewhere.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl Expanse {
    /// Construct an expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// The area of this expanse.
    pub fn area(&self) -> u32 {
        self.w * self.h
    }

    /// Return a `Rect` with the same dimensions as the `Expanse`, located at
    /// (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::default(),
            w: self.w,
            h: self.h,
        }
    }

    /// True if this expanse can completely enclose the target in both
    /// dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
