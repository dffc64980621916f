use std::ops::Add;

/// A location on a character grid, in cells.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    /// Column co-ordinate.
    pub x: u32,
    /// Row co-ordinate.
    pub y: u32,
}

impl Point {
    /// Construct a point.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub fn zero() -> Self {
        (0, 0).into()
    }

    /// Is this the origin?
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Shift the point by a signed offset, avoiding under- or overflow.
    pub fn shift(&self, x: i32, y: i32) -> Self {
        let nx = if x < 0 {
            self.x.saturating_sub(x.unsigned_abs())
        } else {
            self.x.saturating_add(x.unsigned_abs())
        };
        let ny = if y < 0 {
            self.y.saturating_sub(y.unsigned_abs())
        } else {
            self.y.saturating_add(y.unsigned_abs())
        };
        (nx, ny).into()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl From<(u32, u32)> for Point {
    #[inline]
    fn from(v: (u32, u32)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}
