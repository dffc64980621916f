//! Per-child layout directives: sizing intents, gravity and weight.

use crate::measure::SizeSpec;

/// Placement of a child within extra space on a single axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum AxisGravity {
    /// Flush with the leading edge.
    #[default]
    Start,
    /// Centered, rounding toward the leading edge.
    Center,
    /// Flush with the trailing edge.
    End,
}

impl AxisGravity {
    /// The offset of a child of `child` cells within an area of `area`
    /// cells. Saturates at zero when the child is larger than the area.
    pub fn space(&self, child: u32, area: u32) -> u32 {
        match self {
            Self::Start => 0,
            Self::Center => area.saturating_sub(child) / 2,
            Self::End => area.saturating_sub(child),
        }
    }
}

/// A named anchor point, resolved independently per axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Gravity {
    /// Top edge, left edge.
    #[default]
    TopLeft,
    /// Top edge, horizontally centered.
    TopCenter,
    /// Top edge, right edge.
    TopRight,
    /// Vertically centered, left edge.
    CenterLeft,
    /// Centered on both axes.
    Center,
    /// Vertically centered, right edge.
    CenterRight,
    /// Bottom edge, left edge.
    BottomLeft,
    /// Bottom edge, horizontally centered.
    BottomCenter,
    /// Bottom edge, right edge.
    BottomRight,
}

impl Gravity {
    /// The horizontal placement rule.
    pub fn horizontal(&self) -> AxisGravity {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => AxisGravity::Start,
            Self::TopCenter | Self::Center | Self::BottomCenter => AxisGravity::Center,
            Self::TopRight | Self::CenterRight | Self::BottomRight => AxisGravity::End,
        }
    }

    /// The vertical placement rule.
    pub fn vertical(&self) -> AxisGravity {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => AxisGravity::Start,
            Self::CenterLeft | Self::Center | Self::CenterRight => AxisGravity::Center,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => AxisGravity::End,
        }
    }
}

/// Sizing and placement directives for one child.
///
/// This is a single flat type: managers that don't consult gravity or weight
/// simply ignore those fields, and absent directives take the defaults below
/// rather than erroring.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct LayoutParams {
    /// Sizing intent on the column axis.
    pub cols: SizeSpec,
    /// Sizing intent on the row axis.
    pub rows: SizeSpec,
    /// Anchor within extra space, where the manager honors it.
    pub gravity: Gravity,
    /// Share of leftover main-axis space in a linear stack. Zero means the
    /// child keeps its measured size.
    pub weight: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            cols: SizeSpec::Wrap,
            rows: SizeSpec::Wrap,
            gravity: Gravity::TopLeft,
            weight: 0,
        }
    }
}

impl LayoutParams {
    /// Params with the given sizing intents and default gravity/weight.
    pub fn new(cols: SizeSpec, rows: SizeSpec) -> Self {
        Self {
            cols,
            rows,
            ..Self::default()
        }
    }

    /// Wrap content on both axes.
    pub fn wrap() -> Self {
        Self::default()
    }

    /// Fill the parent on both axes.
    pub fn fill() -> Self {
        Self::new(SizeSpec::Fill, SizeSpec::Fill)
    }

    /// Builder: set the gravity anchor.
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set the weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_space() {
        assert_eq!(AxisGravity::Start.space(4, 10), 0);
        assert_eq!(AxisGravity::Center.space(4, 10), 3);
        assert_eq!(AxisGravity::End.space(4, 10), 6);
        // Oversized children clamp to the leading edge.
        assert_eq!(AxisGravity::Center.space(12, 10), 0);
        assert_eq!(AxisGravity::End.space(12, 10), 0);
    }

    #[test]
    fn gravity_decomposes() {
        assert_eq!(Gravity::BottomRight.horizontal(), AxisGravity::End);
        assert_eq!(Gravity::BottomRight.vertical(), AxisGravity::End);
        assert_eq!(Gravity::TopCenter.horizontal(), AxisGravity::Center);
        assert_eq!(Gravity::TopCenter.vertical(), AxisGravity::Start);
        assert_eq!(Gravity::Center.horizontal(), AxisGravity::Center);
    }

    #[test]
    fn defaults() {
        let p = LayoutParams::default();
        assert_eq!(p.cols, SizeSpec::Wrap);
        assert_eq!(p.rows, SizeSpec::Wrap);
        assert_eq!(p.gravity, Gravity::TopLeft);
        assert_eq!(p.weight, 0);
    }
}
