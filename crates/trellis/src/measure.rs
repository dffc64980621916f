//! Measurement constraints and the rules for propagating them to children.
//!
//! A parent hands each child a [`MeasureSpec`] per axis; the child combines
//! it with its own [`SizeSpec`] intent via [`SizeSpec::for_child`] and
//! reports a size that satisfies the constraint. Both operations are pure
//! and total.

use geom::Expanse;

/// Sentinel magnitude meaning "no budget on this axis".
pub const UNBOUNDED: u32 = u32::MAX;

/// How a [`MeasureSpec`] magnitude constrains a child's reported size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MeasureKind {
    /// The child may be any size up to the magnitude.
    AtMost,
    /// The child must be exactly the magnitude.
    Exactly,
    /// The child may be any size; the magnitude is ignored.
    Unspecified,
}

/// A sizing constraint passed to a child on one axis: a resolution rule plus
/// a magnitude.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct MeasureSpec {
    /// The resolution rule.
    pub kind: MeasureKind,
    /// The constraint magnitude, in cells.
    pub size: u32,
}

impl MeasureSpec {
    /// A constraint that forces the child to exactly `size`.
    pub fn exactly(size: u32) -> Self {
        Self {
            kind: MeasureKind::Exactly,
            size,
        }
    }

    /// A constraint that caps the child at `size`.
    pub fn at_most(size: u32) -> Self {
        Self {
            kind: MeasureKind::AtMost,
            size,
        }
    }

    /// No constraint; the child reports its natural size.
    pub fn unspecified() -> Self {
        Self {
            kind: MeasureKind::Unspecified,
            size: 0,
        }
    }

    /// Resolve a desired dimension against this constraint.
    pub fn resolve(&self, desired: u32) -> u32 {
        match self.kind {
            MeasureKind::AtMost => self.size.min(desired),
            MeasureKind::Exactly => self.size,
            MeasureKind::Unspecified => desired,
        }
    }

    /// The largest dimension this constraint permits, [`UNBOUNDED`] when
    /// unconstrained.
    pub fn budget(&self) -> u32 {
        self.resolve(UNBOUNDED)
    }

    /// The same kind with the magnitude reduced, saturating at zero.
    pub fn shrink(&self, n: u32) -> Self {
        Self {
            kind: self.kind,
            size: self.size.saturating_sub(n),
        }
    }

    /// The same kind with the magnitude increased.
    pub fn grow(&self, n: u32) -> Self {
        Self {
            kind: self.kind,
            size: self.size.saturating_add(n),
        }
    }

    /// Resolve a full desired size against a pair of constraints.
    pub fn resolve_pair(cols: Self, rows: Self, desired: Expanse) -> Expanse {
        Expanse::new(cols.resolve(desired.w), rows.resolve(desired.h))
    }
}

/// A child's own sizing intent on one axis, used to interpret the incoming
/// parent constraint.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum SizeSpec {
    /// Shrink to content. Degrades the parent's constraint to
    /// [`MeasureKind::AtMost`] unless the parent is unspecified.
    #[default]
    Wrap,
    /// Take whatever the parent offers; the parent constraint passes through
    /// unchanged.
    Fill,
    /// A fixed size, capped by the parent's budget when the parent is
    /// bounded.
    Specified(u32),
}

impl SizeSpec {
    /// Derive the constraint a child should be measured with, given the
    /// constraint its parent was handed. Pure and total.
    pub fn for_child(&self, parent: MeasureSpec) -> MeasureSpec {
        match *self {
            Self::Wrap => MeasureSpec {
                kind: if parent.kind == MeasureKind::Unspecified {
                    MeasureKind::Unspecified
                } else {
                    MeasureKind::AtMost
                },
                size: parent.size,
            },
            Self::Fill => parent,
            Self::Specified(n) => match parent.kind {
                MeasureKind::Unspecified => MeasureSpec::exactly(n),
                _ => MeasureSpec::exactly(n.min(parent.size)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolve() {
        assert_eq!(MeasureSpec::at_most(10).resolve(4), 4);
        assert_eq!(MeasureSpec::at_most(10).resolve(40), 10);
        assert_eq!(MeasureSpec::exactly(10).resolve(4), 10);
        assert_eq!(MeasureSpec::unspecified().resolve(4), 4);
    }

    #[test]
    fn shrink_saturates() {
        let spec = MeasureSpec::exactly(3).shrink(5);
        assert_eq!(spec, MeasureSpec::exactly(0));
        assert_eq!(MeasureSpec::at_most(UNBOUNDED).shrink(2).budget(), UNBOUNDED - 2);
    }

    #[test]
    fn wrap_degrades_to_at_most() {
        let spec = SizeSpec::Wrap.for_child(MeasureSpec::exactly(12));
        assert_eq!(spec, MeasureSpec::at_most(12));
        let spec = SizeSpec::Wrap.for_child(MeasureSpec::unspecified());
        assert_eq!(spec.kind, MeasureKind::Unspecified);
    }

    #[test]
    fn fill_passes_through() {
        for parent in [
            MeasureSpec::exactly(7),
            MeasureSpec::at_most(7),
            MeasureSpec::unspecified(),
        ] {
            assert_eq!(SizeSpec::Fill.for_child(parent), parent);
        }
    }

    #[test]
    fn specified_caps_at_parent_budget() {
        assert_eq!(
            SizeSpec::Specified(20).for_child(MeasureSpec::at_most(8)),
            MeasureSpec::exactly(8)
        );
        assert_eq!(
            SizeSpec::Specified(5).for_child(MeasureSpec::exactly(8)),
            MeasureSpec::exactly(5)
        );
        assert_eq!(
            SizeSpec::Specified(20).for_child(MeasureSpec::unspecified()),
            MeasureSpec::exactly(20)
        );
    }

    proptest! {
        #[test]
        fn at_most_never_exceeds(size in 0u32..1000, desired in 0u32..1000) {
            prop_assert!(MeasureSpec::at_most(size).resolve(desired) <= size);
        }

        #[test]
        fn exactly_is_exact(size in 0u32..1000, desired in 0u32..1000) {
            prop_assert_eq!(MeasureSpec::exactly(size).resolve(desired), size);
        }

        #[test]
        fn for_child_is_total(size in 0u32..1000, fixed in 0u32..1000) {
            for spec in [SizeSpec::Wrap, SizeSpec::Fill, SizeSpec::Specified(fixed)] {
                for parent in [
                    MeasureSpec::exactly(size),
                    MeasureSpec::at_most(size),
                    MeasureSpec::unspecified(),
                ] {
                    // Never panics, and the derived budget never exceeds a
                    // bounded parent's own budget for Wrap/Fill.
                    let child = spec.for_child(parent);
                    if parent.kind != MeasureKind::Unspecified
                        && !matches!(spec, SizeSpec::Specified(_))
                    {
                        prop_assert!(child.budget() <= parent.budget());
                    }
                }
            }
        }
    }
}
