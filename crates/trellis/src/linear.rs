//! Linear stacking with two-pass weighted space redistribution.
//!
//! Pass one measures every child against the unweighted remaining space,
//! tracking a running position along the main axis. When the container's
//! main axis is fully determined and leftover space remains, pass two
//! re-measures each weighted child with an exact constraint grown by its
//! proportional share. The last weighted child absorbs the rounding residue,
//! so the final sizes of a weighted stack always sum to the container's
//! main-axis extent.

use geom::{Expanse, Padding, Point};

use crate::error::Result;
use crate::measure::{MeasureKind, MeasureSpec, SizeSpec};
use crate::params::{AxisGravity, LayoutParams};
use crate::tree::{LayoutTree, WidgetId};

/// The stacking direction of a linear manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub(crate) fn main(self, e: Expanse) -> u32 {
        match self {
            Self::Horizontal => e.w,
            Self::Vertical => e.h,
        }
    }

    pub(crate) fn cross(self, e: Expanse) -> u32 {
        match self {
            Self::Horizontal => e.h,
            Self::Vertical => e.w,
        }
    }

    fn expanse(self, main: u32, cross: u32) -> Expanse {
        match self {
            Self::Horizontal => Expanse::new(main, cross),
            Self::Vertical => Expanse::new(cross, main),
        }
    }

    fn point(self, main: u32, cross: u32) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    /// Split a (cols, rows) constraint pair into (main, cross).
    fn split(self, cols: MeasureSpec, rows: MeasureSpec) -> (MeasureSpec, MeasureSpec) {
        match self {
            Self::Horizontal => (cols, rows),
            Self::Vertical => (rows, cols),
        }
    }

    /// Join a (main, cross) constraint pair back into (cols, rows).
    fn join(self, main: MeasureSpec, cross: MeasureSpec) -> (MeasureSpec, MeasureSpec) {
        match self {
            Self::Horizontal => (main, cross),
            Self::Vertical => (cross, main),
        }
    }

    fn main_intent(self, p: &LayoutParams) -> SizeSpec {
        match self {
            Self::Horizontal => p.cols,
            Self::Vertical => p.rows,
        }
    }

    fn cross_intent(self, p: &LayoutParams) -> SizeSpec {
        match self {
            Self::Horizontal => p.rows,
            Self::Vertical => p.cols,
        }
    }

    fn cross_gravity(self, p: &LayoutParams) -> AxisGravity {
        match self {
            Self::Horizontal => p.gravity.vertical(),
            Self::Vertical => p.gravity.horizontal(),
        }
    }

    fn main_pad(self, p: Padding) -> u32 {
        match self {
            Self::Horizontal => p.horizontal(),
            Self::Vertical => p.vertical(),
        }
    }

    fn cross_pad(self, p: Padding) -> u32 {
        match self {
            Self::Horizontal => p.vertical(),
            Self::Vertical => p.horizontal(),
        }
    }
}

/// One child's first-pass result: measured size, running main-axis offset,
/// and its redistribution weight.
struct Measured {
    id: WidgetId,
    size: Expanse,
    pos: u32,
    weight: u32,
}

/// Pass one: measure children against the unweighted remaining space. The
/// constraints here are content constraints, already shrunk by padding.
fn measure_children(
    tree: &mut LayoutTree,
    children: &[WidgetId],
    axis: Axis,
    main: MeasureSpec,
    cross: MeasureSpec,
) -> Result<Vec<Measured>> {
    let budget = main.budget();
    let mut position = 0u32;
    let mut out = Vec::with_capacity(children.len());
    for &c in children {
        let params = tree.params(c)?;
        let child_main = axis
            .main_intent(&params)
            .for_child(MeasureSpec::at_most(budget.saturating_sub(position)));
        let child_cross = axis.cross_intent(&params).for_child(cross);
        let (cols, rows) = axis.join(child_main, child_cross);
        let size = tree.measure(c, cols, rows)?;
        out.push(Measured {
            id: c,
            size,
            pos: position,
            weight: params.weight,
        });
        position += axis.main(size);
    }
    Ok(out)
}

/// Pass two: grow each weighted child by its share of the leftover space and
/// recompute offsets. Children with zero weight keep their first-pass size.
fn second_measure(
    tree: &mut LayoutTree,
    axis: Axis,
    measured: &mut [Measured],
    total_weight: u32,
    leftover: u32,
) -> Result<()> {
    let last_weighted = measured.iter().rposition(|m| m.weight > 0);
    let mut granted = 0u32;
    let mut position = 0u32;
    for (i, m) in measured.iter_mut().enumerate() {
        if m.weight > 0 {
            let share = if Some(i) == last_weighted {
                leftover.saturating_sub(granted)
            } else {
                (f64::from(leftover) * f64::from(m.weight) / f64::from(total_weight)).round()
                    as u32
            };
            granted = granted.saturating_add(share);
            let (cols, rows) = axis.join(
                MeasureSpec::exactly(axis.main(m.size) + share),
                MeasureSpec::exactly(axis.cross(m.size)),
            );
            m.size = tree.measure(m.id, cols, rows)?;
        }
        m.pos = position;
        position += axis.main(m.size);
    }
    Ok(())
}

pub(crate) fn measure(
    tree: &mut LayoutTree,
    id: WidgetId,
    axis: Axis,
    cols: MeasureSpec,
    rows: MeasureSpec,
) -> Result<Expanse> {
    let padding = tree.manager_state(id)?.padding;
    let children = tree.entry(id)?.children.clone();
    let (main_spec, cross_spec) = axis.split(cols, rows);
    let content_main = main_spec.shrink(axis.main_pad(padding));
    let content_cross = cross_spec.shrink(axis.cross_pad(padding));
    let measured = measure_children(tree, &children, axis, content_main, content_cross)?;

    let total_weight: u32 = measured.iter().map(|m| m.weight).sum();
    let used = measured
        .last()
        .map(|m| m.pos + axis.main(m.size))
        .unwrap_or(0);
    let max_cross = measured.iter().map(|m| axis.cross(m.size)).max().unwrap_or(0);

    // With weights present the stack fills its main axis, so a bounded
    // constraint is taken whole; an unspecified one falls back to the
    // unweighted sum.
    let main = if total_weight > 0 && main_spec.kind != MeasureKind::Unspecified {
        main_spec.size
    } else {
        main_spec.resolve(used + axis.main_pad(padding))
    };
    let cross = cross_spec.resolve(max_cross + axis.cross_pad(padding));
    Ok(axis.expanse(main, cross))
}

pub(crate) fn layout(tree: &mut LayoutTree, id: WidgetId, axis: Axis, area: Expanse) -> Result<()> {
    let padding = tree.manager_state(id)?.padding;
    let children = tree.entry(id)?.children.clone();
    if children.is_empty() {
        return Ok(());
    }
    let content = padding.shrink(area);
    let mut measured = measure_children(
        tree,
        &children,
        axis,
        MeasureSpec::exactly(axis.main(content)),
        MeasureSpec::exactly(axis.cross(content)),
    )?;

    let total_weight: u32 = measured.iter().map(|m| m.weight).sum();
    let used = measured
        .last()
        .map(|m| m.pos + axis.main(m.size))
        .unwrap_or(0);
    let leftover = axis.main(content).saturating_sub(used);
    if leftover > 0 && total_weight > 0 {
        second_measure(tree, axis, &mut measured, total_weight, leftover)?;
    }

    for m in &measured {
        let params = tree.params(m.id)?;
        let cross_off = axis
            .cross_gravity(&params)
            .space(axis.cross(m.size), axis.cross(content));
        let pos = padding.offset(axis.point(m.pos, cross_off));
        tree.layout(m.id, m.size, pos)?;
    }
    Ok(())
}
