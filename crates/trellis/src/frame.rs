//! Overlay arrangement: children share the container's space and are placed
//! independently by their gravity anchors.

use geom::{Expanse, Point};

use crate::error::Result;
use crate::measure::MeasureSpec;
use crate::tree::{LayoutTree, WidgetId};

pub(crate) fn measure(
    tree: &mut LayoutTree,
    id: WidgetId,
    cols: MeasureSpec,
    rows: MeasureSpec,
) -> Result<Expanse> {
    let padding = tree.manager_state(id)?.padding;
    let children = tree.entry(id)?.children.clone();
    let child_cols = cols.shrink(padding.horizontal());
    let child_rows = rows.shrink(padding.vertical());
    let mut max = Expanse::default();
    for c in children {
        let params = tree.params(c)?;
        let size = tree.measure(
            c,
            params.cols.for_child(child_cols),
            params.rows.for_child(child_rows),
        )?;
        max = Expanse::new(max.w.max(size.w), max.h.max(size.h));
    }
    Ok(Expanse::new(
        cols.resolve(max.w + padding.horizontal()),
        rows.resolve(max.h + padding.vertical()),
    ))
}

pub(crate) fn layout(tree: &mut LayoutTree, id: WidgetId, area: Expanse) -> Result<()> {
    let padding = tree.manager_state(id)?.padding;
    let children = tree.entry(id)?.children.clone();
    let content = padding.shrink(area);
    for c in children {
        let params = tree.params(c)?;
        let size = tree.measure(
            c,
            params.cols.for_child(MeasureSpec::exactly(content.w)),
            params.rows.for_child(MeasureSpec::exactly(content.h)),
        )?;
        let pos = padding.offset(Point::new(
            params.gravity.horizontal().space(size.w, content.w),
            params.gravity.vertical().space(size.h, content.h),
        ));
        tree.layout(c, size, pos)?;
    }
    Ok(())
}
