//! Virtual viewport with a vertical scroll offset.
//!
//! The child is measured without a row constraint and laid out at its
//! natural height at the origin; the offset is applied only when local
//! coordinates are translated to global space, never to the child's
//! committed geometry. Consumers poll [`LayoutTree::redraw_plan`] after
//! scrolling so that a pure offset change can be repainted by shifting
//! lines instead of redrawing everything.

use geom::{Expanse, Point};

use crate::error::{Error, Result};
use crate::measure::MeasureSpec;
use crate::tree::{LayoutTree, Role, ScrollState, WidgetId};

/// The cheapest correct repaint after a scroll state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawPlan {
    /// Structural or size change: repaint the whole viewport.
    Full,
    /// The offset moved by this many lines since the last consumed plan;
    /// positive scrolls content up. Shift the overlap and paint the exposed
    /// strip.
    Lines(i32),
    /// Nothing changed.
    Unchanged,
}

pub(crate) fn measure(
    tree: &mut LayoutTree,
    id: WidgetId,
    cols: MeasureSpec,
    rows: MeasureSpec,
) -> Result<Expanse> {
    match tree.entry(id)?.children.first().copied() {
        Some(c) => {
            let child = tree.measure(c, cols, MeasureSpec::unspecified())?;
            Ok(Expanse::new(cols.resolve(child.w), rows.resolve(child.h)))
        }
        None => Ok(MeasureSpec::resolve_pair(cols, rows, Expanse::default())),
    }
}

pub(crate) fn layout(tree: &mut LayoutTree, id: WidgetId, area: Expanse) -> Result<()> {
    if let Some(c) = tree.entry(id)?.children.first().copied() {
        let natural = tree.measure(c, MeasureSpec::exactly(area.w), MeasureSpec::unspecified())?;
        tree.layout(c, natural, Point::zero())?;
    }
    // Geometry moved under the viewport, so the next plan is a full repaint
    // and the offset may have fallen out of range.
    let max = max_offset(tree, id)?;
    let state = scroll_state_mut(tree, id)?;
    state.full = true;
    state.offset = state.offset.min(max);
    Ok(())
}

/// The largest valid offset: child extent minus viewport height, or zero
/// when the content fits.
fn max_offset(tree: &LayoutTree, id: WidgetId) -> Result<u32> {
    let viewport = tree.entry(id)?.size.h;
    let extent = match tree.entry(id)?.children.first().copied() {
        Some(c) => {
            let e = tree.entry(c)?;
            e.position.y + e.size.h
        }
        None => 0,
    };
    Ok(extent.saturating_sub(viewport))
}

fn scroll_state(tree: &LayoutTree, id: WidgetId) -> Result<&ScrollState> {
    match &tree.entry(id)?.role {
        Role::Scroll(s) => Ok(s),
        r => Err(Error::Configuration(format!(
            "{} node is not a scroll viewport",
            r.name()
        ))),
    }
}

fn scroll_state_mut(tree: &mut LayoutTree, id: WidgetId) -> Result<&mut ScrollState> {
    match &mut tree.entry_mut(id)?.role {
        Role::Scroll(s) => Ok(s),
        r => Err(Error::Configuration(format!(
            "{} node is not a scroll viewport",
            r.name()
        ))),
    }
}

impl LayoutTree {
    /// The current scroll offset of a viewport node.
    pub fn scroll_offset(&self, id: WidgetId) -> Result<u32> {
        Ok(scroll_state(self, id)?.offset)
    }

    /// Set a viewport's scroll offset, clamped to the scrollable range. A
    /// change taints the node for repaint; setting the current offset is a
    /// no-op.
    pub fn set_scroll_offset(&mut self, id: WidgetId, offset: u32) -> Result<()> {
        let clamped = offset.min(max_offset(self, id)?);
        let state = scroll_state_mut(self, id)?;
        if state.offset == clamped {
            return Ok(());
        }
        state.offset = clamped;
        self.taint(id)
    }

    /// Scroll by a signed number of lines, clamped to the scrollable range.
    pub fn scroll_by(&mut self, id: WidgetId, delta: i32) -> Result<()> {
        let current = scroll_state(self, id)?.offset;
        let target = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u32)
        };
        self.set_scroll_offset(id, target)
    }

    /// Consume the pending repaint work for a viewport. Each state change is
    /// reported once; a second call without intervening changes returns
    /// [`RedrawPlan::Unchanged`].
    pub fn redraw_plan(&mut self, id: WidgetId) -> Result<RedrawPlan> {
        let state = scroll_state_mut(self, id)?;
        if state.full {
            state.full = false;
            state.last_drawn = state.offset;
            return Ok(RedrawPlan::Full);
        }
        if state.offset != state.last_drawn {
            let delta = i64::from(state.offset) - i64::from(state.last_drawn);
            state.last_drawn = state.offset;
            return Ok(RedrawPlan::Lines(delta as i32));
        }
        Ok(RedrawPlan::Unchanged)
    }
}
