//! Measurement and layout dispatch, dirty tracking, and root detection.
//!
//! A manager's dirty flag is a small state machine: Clean moves to Dirty on
//! `request_layout`, a child-set change, or an area change; Dirty moves back
//! to Clean only when a layout pass actually runs over the container. The
//! renderer drives passes through [`LayoutTree::do_layout`], which only does
//! work on the manager recognized as the current layout root.

use geom::{Expanse, Padding, Point};
use tracing::trace;

use crate::error::{Error, Result};
use crate::measure::MeasureSpec;
use crate::tree::{Arrangement, LastMeasure, LayoutTree, ManagerState, NodeKind, Role, WidgetId};
use crate::{frame, grid, linear, scroll};

impl LayoutTree {
    /// The role a node was attached with.
    pub fn kind(&self, id: WidgetId) -> Result<NodeKind> {
        Ok(match &self.entry(id)?.role {
            Role::Leaf => NodeKind::Leaf,
            Role::Compat => NodeKind::Compat,
            Role::Border => NodeKind::Border,
            Role::Scroll(_) => NodeKind::Scroll,
            Role::Container(m) => NodeKind::Container(m.arrangement),
        })
    }

    /// Measure a node against a pair of constraints. Pure given the current
    /// tree state: repeated calls with the same constraints and no
    /// intervening mutation return the same size.
    pub fn measure(&mut self, id: WidgetId, cols: MeasureSpec, rows: MeasureSpec) -> Result<Expanse> {
        let result = match self.kind(id)? {
            NodeKind::Leaf | NodeKind::Compat => {
                let pref = self.entry(id)?.widget.preferred_size();
                MeasureSpec::resolve_pair(cols, rows, pref)
            }
            NodeKind::Border => match self.entry(id)?.children.first().copied() {
                Some(c) => {
                    let inner = self.measure(c, cols.shrink(2), rows.shrink(2))?;
                    Expanse::new(inner.w.saturating_add(2), inner.h.saturating_add(2))
                }
                None => MeasureSpec::resolve_pair(cols, rows, Expanse::default()),
            },
            NodeKind::Scroll => scroll::measure(self, id, cols, rows)?,
            NodeKind::Container(a) => {
                self.check_children(id)?;
                match a {
                    Arrangement::Horizontal => {
                        linear::measure(self, id, linear::Axis::Horizontal, cols, rows)?
                    }
                    Arrangement::Vertical => {
                        linear::measure(self, id, linear::Axis::Vertical, cols, rows)?
                    }
                    Arrangement::Grid { .. } => grid::measure(self, id, cols, rows)?,
                    Arrangement::Frame => frame::measure(self, id, cols, rows)?,
                }
            }
        };
        self.entry_mut(id)?.last_measure = Some(LastMeasure { cols, rows, result });
        Ok(result)
    }

    /// Commit a node's final geometry. Containers that are dirty run their
    /// arrangement pass over the new area and go clean.
    pub fn layout(&mut self, id: WidgetId, size: Expanse, pos: Point) -> Result<()> {
        {
            let e = self.entry_mut(id)?;
            e.size = size;
            e.position = pos;
        }
        match self.kind(id)? {
            NodeKind::Leaf | NodeKind::Compat => Ok(()),
            NodeKind::Border => match self.entry(id)?.children.first().copied() {
                Some(c) => {
                    let inner = Expanse::new(size.w.saturating_sub(2), size.h.saturating_sub(2));
                    self.layout(c, inner, Point::new(1, 1))
                }
                None => Ok(()),
            },
            NodeKind::Scroll => scroll::layout(self, id, size),
            NodeKind::Container(a) => {
                self.check_children(id)?;
                self.check_area(id, size)?;
                if self.manager_state(id)?.needs_layout {
                    self.arrange(id, a, size)?;
                    self.manager_state_mut(id)?.needs_layout = false;
                }
                Ok(())
            }
        }
    }

    /// Mark a node as needing layout. This is a flag set, not a pass: dirty
    /// managers no-op, root managers taint themselves for repaint, and
    /// everything else escalates to the nearest ancestor manager.
    pub fn request_layout(&mut self, id: WidgetId) -> Result<()> {
        let is_manager = if let Role::Container(m) = &mut self.entry_mut(id)?.role {
            if m.needs_layout {
                return Ok(());
            }
            m.needs_layout = true;
            if let Some(g) = m.grid.as_mut() {
                g.invalidate();
            }
            true
        } else {
            false
        };
        if is_manager && self.is_layout_root(id)? {
            return self.taint(id);
        }
        self.escalate(id)
    }

    /// Pass an invalidation to the nearest ancestor manager. Compat wrappers
    /// bound the walk the same way they bound root detection: a node they
    /// own is laid out externally, so it taints itself instead of dirtying a
    /// manager that will never place it.
    fn escalate(&mut self, id: WidgetId) -> Result<()> {
        let mut cur = self.entry(id)?.parent;
        while let Some(p) = cur {
            if matches!(self.entry(p)?.role, Role::Container(_)) {
                return self.request_layout(p);
            }
            if matches!(self.entry(p)?.role, Role::Compat) {
                break;
            }
            cur = self.entry(p)?.parent;
        }
        self.taint(id)
    }

    /// Renderer entry point: lay out a node in the given area. Non-root
    /// managers refresh their change detection but perform no work; a dirty
    /// root runs its arrangement pass and goes clean.
    pub fn do_layout(&mut self, id: WidgetId, area: Expanse) -> Result<()> {
        match self.kind(id)? {
            NodeKind::Container(a) => {
                self.check_children(id)?;
                self.check_area(id, area)?;
                if !self.is_layout_root(id)? {
                    return Ok(());
                }
                self.entry_mut(id)?.size = area;
                if self.manager_state(id)?.needs_layout {
                    self.arrange(id, a, area)?;
                    self.manager_state_mut(id)?.needs_layout = false;
                }
                Ok(())
            }
            _ => {
                let pos = self.entry(id)?.position;
                self.layout(id, area, pos)
            }
        }
    }

    fn arrange(&mut self, id: WidgetId, a: Arrangement, area: Expanse) -> Result<()> {
        trace!(node = %self.debug_string(id)?, ?area, "layout pass");
        match a {
            Arrangement::Horizontal => linear::layout(self, id, linear::Axis::Horizontal, area),
            Arrangement::Vertical => linear::layout(self, id, linear::Axis::Vertical, area),
            Arrangement::Grid { .. } => grid::layout(self, id, area),
            Arrangement::Frame => frame::layout(self, id, area),
        }
    }

    /// Is this manager the authoritative root for a layout pass? True when
    /// its nearest dynamic-layout ancestor is a pass-through compat wrapper,
    /// or when it has no ancestor at all.
    pub fn is_layout_root(&self, id: WidgetId) -> Result<bool> {
        let mut cur = self.entry(id)?.parent;
        while let Some(p) = cur {
            match self.entry(p)?.role {
                Role::Compat => return Ok(true),
                Role::Leaf => cur = self.entry(p)?.parent,
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Does this manager have a pending layout pass? Always false for
    /// non-containers.
    pub fn is_dirty(&self, id: WidgetId) -> Result<bool> {
        Ok(match &self.entry(id)?.role {
            Role::Container(m) => m.needs_layout,
            _ => false,
        })
    }

    /// A container's preferred size, measured against at-most-screen
    /// constraints to avoid unbounded growth, and cached until the child set
    /// changes.
    pub fn preferred_size(&mut self, id: WidgetId) -> Result<Expanse> {
        let screen = self.screen();
        let cols = MeasureSpec::at_most(screen.w);
        let rows = MeasureSpec::at_most(screen.h);
        if matches!(self.entry(id)?.role, Role::Container(_)) {
            self.check_children(id)?;
            if let Some(p) = self.manager_state(id)?.cached_preferred {
                return Ok(p);
            }
            let size = self.measure(id, cols, rows)?;
            self.manager_state_mut(id)?.cached_preferred = Some(size);
            Ok(size)
        } else {
            self.measure(id, cols, rows)
        }
    }

    /// A container's padding.
    pub fn padding(&self, id: WidgetId) -> Result<Padding> {
        Ok(self.manager_state(id)?.padding)
    }

    /// Set a container's padding and invalidate it.
    pub fn set_padding(&mut self, id: WidgetId, padding: Padding) -> Result<()> {
        self.manager_state_mut(id)?.padding = padding;
        self.request_layout(id)
    }

    /// Change a grid's column count, regrouping its children.
    pub fn set_grid_cols(&mut self, id: WidgetId, cols: u32) -> Result<()> {
        let children = self.entry(id)?.children.clone();
        let state = self.manager_state_mut(id)?;
        match &mut state.arrangement {
            Arrangement::Grid { cols: c } if *c == cols => return Ok(()),
            Arrangement::Grid { cols: c } => *c = cols,
            _ => {
                return Err(Error::Configuration(
                    "set_grid_cols on a non-grid container".into(),
                ));
            }
        }
        grid::regroup(state, cols, &children);
        state.cached_preferred = None;
        self.request_layout(id)
    }

    /// Renderer passthrough: the configured fill-style override, if any.
    pub fn fill_style(&self, id: WidgetId) -> Result<Option<&str>> {
        Ok(self.manager_state(id)?.fill_style.as_deref())
    }

    /// Renderer passthrough: override the style used to fill unused space.
    /// `None` reverts to the theme. Not consulted by the engine.
    pub fn set_fill_style(&mut self, id: WidgetId, style: Option<String>) -> Result<()> {
        self.manager_state_mut(id)?.fill_style = style;
        self.taint(id)
    }

    /// Refresh a container's memoized child snapshot, invalidating derived
    /// caches when the child set has changed.
    pub(crate) fn check_children(&mut self, id: WidgetId) -> Result<()> {
        let children = self.entry(id)?.children.clone();
        let state = self.manager_state_mut(id)?;
        if state.snapshot != children {
            state.snapshot.clone_from(&children);
            state.cached_preferred = None;
            state.needs_layout = true;
            if let Arrangement::Grid { cols } = state.arrangement {
                grid::regroup(state, cols, &children);
            }
        }
        Ok(())
    }

    fn check_area(&mut self, id: WidgetId, area: Expanse) -> Result<()> {
        let state = self.manager_state_mut(id)?;
        if state.last_area != area {
            state.last_area = area;
            state.needs_layout = true;
        }
        Ok(())
    }

    pub(crate) fn manager_state(&self, id: WidgetId) -> Result<&ManagerState> {
        match &self.entry(id)?.role {
            Role::Container(m) => Ok(m),
            r => Err(Error::Configuration(format!(
                "{} node is not a layout manager",
                r.name()
            ))),
        }
    }

    pub(crate) fn manager_state_mut(&mut self, id: WidgetId) -> Result<&mut ManagerState> {
        match &mut self.entry_mut(id)?.role {
            Role::Container(m) => Ok(m),
            r => Err(Error::Configuration(format!(
                "{} node is not a layout manager",
                r.name()
            ))),
        }
    }
}
