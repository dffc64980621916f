//! The widget arena: one layout node per attached widget, keyed by a stable
//! handle.
//!
//! The tree owns its widgets outright. A node's role is classified once at
//! attach time and never re-derived during a pass; detaching a widget drops
//! its whole subtree's arena entries and every cache referencing them.

use geom::{Expanse, Padding, Point, Rect};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::grid::GridCache;
use crate::measure::MeasureSpec;
use crate::params::LayoutParams;
use crate::surface::Surface;

slotmap::new_key_type! {
    /// Stable handle to a widget attached to a [`LayoutTree`].
    pub struct WidgetId;
}

/// The collaborator-facing widget surface. The engine sizes and positions
/// widgets; drawing glyphs from the committed geometry is the renderer's
/// job.
pub trait Widget {
    /// Short name used in diagnostics.
    fn name(&self) -> &str {
        "widget"
    }

    /// The widget's natural content size, used when it is measured without
    /// an exact constraint.
    fn preferred_size(&self) -> Expanse;

    /// Draw into a region of the surface. Invoked by the external renderer,
    /// never by the engine itself.
    fn draw(&mut self, _surface: &mut dyn Surface, _region: Rect) {}
}

/// The child-arrangement strategy of a container, selected at construction.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Arrangement {
    /// Stack children left to right with weighted redistribution.
    Horizontal,
    /// Stack children top to bottom with weighted redistribution.
    Vertical,
    /// Arrange children row-major into a fixed number of columns, with
    /// border lines between cells.
    Grid {
        /// Number of columns.
        cols: u32,
    },
    /// Overlay children in shared space, placed by gravity.
    Frame,
}

/// How a widget participates in layout, fixed when it is attached.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum NodeKind {
    /// A plain widget with no children; measured by its preferred size.
    Leaf,
    /// A pass-through container laid out by an external system. Bounds root
    /// detection: a manager directly inside one is its own layout root.
    Compat,
    /// A single-child wrapper that reserves a one-cell border on every edge.
    Border,
    /// A single-child virtual viewport with a vertical scroll offset.
    Scroll,
    /// A container laid out by one of the [`Arrangement`] strategies.
    Container(Arrangement),
}

/// Scroll bookkeeping for a [`NodeKind::Scroll`] node.
#[derive(Debug, Default)]
pub(crate) struct ScrollState {
    /// Current viewport offset on the scroll axis.
    pub(crate) offset: u32,
    /// Offset at the time of the last consumed redraw plan.
    pub(crate) last_drawn: u32,
    /// A structural change happened since the last plan; the next redraw
    /// must be a full repaint.
    pub(crate) full: bool,
}

/// Dirty-tracking and cache state shared by all container arrangements.
#[derive(Debug)]
pub(crate) struct ManagerState {
    /// The arrangement strategy.
    pub(crate) arrangement: Arrangement,
    /// Padding subtracted from the area before children are measured.
    pub(crate) padding: Padding,
    /// True after construction, `request_layout`, or a detected child-set or
    /// area change; false only after a completed root-level pass.
    pub(crate) needs_layout: bool,
    /// Memoized child list, compared against the live list to detect
    /// structural mutation.
    pub(crate) snapshot: Vec<WidgetId>,
    /// Cached preferred size, invalidated when the child set changes.
    pub(crate) cached_preferred: Option<Expanse>,
    /// The area of the last layout pass.
    pub(crate) last_area: Expanse,
    /// Renderer passthrough: style to fill unused space with, overriding the
    /// theme. Not consulted by the engine.
    pub(crate) fill_style: Option<String>,
    /// Grid-only caches: row/column groupings and the track table.
    pub(crate) grid: Option<GridCache>,
}

impl ManagerState {
    pub(crate) fn new(arrangement: Arrangement) -> Self {
        let grid = matches!(arrangement, Arrangement::Grid { .. }).then(GridCache::default);
        Self {
            arrangement,
            padding: Padding::default(),
            needs_layout: true,
            snapshot: Vec::new(),
            cached_preferred: None,
            last_area: Expanse::default(),
            fill_style: None,
            grid,
        }
    }
}

/// Internal role state backing a [`NodeKind`].
#[derive(Debug)]
pub(crate) enum Role {
    Leaf,
    Compat,
    Border,
    Scroll(ScrollState),
    Container(ManagerState),
}

impl Role {
    fn new(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Leaf => Self::Leaf,
            NodeKind::Compat => Self::Compat,
            NodeKind::Border => Self::Border,
            NodeKind::Scroll => Self::Scroll(ScrollState::default()),
            NodeKind::Container(a) => Self::Container(ManagerState::new(a)),
        }
    }

    /// Name for diagnostics.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::Compat => "compat",
            Self::Border => "border",
            Self::Scroll(_) => "scroll",
            Self::Container(m) => match m.arrangement {
                Arrangement::Horizontal => "horizontal",
                Arrangement::Vertical => "vertical",
                Arrangement::Grid { .. } => "grid",
                Arrangement::Frame => "frame",
            },
        }
    }

    /// Can this node host the given number of children?
    fn capacity(&self) -> usize {
        match self {
            Self::Leaf => 0,
            Self::Border | Self::Scroll(_) => 1,
            Self::Compat | Self::Container(_) => usize::MAX,
        }
    }
}

/// The constraints and result of a node's most recent measurement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LastMeasure {
    pub(crate) cols: MeasureSpec,
    pub(crate) rows: MeasureSpec,
    pub(crate) result: Expanse,
}

/// One arena entry: a widget plus its layout-node state.
pub(crate) struct NodeEntry {
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) parent: Option<WidgetId>,
    /// Insertion order is paint and traversal order.
    pub(crate) children: Vec<WidgetId>,
    pub(crate) params: LayoutParams,
    pub(crate) role: Role,
    /// Committed size, read by the renderer.
    pub(crate) size: Expanse,
    /// Committed position in the parent's space, read by the renderer.
    pub(crate) position: Point,
    pub(crate) last_measure: Option<LastMeasure>,
    /// Needs repaint.
    pub(crate) tainted: bool,
}

/// The layout engine context: the widget arena, the current root, and the
/// screen size used to bound preferred-size measurement. One tree is scoped
/// to one screen/session and torn down with it.
pub struct LayoutTree {
    pub(crate) nodes: SlotMap<WidgetId, NodeEntry>,
    root: Option<WidgetId>,
    screen: Expanse,
}

impl LayoutTree {
    /// Create an engine for a terminal of the given size.
    pub fn new(screen: Expanse) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            screen,
        }
    }

    /// The screen size used to bound preferred-size measurement.
    pub fn screen(&self) -> Expanse {
        self.screen
    }

    /// Update the screen size after a terminal resize.
    pub fn set_screen(&mut self, screen: Expanse) {
        self.screen = screen;
    }

    /// The current root widget, if any.
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    pub(crate) fn entry(&self, id: WidgetId) -> Result<&NodeEntry> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::Configuration(format!("stale widget handle {id:?}")))
    }

    pub(crate) fn entry_mut(&mut self, id: WidgetId) -> Result<&mut NodeEntry> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::Configuration(format!("stale widget handle {id:?}")))
    }

    /// Attach a widget as the tree root.
    pub fn attach_root(&mut self, widget: Box<dyn Widget>, kind: NodeKind) -> Result<WidgetId> {
        if self.root.is_some() {
            return Err(Error::Configuration("tree already has a root".into()));
        }
        let id = self.insert(widget, None, kind, LayoutParams::default());
        self.root = Some(id);
        Ok(id)
    }

    /// Attach a widget under a parent. The role is fixed for the widget's
    /// attached lifetime.
    pub fn attach(
        &mut self,
        parent: WidgetId,
        widget: Box<dyn Widget>,
        kind: NodeKind,
        params: LayoutParams,
    ) -> Result<WidgetId> {
        let entry = self.entry(parent)?;
        let capacity = entry.role.capacity();
        if entry.children.len() >= capacity {
            return Err(Error::Configuration(format!(
                "{} node cannot hold another child",
                entry.role.name()
            )));
        }
        let id = self.insert(widget, Some(parent), kind, params);
        self.entry_mut(parent)?.children.push(id);
        self.request_layout(parent)?;
        Ok(id)
    }

    fn insert(
        &mut self,
        widget: Box<dyn Widget>,
        parent: Option<WidgetId>,
        kind: NodeKind,
        params: LayoutParams,
    ) -> WidgetId {
        self.nodes.insert(NodeEntry {
            widget,
            parent,
            children: Vec::new(),
            params,
            role: Role::new(kind),
            size: Expanse::default(),
            position: Point::zero(),
            last_measure: None,
            tainted: true,
        })
    }

    /// Detach a widget, dropping the arena entries for its entire subtree.
    /// Returns the detached widget itself.
    pub fn detach(&mut self, id: WidgetId) -> Result<Box<dyn Widget>> {
        let parent = self.entry(id)?.parent;
        if let Some(p) = parent {
            let siblings = &mut self.entry_mut(p)?.children;
            siblings.retain(|c| *c != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let mut stack = self.entry(id)?.children.clone();
        while let Some(c) = stack.pop() {
            if let Some(e) = self.nodes.remove(c) {
                stack.extend(e.children);
            }
        }
        let entry = self
            .nodes
            .remove(id)
            .ok_or_else(|| Error::Configuration(format!("stale widget handle {id:?}")))?;
        if let Some(p) = parent {
            self.request_layout(p)?;
        }
        Ok(entry.widget)
    }

    /// The ordered children of a node.
    pub fn children(&self, id: WidgetId) -> Result<&[WidgetId]> {
        Ok(&self.entry(id)?.children)
    }

    /// A node's parent, if it has one.
    pub fn parent(&self, id: WidgetId) -> Result<Option<WidgetId>> {
        Ok(self.entry(id)?.parent)
    }

    /// A node's layout parameters.
    pub fn params(&self, id: WidgetId) -> Result<LayoutParams> {
        Ok(self.entry(id)?.params)
    }

    /// Replace a node's layout parameters and invalidate the owning manager.
    pub fn set_params(&mut self, id: WidgetId, params: LayoutParams) -> Result<()> {
        let entry = self.entry_mut(id)?;
        if entry.params == params {
            return Ok(());
        }
        entry.params = params;
        match entry.parent {
            Some(p) => self.request_layout(p),
            None => self.request_layout(id),
        }
    }

    /// Borrow the widget behind a handle.
    pub fn widget(&self, id: WidgetId) -> Result<&dyn Widget> {
        Ok(self.entry(id)?.widget.as_ref())
    }

    /// Mutably borrow the widget behind a handle.
    pub fn widget_mut(&mut self, id: WidgetId) -> Result<&mut dyn Widget> {
        Ok(self.entry_mut(id)?.widget.as_mut())
    }

    /// The committed size of a node.
    pub fn size_of(&self, id: WidgetId) -> Result<Expanse> {
        Ok(self.entry(id)?.size)
    }

    /// The committed position of a node in its parent's space.
    pub fn position_of(&self, id: WidgetId) -> Result<Point> {
        Ok(self.entry(id)?.position)
    }

    /// The committed geometry of a node as a rect in its parent's space.
    pub fn rect_of(&self, id: WidgetId) -> Result<Rect> {
        let e = self.entry(id)?;
        Ok(e.size.rect().at(e.position))
    }

    /// Translate a point in a node's local space to global coordinates.
    /// Scroll offsets apply here, at translation time; they are never part
    /// of a child's committed geometry.
    pub fn to_global(&self, id: WidgetId, p: Point) -> Result<Point> {
        let mut p = p;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let e = self.entry(c)?;
            if let Role::Scroll(s) = &e.role {
                p = p.shift(0, -(s.offset.min(i32::MAX as u32) as i32));
            }
            p = p + e.position;
            cur = e.parent;
        }
        Ok(p)
    }

    /// Does this node need repainting?
    pub fn is_tainted(&self, id: WidgetId) -> Result<bool> {
        Ok(self.entry(id)?.tainted)
    }

    /// Clear the repaint flag after the renderer has drawn the node.
    pub fn clear_taint(&mut self, id: WidgetId) -> Result<()> {
        self.entry_mut(id)?.tainted = false;
        Ok(())
    }

    pub(crate) fn taint(&mut self, id: WidgetId) -> Result<()> {
        self.entry_mut(id)?.tainted = true;
        Ok(())
    }

    /// A one-line description of a node: role, widget name, dirty state and
    /// last computed geometry. Diagnostics only.
    pub fn debug_string(&self, id: WidgetId) -> Result<String> {
        let e = self.entry(id)?;
        let dirty = match &e.role {
            Role::Container(m) => m.needs_layout,
            _ => false,
        };
        let last = match &e.last_measure {
            Some(m) => format!(
                "{:?}({})x{:?}({}) -> {}x{}",
                m.cols.kind, m.cols.size, m.rows.kind, m.rows.size, m.result.w, m.result.h
            ),
            None => "unmeasured".into(),
        };
        Ok(format!(
            "{}: {} ({}, {}) {}x{} dirty={} last=[{}]",
            e.role.name(),
            e.widget.name(),
            e.position.x,
            e.position.y,
            e.size.w,
            e.size.h,
            dirty,
            last
        ))
    }

    /// An indented dump of the subtree rooted at `id`. Diagnostics only.
    pub fn dump(&self, id: WidgetId) -> Result<String> {
        let mut out = String::new();
        self.dump_node(id, 0, &mut out)?;
        Ok(out)
    }

    fn dump_node(&self, id: WidgetId, level: usize, out: &mut String) -> Result<()> {
        out.push_str(&"    ".repeat(level));
        out.push_str(&self.debug_string(id)?);
        out.push('\n');
        for c in self.entry(id)?.children.clone() {
            self.dump_node(c, level + 1, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutils::Block;

    #[test]
    fn attach_and_detach() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Vertical),
        )?;
        let a = t.attach(
            root,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        let b = t.attach(
            root,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        assert_eq!(t.children(root)?, &[a, b]);
        assert_eq!(t.parent(a)?, Some(root));

        t.detach(a)?;
        assert_eq!(t.children(root)?, &[b]);
        assert!(t.widget(a).is_err());
        Ok(())
    }

    #[test]
    fn detach_drops_subtree() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Vertical),
        )?;
        let inner = t.attach(
            root,
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Horizontal),
            LayoutParams::default(),
        )?;
        let leaf = t.attach(
            inner,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;

        t.detach(inner)?;
        assert!(t.widget(inner).is_err());
        assert!(t.widget(leaf).is_err());
        assert_eq!(t.children(root)?, &[] as &[WidgetId]);
        Ok(())
    }

    #[test]
    fn leaf_rejects_children() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(Box::new(Block::sized(5, 1)), NodeKind::Leaf)?;
        let r = t.attach(
            root,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        );
        assert!(matches!(r, Err(Error::Configuration(_))));
        Ok(())
    }

    #[test]
    fn single_child_wrappers_reject_second_child() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(Box::new(Block::sized(0, 0)), NodeKind::Scroll)?;
        t.attach(
            root,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        let r = t.attach(
            root,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        );
        assert!(matches!(r, Err(Error::Configuration(_))));
        Ok(())
    }

    #[test]
    fn dump_is_indented() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Vertical),
        )?;
        t.attach(
            root,
            Box::new(Block::sized(5, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        let dump = t.dump(root)?;
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("vertical: "));
        assert!(lines[1].starts_with("    leaf: "));
        Ok(())
    }
}
