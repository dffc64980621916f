//! Grid arrangement: children flow row-major into a fixed number of columns,
//! with one-cell border lanes between and around the cells.
//!
//! Measurement is track-based and runs columns first: each column is sized by
//! its widest member against the remaining horizontal budget, then rows are
//! sized against the resolved column widths. The resulting track table is
//! cached keyed by area; both child placement and border drawing read from
//! it, so the border always reflects the committed layout.

use geom::{Expanse, Point};
use tracing::warn;

use crate::error::{Error, Result};
use crate::measure::{MeasureSpec, SizeSpec, UNBOUNDED};
use crate::surface::{BorderGlyphs, Surface};
use crate::tree::{LayoutTree, ManagerState, WidgetId};

/// Grid-only state hung off a container's [`ManagerState`]: the row/column
/// groupings, refreshed whenever the child set or column count changes, and
/// the memoized track table from the most recent measurement.
#[derive(Debug, Default)]
pub(crate) struct GridCache {
    pub(crate) rows: Vec<Vec<WidgetId>>,
    pub(crate) cols: Vec<Vec<WidgetId>>,
    measure: Option<(Expanse, GridMeasure)>,
}

impl GridCache {
    /// Drop the memoized track table. The table is keyed only by area, so
    /// any invalidation must clear it or a pass over an unchanged area would
    /// replay stale geometry.
    pub(crate) fn invalidate(&mut self) {
        self.measure = None;
    }
}

/// One measured row or column: its extent on the tracked axis, its offset
/// within the container, and the summed weight of its members.
#[derive(Debug, Clone)]
struct Track {
    size: u32,
    position: u32,
    weight: u32,
}

/// A measured row plus the per-cell sizes computed for it.
#[derive(Debug, Clone)]
struct RowTrack {
    track: Track,
    cells: Vec<Expanse>,
}

/// The full track table for one measurement pass.
#[derive(Debug, Clone, Default)]
struct GridMeasure {
    rows: Vec<RowTrack>,
    cols: Vec<Track>,
}

/// Rebuild the row/column groupings after a child-set or column-count
/// change. Row-major: row `i` holds children `i*cols..`, short last rows are
/// tolerated with a warning.
pub(crate) fn regroup(state: &mut ManagerState, cols: u32, children: &[WidgetId]) {
    let Some(cache) = state.grid.as_mut() else {
        return;
    };
    cache.measure = None;
    let cols = if cols == 0 {
        warn!("grid configured with zero columns, using one");
        1
    } else {
        cols
    };
    if children.len() % cols as usize != 0 {
        warn!(
            children = children.len(),
            cols, "grid child count not divisible by column count"
        );
    }
    let rows: Vec<Vec<WidgetId>> = children
        .chunks(cols as usize)
        .map(<[WidgetId]>::to_vec)
        .collect();
    cache.cols = (0..cols as usize)
        .map(|i| rows.iter().filter_map(|r| r.get(i).copied()).collect())
        .collect();
    cache.rows = rows;
}

fn cache(tree: &LayoutTree, id: WidgetId) -> Result<&GridCache> {
    tree.manager_state(id)?
        .grid
        .as_ref()
        .ok_or_else(|| Error::Configuration("container is not a grid".into()))
}

fn cache_mut(tree: &mut LayoutTree, id: WidgetId) -> Result<&mut GridCache> {
    tree.manager_state_mut(id)?
        .grid
        .as_mut()
        .ok_or_else(|| Error::Configuration("container is not a grid".into()))
}

pub(crate) fn measure(
    tree: &mut LayoutTree,
    id: WidgetId,
    cols: MeasureSpec,
    rows: MeasureSpec,
) -> Result<Expanse> {
    let data = measure_tracks(tree, id, cols, rows)?;
    let padding = tree.manager_state(id)?.padding;
    // Tracks start at 1, so adding the closing border lane yields the full
    // bordered extent.
    let w = data.cols.last().map(|c| c.position + c.size).unwrap_or(0) + 1 + padding.horizontal();
    let h = data
        .rows
        .last()
        .map(|r| r.track.position + r.track.size)
        .unwrap_or(0)
        + 1
        + padding.vertical();
    let result = Expanse::new(cols.resolve(w), rows.resolve(h));
    cache_mut(tree, id)?.measure = Some((result, data));
    Ok(result)
}

pub(crate) fn layout(tree: &mut LayoutTree, id: WidgetId, area: Expanse) -> Result<()> {
    let data = measure_data_for(tree, id, area)?;
    let children = tree.entry(id)?.children.clone();
    let ncols = data.cols.len().max(1);
    for (i, &c) in children.iter().enumerate() {
        let col = &data.cols[i % ncols];
        let row = &data.rows[i / ncols];
        let size = row.cells[i % ncols];
        let params = tree.params(c)?;
        let pos = Point::new(
            col.position + params.gravity.horizontal().space(size.w, col.size),
            row.track.position + params.gravity.vertical().space(size.h, row.track.size),
        );
        tree.layout(c, size, pos)?;
    }
    Ok(())
}

/// The track table for an area, reusing the memoized table when the area
/// matches the last measurement.
fn measure_data_for(tree: &mut LayoutTree, id: WidgetId, area: Expanse) -> Result<GridMeasure> {
    if let Some((key, data)) = cache(tree, id)?.measure.as_ref() {
        if *key == area {
            return Ok(data.clone());
        }
    }
    let data = measure_tracks(
        tree,
        id,
        MeasureSpec::exactly(area.w),
        MeasureSpec::exactly(area.h),
    )?;
    cache_mut(tree, id)?.measure = Some((area, data.clone()));
    Ok(data)
}

fn measure_tracks(
    tree: &mut LayoutTree,
    id: WidgetId,
    cols: MeasureSpec,
    rows: MeasureSpec,
) -> Result<GridMeasure> {
    let padding = tree.manager_state(id)?.padding;
    let (row_groups, col_groups) = {
        let c = cache(tree, id)?;
        (c.rows.clone(), c.cols.clone())
    };
    let children = tree.entry(id)?.children.clone();
    let mut max_weight = 0u32;
    for &c in &children {
        max_weight = max_weight.max(tree.params(c)?.weight);
    }
    let total_weight = f64::from(max_weight);

    let child_rows = rows.shrink(padding.vertical());
    let max_cols = cols.shrink(padding.horizontal()).budget();
    let max_rows = child_rows.budget();
    let rows_wrap = SizeSpec::Wrap.for_child(child_rows);

    // Columns first: each column wraps its widest member within the
    // remaining horizontal budget.
    let mut position = 0u32;
    let mut col_tracks = Vec::with_capacity(col_groups.len());
    for group in &col_groups {
        let col_spec =
            SizeSpec::Wrap.for_child(MeasureSpec::at_most(max_cols.saturating_sub(position)));
        let track = measure_column(tree, group, col_spec, rows_wrap)?;
        position += track.size;
        col_tracks.push(track);
    }
    redistribute(col_tracks.iter_mut(), position, max_cols, total_weight);
    place(col_tracks.iter_mut());

    // Rows second, against the resolved column widths.
    let mut position = 0u32;
    let mut row_tracks = Vec::with_capacity(row_groups.len());
    for group in &row_groups {
        let row_spec = MeasureSpec::at_most(max_rows.saturating_sub(position));
        let track = measure_row(tree, group, &col_tracks, row_spec)?;
        position += track.track.size;
        row_tracks.push(track);
    }
    redistribute(
        row_tracks.iter_mut().map(|r| &mut r.track),
        position,
        max_rows,
        total_weight,
    );
    place(row_tracks.iter_mut().map(|r| &mut r.track));

    Ok(GridMeasure {
        rows: row_tracks,
        cols: col_tracks,
    })
}

fn measure_column(
    tree: &mut LayoutTree,
    items: &[WidgetId],
    cols: MeasureSpec,
    rows: MeasureSpec,
) -> Result<Track> {
    let max_rows = rows.budget();
    let mut position = 0u32;
    let mut widest = 0u32;
    let mut weight = 0u32;
    for &item in items {
        let params = tree.params(item)?;
        let child_rows = MeasureSpec::at_most(max_rows.saturating_sub(position));
        let size = tree.measure(
            item,
            params.cols.for_child(cols),
            params.rows.for_child(child_rows),
        )?;
        position += size.h;
        widest = widest.max(size.w);
        weight += params.weight;
    }
    Ok(Track {
        size: cols.resolve(widest),
        position: 0,
        weight,
    })
}

fn measure_row(
    tree: &mut LayoutTree,
    items: &[WidgetId],
    cols: &[Track],
    rows: MeasureSpec,
) -> Result<RowTrack> {
    let mut cells = Vec::with_capacity(items.len());
    let mut tallest = 0u32;
    let mut weight = 0u32;
    for (&item, col) in items.iter().zip(cols) {
        let params = tree.params(item)?;
        let size = tree.measure(
            item,
            params.cols.for_child(MeasureSpec::at_most(col.size)),
            params.rows.for_child(rows),
        )?;
        tallest = tallest.max(size.h);
        weight += params.weight;
        cells.push(size);
    }
    Ok(RowTrack {
        track: Track {
            size: rows.resolve(tallest),
            position: 0,
            weight,
        },
        cells,
    })
}

/// Grow weighted tracks into the leftover budget by their proportional
/// share. No-op when the axis is unbounded or already filled.
fn redistribute<'a>(
    tracks: impl Iterator<Item = &'a mut Track>,
    used: u32,
    budget: u32,
    total_weight: f64,
) {
    if budget == UNBOUNDED || used >= budget || total_weight <= 0.0 {
        return;
    }
    let extra = budget - used;
    for t in tracks {
        if t.weight > 0 {
            t.size += (f64::from(t.weight) / total_weight * f64::from(extra)).round() as u32;
        }
    }
}

/// Assign track offsets: the first track sits after the leading border lane,
/// and each subsequent track leaves one divider lane behind it.
fn place<'a>(tracks: impl Iterator<Item = &'a mut Track>) {
    let mut position = 1u32;
    for t in tracks {
        t.position = position;
        position += t.size + 1;
    }
}

impl LayoutTree {
    /// Draw a grid container's border lines onto a surface covering its
    /// area. Pure with respect to layout state: only the surface is written.
    pub fn draw_grid_border(
        &mut self,
        id: WidgetId,
        surface: &mut dyn Surface,
        glyphs: &BorderGlyphs,
    ) -> Result<()> {
        self.check_children(id)?;
        let data = measure_data_for(self, id, surface.size())?;

        rule(
            surface,
            &data,
            0,
            glyphs.topleft,
            glyphs.tee_down,
            glyphs.topright,
            glyphs.horizontal,
        );
        let bottom = data
            .rows
            .last()
            .map(|r| r.track.position + r.track.size)
            .unwrap_or(0);
        rule(
            surface,
            &data,
            bottom,
            glyphs.bottomleft,
            glyphs.tee_up,
            glyphs.bottomright,
            glyphs.horizontal,
        );
        for row in &data.rows {
            if row.track.position == 1 {
                continue;
            }
            rule(
                surface,
                &data,
                row.track.position.saturating_sub(1),
                glyphs.tee_right,
                glyphs.cross,
                glyphs.tee_left,
                glyphs.horizontal,
            );
        }

        vline(surface, &data, 0, glyphs.vertical);
        for col in &data.cols {
            vline(surface, &data, col.position + col.size, glyphs.vertical);
        }
        Ok(())
    }
}

/// One horizontal border line: a glyph before each column (corner or
/// junction), the column's span of horizontal glyphs, and a closing glyph
/// after the last column.
fn rule(
    surface: &mut dyn Surface,
    data: &GridMeasure,
    y: u32,
    start: char,
    junction: char,
    end: char,
    horizontal: char,
) {
    for col in &data.cols {
        surface.put(
            Point::new(col.position.saturating_sub(1), y),
            if col.position != 1 { junction } else { start },
        );
        for i in 0..col.size {
            surface.put(Point::new(col.position + i, y), horizontal);
        }
    }
    if let Some(last) = data.cols.last() {
        surface.put(Point::new(last.position + last.size, y), end);
    }
}

/// One vertical border line, drawn only within row spans so that the
/// horizontal rules keep their junction glyphs.
fn vline(surface: &mut dyn Surface, data: &GridMeasure, x: u32, vertical: char) {
    for row in &data.rows {
        for i in 0..row.track.size {
            surface.put(Point::new(x, row.track.position + i), vertical);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Gravity, LayoutParams};
    use crate::surface::SINGLE;
    use crate::tree::{Arrangement, NodeKind};
    use crate::tutils::{Block, Buffer};

    fn grid(cols: u32, children: &[(u32, u32)]) -> (LayoutTree, WidgetId, Vec<WidgetId>) {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t
            .attach_root(
                Box::new(Block::sized(0, 0)),
                NodeKind::Container(Arrangement::Grid { cols }),
            )
            .unwrap();
        let mut ids = Vec::new();
        for &(w, h) in children {
            ids.push(
                t.attach(
                    root,
                    Box::new(Block::sized(w, h)),
                    NodeKind::Leaf,
                    LayoutParams::default(),
                )
                .unwrap(),
            );
        }
        (t, root, ids)
    }

    #[test]
    fn two_by_two_placement() -> Result<()> {
        let (mut t, root, ids) = grid(2, &[(3, 1); 4]);
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        // Two 3-wide columns plus three border lanes; two 1-high rows plus
        // three border lanes.
        assert_eq!(size, Expanse::new(9, 5));

        t.do_layout(root, size)?;
        assert_eq!(t.position_of(ids[0])?, Point::new(1, 1));
        assert_eq!(t.position_of(ids[1])?, Point::new(5, 1));
        assert_eq!(t.position_of(ids[2])?, Point::new(1, 3));
        assert_eq!(t.position_of(ids[3])?, Point::new(5, 3));
        Ok(())
    }

    #[test]
    fn border_drawing() -> Result<()> {
        let (mut t, root, _) = grid(2, &[(3, 1); 4]);
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        t.do_layout(root, size)?;

        let mut buf = Buffer::new(size);
        t.draw_grid_border(root, &mut buf, &SINGLE)?;
        assert_eq!(
            buf.text(),
            "┌───┬───┐\n\
             │   │   │\n\
             ├───┼───┤\n\
             │   │   │\n\
             └───┴───┘"
        );
        Ok(())
    }

    #[test]
    fn short_last_row_is_tolerated() -> Result<()> {
        let (mut t, root, ids) = grid(2, &[(3, 1); 5]);
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        t.do_layout(root, size)?;
        // Three rows, the last holding a single cell.
        assert_eq!(t.position_of(ids[4])?, Point::new(1, 5));
        Ok(())
    }

    #[test]
    fn weighted_column_grows_into_leftover() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Grid { cols: 2 }),
        )?;
        let a = t.attach(
            root,
            Box::new(Block::sized(3, 1)),
            NodeKind::Leaf,
            LayoutParams::fill().with_weight(1),
        )?;
        let b = t.attach(
            root,
            Box::new(Block::sized(3, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        t.do_layout(root, Expanse::new(19, 5))?;
        // Natural tracks use 6 of the 19 columns; the weighted first column
        // absorbs the remaining 13, pushing column 1 from origin 5 to 18.
        assert_eq!(t.position_of(a)?.x, 1);
        assert_eq!(t.position_of(b)?.x, 18);
        Ok(())
    }

    #[test]
    fn gravity_within_cell() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Grid { cols: 2 }),
        )?;
        t.attach(
            root,
            Box::new(Block::sized(8, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        let small = t.attach(
            root,
            Box::new(Block::sized(2, 1)),
            NodeKind::Leaf,
            LayoutParams::default().with_gravity(Gravity::TopRight),
        )?;
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        t.do_layout(root, size)?;
        // Column 1 is 2 wide, so a right-anchored 2-wide child is flush at
        // the column origin; widen the check via column 0 instead.
        let wide = t.attach(
            root,
            Box::new(Block::sized(8, 1)),
            NodeKind::Leaf,
            LayoutParams::default(),
        )?;
        let right = t.attach(
            root,
            Box::new(Block::sized(2, 1)),
            NodeKind::Leaf,
            LayoutParams::default().with_gravity(Gravity::BottomRight),
        )?;
        let _ = (small, wide);
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        t.do_layout(root, size)?;
        // Column 1 origin is 10; the 2-wide child in a 2-wide column stays
        // at the origin on x but anchors to the row bottom.
        assert_eq!(t.position_of(right)?.x, 10);
        Ok(())
    }

    #[test]
    fn set_grid_cols_regroups() -> Result<()> {
        let (mut t, root, ids) = grid(2, &[(3, 1); 4]);
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        t.do_layout(root, size)?;

        t.set_grid_cols(root, 4)?;
        assert!(t.is_dirty(root)?);
        let size = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        // One row of four 3-wide columns: 4 * 3 + 5 border lanes.
        assert_eq!(size, Expanse::new(17, 3));
        t.do_layout(root, size)?;
        assert_eq!(t.position_of(ids[3])?, Point::new(13, 1));
        Ok(())
    }

    #[test]
    fn param_change_drops_track_cache() -> Result<()> {
        let (mut t, root, ids) = grid(2, &[(3, 1); 4]);
        let area = t.measure(root, MeasureSpec::unspecified(), MeasureSpec::unspecified())?;
        t.do_layout(root, area)?;
        assert_eq!(t.size_of(ids[0])?.w, 3);

        // Widen one cell without changing the container's area: the dirty
        // pass must rebuild the track table, not replay the cached one.
        t.set_params(
            ids[0],
            LayoutParams::new(SizeSpec::Specified(6), SizeSpec::Wrap),
        )?;
        assert!(t.is_dirty(root)?);
        t.do_layout(root, area)?;
        assert!(!t.is_dirty(root)?);
        assert_eq!(t.size_of(ids[0])?.w, 6);
        Ok(())
    }

    #[test]
    fn set_grid_cols_rejects_non_grid() -> Result<()> {
        let mut t = LayoutTree::new(Expanse::new(80, 24));
        let root = t.attach_root(
            Box::new(Block::sized(0, 0)),
            NodeKind::Container(Arrangement::Vertical),
        )?;
        assert!(matches!(
            t.set_grid_cols(root, 2),
            Err(Error::Configuration(_))
        ));
        Ok(())
    }
}
