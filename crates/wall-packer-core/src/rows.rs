//! Horizontal course iterator.
//!
//! Slices the wall into block-height stripes from the bottom up, subtracts
//! the keep-out, and yields the remaining connected components of each
//! stripe ordered left to right. When the wall height is not a multiple of
//! the block height, a final reduced-height band is yielded with
//! `adaptive = true`, provided it is at least the configured minimum.

use geo::{MultiPolygon, Polygon};

use crate::config::EngineConfig;
use crate::geom;

/// One course of the wall: the stripe `[y, top]` with its packable
/// components.
#[derive(Debug, Clone)]
pub struct RowBand {
    pub index: usize,
    pub y: f64,
    pub top: f64,
    pub adaptive: bool,
    /// Connected components of `(wall ∩ stripe) \ keepout`, ordered by
    /// left bound.
    pub components: Vec<Polygon<f64>>,
}

impl RowBand {
    pub fn height(&self) -> f64 {
        self.top - self.y
    }
}

/// Finite, non-restartable iterator over the wall's courses.
pub struct RowIter<'a> {
    wall: &'a Polygon<f64>,
    keepout: Option<&'a MultiPolygon<f64>>,
    cfg: &'a EngineConfig,
    minx: f64,
    maxx: f64,
    maxy: f64,
    base_y: f64,
    block_height: f64,
    complete_rows: usize,
    remaining: f64,
    next_row: usize,
    done: bool,
}

impl<'a> RowIter<'a> {
    /// `base_y` is the bottom of the first course: the wall's min-y, plus
    /// any ground offset.
    pub fn new(
        wall: &'a Polygon<f64>,
        keepout: Option<&'a MultiPolygon<f64>>,
        block_height: f64,
        base_y: f64,
        cfg: &'a EngineConfig,
    ) -> Self {
        let (minx, _, maxx, maxy) = geom::bounds(wall);
        let total_height = (maxy - base_y).max(0.0);
        let complete_rows = (total_height / block_height).floor() as usize;
        let remaining = total_height - complete_rows as f64 * block_height;
        Self {
            wall,
            keepout,
            cfg,
            minx,
            maxx,
            maxy,
            base_y,
            block_height,
            complete_rows,
            remaining,
            next_row: 0,
            done: false,
        }
    }

    /// Number of full-height courses the wall fits.
    pub fn complete_rows(&self) -> usize {
        self.complete_rows
    }

    /// True when a reduced-height band will be emitted after the full rows.
    pub fn has_adaptive_band(&self) -> bool {
        self.remaining >= self.cfg.min_adaptive_mm
    }

    fn components_of(&self, y: f64, top: f64) -> Vec<Polygon<f64>> {
        let stripe = geom::rect(self.minx, y, self.maxx, top);
        let mut inter = geom::intersect(self.wall, &stripe);
        if let Some(keepout) = self.keepout {
            inter = geom::difference(&inter, keepout);
        }
        let mut comps: Vec<Polygon<f64>> = geom::ensure_polygons(inter)
            .into_iter()
            .filter(|p| geom::area(p) >= self.cfg.area_eps)
            .collect();
        comps.sort_by(|a, b| geom::bounds(a).0.total_cmp(&geom::bounds(b).0));
        comps
    }
}

impl Iterator for RowIter<'_> {
    type Item = RowBand;

    fn next(&mut self) -> Option<RowBand> {
        if self.done {
            return None;
        }
        let row = self.next_row;
        if row < self.complete_rows {
            let y = geom::snap(self.base_y + row as f64 * self.block_height);
            let top = geom::snap(y + self.block_height);
            self.next_row += 1;
            return Some(RowBand {
                index: row,
                y,
                top,
                adaptive: false,
                components: self.components_of(y, top),
            });
        }
        self.done = true;
        if self.has_adaptive_band() {
            let y = geom::snap(self.base_y + self.complete_rows as f64 * self.block_height);
            return Some(RowBand {
                index: row,
                y,
                top: self.maxy,
                adaptive: true,
                components: self.components_of(y, self.maxy),
            });
        }
        None
    }
}
