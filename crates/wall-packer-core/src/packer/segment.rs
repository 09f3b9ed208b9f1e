//! Greedy packer for one connected component of a course.
//!
//! Walks a cursor from one end of the component to the other. At each step
//! the widest catalog block that fits the remaining span is tried: a
//! candidate rectangle is intersected with the component, and the block is
//! emitted as a standard when the intersection covers enough of it,
//! otherwise the intersection itself becomes a custom piece. Either way the
//! cursor advances by the candidate's full width, so later candidates never
//! overlap earlier ones. A leftover narrower than every catalog width is
//! emitted as a trailing custom unless it is micro-rest noise.

use geo::Polygon;

use super::Direction;
use crate::config::{BlockCatalog, EngineConfig};
use crate::geom;
use crate::model::{CustomPiece, StandardBlock};

/// Pack one component of the stripe `[y, top]`.
///
/// The stripe height is whatever the caller hands in, so the same routine
/// serves full courses and the reduced-height adaptive band.
pub fn pack_segment(
    comp: &Polygon<f64>,
    y: f64,
    top: f64,
    catalog: &BlockCatalog,
    direction: Direction,
    cfg: &EngineConfig,
) -> (Vec<StandardBlock>, Vec<CustomPiece>) {
    let mut standards = Vec::new();
    let mut customs = Vec::new();

    let (seg_minx, _, seg_maxx, _) = geom::bounds(comp);
    let seg_minx = geom::snap(seg_minx);
    let seg_maxx = geom::snap(seg_maxx);
    let y = geom::snap(y);
    let top = geom::snap(top);
    let height = top - y;

    let mut cursor = match direction {
        Direction::LeftToRight => seg_minx,
        Direction::RightToLeft => seg_maxx,
    };

    loop {
        let remaining = match direction {
            Direction::LeftToRight => seg_maxx - cursor,
            Direction::RightToLeft => cursor - seg_minx,
        };
        if remaining <= cfg.coord_eps {
            break;
        }

        let mut placed_one = false;
        for &width in &catalog.widths {
            let w = f64::from(width);
            if w > remaining + cfg.coord_eps {
                continue;
            }
            let (cand_left, cand_right) = match direction {
                Direction::LeftToRight => (cursor, cursor + w),
                Direction::RightToLeft => (cursor - w, cursor),
            };
            let candidate = geom::rect(cand_left, y, cand_right, top);
            let inter = geom::intersect(&candidate, comp);
            let inter_area = geom::area_multi(&inter);
            if inter_area < cfg.area_eps {
                // Candidate lands in a void of the component; try narrower.
                continue;
            }
            if inter_area / (w * height) >= cfg.coverage_test {
                standards.push(StandardBlock::new(cand_left, y, width, height));
            } else {
                for piece in geom::ensure_polygons(inter) {
                    if geom::area(&piece) >= cfg.area_eps {
                        customs.push(CustomPiece::from_polygon(piece, catalog));
                    }
                }
            }
            cursor = match direction {
                Direction::LeftToRight => geom::snap(cursor + w),
                Direction::RightToLeft => geom::snap(cursor - w),
            };
            placed_one = true;
            break;
        }

        if !placed_one {
            // Remaining span is narrower than the smallest block.
            if remaining > cfg.micro_rest_mm {
                let trailing = match direction {
                    Direction::LeftToRight => geom::rect(cursor, y, seg_maxx, top),
                    Direction::RightToLeft => geom::rect(seg_minx, y, cursor, top),
                };
                let inter = geom::intersect(&trailing, comp);
                if geom::area_multi(&inter) >= cfg.area_eps {
                    for piece in geom::ensure_polygons(inter) {
                        if geom::area(&piece) >= cfg.area_eps {
                            customs.push(CustomPiece::from_polygon(piece, catalog));
                        }
                    }
                }
            }
            break;
        }
    }

    (standards, customs)
}
