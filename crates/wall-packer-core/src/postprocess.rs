//! Post-processing passes over the raw packer output, applied in order:
//! clip to the wall, merge row slivers, split oversized pieces, tag each
//! custom, and re-price every custom against the catalog.
//!
//! The merge pass may transiently produce customs wider than the largest
//! catalog width; the split pass immediately after restores the bound, so no
//! width invariant holds between the two.

use geo::{MultiPolygon, Polygon};
use tracing::debug;

use crate::config::{BlockCatalog, EngineConfig};
use crate::geom;
use crate::model::{CustomKind, CustomPiece, StandardBlock};

/// Clip every block to the net wall (wall minus valid apertures).
///
/// Standards that survive intact stay standards; ones the wall edge cuts
/// into are demoted to customs carrying the clipped outline (this is what
/// turns blocks near inclined or notched edges into trapezoids). Pieces
/// left with no area are dropped.
pub fn clip_blocks_to_wall(
    standards: Vec<StandardBlock>,
    customs: Vec<CustomPiece>,
    net_wall: &MultiPolygon<f64>,
    catalog: &BlockCatalog,
    cfg: &EngineConfig,
) -> (Vec<StandardBlock>, Vec<CustomPiece>) {
    let mut kept_standards = Vec::with_capacity(standards.len());
    let mut kept_customs = Vec::with_capacity(customs.len());

    for block in standards {
        let footprint = block.footprint();
        let clipped = geom::intersect_multi(&footprint, net_wall);
        let clipped_area = geom::area_multi(&clipped);
        if clipped_area < cfg.area_eps {
            debug!(x = block.x, y = block.y, "standard fully outside wall, dropped");
            continue;
        }
        if clipped_area >= block.area_mm2() - cfg.area_eps {
            kept_standards.push(block);
            continue;
        }
        debug!(x = block.x, y = block.y, "standard clipped by wall edge, demoted to custom");
        for piece in geom::ensure_polygons(clipped) {
            if geom::area(&piece) >= cfg.area_eps {
                kept_customs.push(CustomPiece::from_polygon(piece, catalog));
            }
        }
    }

    for custom in customs {
        let original_area = custom.area_mm2();
        let clipped = geom::intersect_multi(&custom.geometry.0, net_wall);
        let clipped_area = geom::area_multi(&clipped);
        if clipped_area < cfg.area_eps {
            continue;
        }
        if clipped_area >= original_area - cfg.area_eps {
            kept_customs.push(custom);
            continue;
        }
        for piece in geom::ensure_polygons(clipped) {
            if geom::area(&piece) >= cfg.area_eps {
                kept_customs.push(CustomPiece::from_polygon(piece, catalog));
            }
        }
    }

    (kept_standards, kept_customs)
}

/// Coalesce customs within the same course.
///
/// Pieces are bucketed by row index relative to `base_y`, their outlines
/// unioned, and each connected component of the union becomes one piece.
/// Rows never merge with each other, even when geometrically contiguous.
pub fn merge_customs_row_aware(
    customs: Vec<CustomPiece>,
    catalog: &BlockCatalog,
    block_height: f64,
    base_y: f64,
    cfg: &EngineConfig,
) -> Vec<CustomPiece> {
    if customs.is_empty() {
        return customs;
    }

    let mut rows: Vec<(i64, Vec<Polygon<f64>>)> = Vec::new();
    for custom in customs {
        let row_id = ((custom.y - base_y) / block_height).round() as i64;
        match rows.iter_mut().find(|(id, _)| *id == row_id) {
            Some((_, polys)) => polys.push(custom.geometry.0),
            None => rows.push((row_id, vec![custom.geometry.0])),
        }
    }
    rows.sort_by_key(|(id, _)| *id);

    let mut merged = Vec::new();
    for (_, polys) in rows {
        let union = geom::union_all(&polys);
        for piece in geom::ensure_polygons(union) {
            if geom::area(&piece) > cfg.area_eps {
                merged.push(CustomPiece::from_polygon(piece, catalog));
            }
        }
    }
    merged
}

/// Slice customs that exceed the catalog envelope into vertical strips of
/// at most the largest catalog width. Heights are untouched; a strip that is
/// still too tall keeps its dimensions and is tagged out-of-spec later.
pub fn split_out_of_spec(
    customs: Vec<CustomPiece>,
    catalog: &BlockCatalog,
    cfg: &EngineConfig,
) -> Vec<CustomPiece> {
    let max_w = f64::from(catalog.max_width());
    let max_h = f64::from(catalog.height);

    let mut out = Vec::with_capacity(customs.len());
    for custom in customs {
        if custom.width_mm <= max_w + cfg.dim_tol_mm && custom.height_mm <= max_h + cfg.dim_tol_mm {
            out.push(custom);
            continue;
        }

        let poly = custom.geometry.0;
        if geom::area(&poly) <= cfg.area_eps {
            continue;
        }
        let (minx, miny, maxx, maxy) = geom::bounds(&poly);
        let mut x0 = minx;
        while x0 < maxx - cfg.coord_eps {
            let x1 = (x0 + max_w).min(maxx);
            let strip = geom::rect(x0, miny, x1, maxy);
            let slice = geom::intersect(&poly, &strip);
            for piece in geom::ensure_polygons(slice) {
                if geom::area(&piece) > cfg.area_eps {
                    out.push(CustomPiece::from_polygon(piece, catalog));
                }
            }
            x0 = x1;
        }
    }
    out
}

/// Classify each custom: `flush` when only the width was cut, `flex` when
/// the height was trimmed too, `out_of_spec` when the piece exceeds the
/// catalog envelope.
pub fn tag_customs(customs: &mut [CustomPiece], catalog: &BlockCatalog, cfg: &EngineConfig) {
    let max_w = f64::from(catalog.max_width());
    let max_h = f64::from(catalog.height);

    for custom in customs {
        let w = custom.width_mm;
        let h = custom.height_mm;
        custom.ctype = if w > max_w + cfg.dim_tol_mm || h > max_h + cfg.dim_tol_mm {
            CustomKind::OutOfSpec
        } else if (h - max_h).abs() <= cfg.dim_tol_mm {
            CustomKind::Flush
        } else {
            CustomKind::Flex
        };
    }
}

/// Final pricing pass: pick the smallest catalog block each piece can be cut
/// from, and record the offcut. Runs after merge and split so reshaped
/// pieces are re-priced.
pub fn select_source_blocks(customs: &mut [CustomPiece], catalog: &BlockCatalog) {
    for custom in customs {
        custom.source_block_width = catalog.source_width_for(custom.width_mm);
        custom.waste_mm =
            i64::from(custom.source_block_width) - custom.width_mm.round() as i64;
    }
}
