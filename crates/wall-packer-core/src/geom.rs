//! Geometry kernel: the only module that talks to the underlying polygon
//! crates (`geo` for exact boolean ops, `geo-buf` for buffered offsets).
//!
//! All operations are pure; polygons passed in are never mutated. Coordinates
//! are IEEE 754 doubles in millimetres.

use geo::algorithm::{Area, BooleanOps, BoundingRect, Validation};
use geo::{coord, LineString, MultiPolygon, Polygon, Rect};

use crate::error::{PackError, Result};

/// Default snap grid in millimetres.
pub const SNAP_MM: f64 = 1.0;

/// Snap a value to the nearest point of a millimetre grid.
pub fn snap_to(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    (v / grid).round() * grid
}

/// Snap with the default 1 mm grid.
#[inline]
pub fn snap(v: f64) -> f64 {
    snap_to(v, SNAP_MM)
}

/// Axis-aligned rectangle as a polygon. Callers pass ordered bounds.
pub fn rect(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Polygon<f64> {
    Rect::new(coord! { x: minx, y: miny }, coord! { x: maxx, y: maxy }).to_polygon()
}

/// Bounds as `(minx, miny, maxx, maxy)`.
pub fn bounds(p: &Polygon<f64>) -> (f64, f64, f64, f64) {
    match p.bounding_rect() {
        Some(r) => (r.min().x, r.min().y, r.max().x, r.max().y),
        None => (0.0, 0.0, 0.0, 0.0),
    }
}

/// Unsigned area in mm².
#[inline]
pub fn area(p: &Polygon<f64>) -> f64 {
    p.unsigned_area()
}

/// Total unsigned area of a multipolygon in mm².
#[inline]
pub fn area_multi(mp: &MultiPolygon<f64>) -> f64 {
    mp.unsigned_area()
}

/// Interior rings as standalone polygons.
pub fn holes(p: &Polygon<f64>) -> Vec<Polygon<f64>> {
    p.interiors()
        .iter()
        .filter(|ring| ring.0.len() >= 4)
        .map(|ring| Polygon::new(ring.clone(), vec![]))
        .collect()
}

/// Make a polygon valid, or fail.
///
/// A valid input is returned as-is. An invalid one goes through a self-union,
/// which resolves self-intersections and winding defects the way a zero-width
/// buffer does; when that yields several parts the largest is kept.
pub fn repair(p: &Polygon<f64>) -> Result<Polygon<f64>> {
    if p.is_valid() {
        return Ok(p.clone());
    }
    let cleaned = p.union(p);
    let best = largest_polygon(cleaned).ok_or_else(|| PackError::InvalidWall {
        reason: "polygon collapsed while repairing self-intersections".into(),
    })?;
    if !best.is_valid() || area(&best) <= 0.0 {
        return Err(PackError::InvalidWall {
            reason: "polygon remains invalid after repair".into(),
        });
    }
    Ok(best)
}

/// `a ∩ b`.
pub fn intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

/// `a ∩ b` where the right side may have several parts.
pub fn intersect_multi(a: &Polygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

/// `a \ b`.
pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.difference(b)
}

/// Union of an arbitrary polygon collection.
pub fn union_all(polys: &[Polygon<f64>]) -> MultiPolygon<f64> {
    let mut acc = MultiPolygon::new(Vec::new());
    for p in polys {
        acc = acc.union(p);
    }
    acc
}

/// Buffered offset; `d < 0` shrinks inward. Mitre-style joins keep corners
/// sharp so the result stays parallel to the input edges.
///
/// Fails when the polygon collapses entirely (offset larger than the shape).
/// A multi-part result keeps the largest part.
pub fn offset(p: &Polygon<f64>, d: f64) -> Result<Polygon<f64>> {
    if d == 0.0 {
        return Ok(p.clone());
    }
    let buffered = geo_buf::buffer_polygon(p, d);
    largest_polygon(buffered).ok_or_else(|| PackError::InvalidWall {
        reason: format!("offset of {d} mm collapsed the polygon"),
    })
}

/// Split a (possibly multi-part) geometry into its polygon components,
/// dropping empty rings.
pub fn ensure_polygons(mp: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    mp.0.into_iter().filter(|p| area(p) > 0.0).collect()
}

fn largest_polygon(mp: MultiPolygon<f64>) -> Option<Polygon<f64>> {
    mp.0.into_iter()
        .filter(|p| area(p) > 0.0)
        .max_by(|a, b| area(a).total_cmp(&area(b)))
}

/// Build a polygon from an exterior ring and optional holes, closing rings
/// as needed.
pub fn polygon_from_rings(exterior: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Polygon<f64> {
    let ext = LineString::from(exterior);
    let ints = holes.into_iter().map(LineString::from).collect();
    Polygon::new(ext, ints)
}
