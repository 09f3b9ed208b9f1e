use geo::{LineString, Polygon};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::BlockCatalog;
use crate::geom;

/// Classification of a custom piece's cut.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomKind {
    /// Only the width was trimmed; height matches a full course.
    Flush,
    /// Height was trimmed too.
    Flex,
    /// Exceeds the catalog bounds even after splitting.
    OutOfSpec,
}

/// Exact outline of a custom piece. Serializes GeoJSON-style:
/// `{ "type": "Polygon", "coordinates": [[[x, y], ...], ...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceGeometry(pub Polygon<f64>);

#[derive(Serialize, Deserialize)]
struct GeoJsonPolygon {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<[f64; 2]>>,
}

impl Serialize for PieceGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ring = |ls: &LineString<f64>| ls.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>();
        let mut coordinates = vec![ring(self.0.exterior())];
        coordinates.extend(self.0.interiors().iter().map(ring));
        GeoJsonPolygon {
            kind: "Polygon".into(),
            coordinates,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PieceGeometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = GeoJsonPolygon::deserialize(deserializer)?;
        if raw.kind != "Polygon" {
            return Err(D::Error::custom(format!(
                "expected geometry type \"Polygon\", got \"{}\"",
                raw.kind
            )));
        }
        let mut rings = raw.coordinates.into_iter().map(|ring| {
            LineString::from(ring.into_iter().map(|[x, y]| (x, y)).collect::<Vec<_>>())
        });
        let exterior = rings
            .next()
            .ok_or_else(|| D::Error::custom("polygon has no rings"))?;
        Ok(Self(Polygon::new(exterior, rings.collect())))
    }
}

/// A full-size block from the catalog, placed at `(x, y)` (lower-left
/// corner, snapped to the millimetre grid).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardBlock {
    pub width_mm: u32,
    /// Course height; reduced for adaptive-band blocks.
    pub height_mm: f64,
    pub x: f64,
    pub y: f64,
    /// Category letter, assigned by the labeling pass.
    pub category: String,
    /// 1-based progressive number within the category.
    pub number: u32,
}

impl StandardBlock {
    pub fn new(x: f64, y: f64, width_mm: u32, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            x: geom::snap(x),
            y: geom::snap(y),
            category: String::new(),
            number: 0,
        }
    }

    /// Axis-aligned footprint as a polygon.
    pub fn footprint(&self) -> Polygon<f64> {
        geom::rect(
            self.x,
            self.y,
            self.x + f64::from(self.width_mm),
            self.y + self.height_mm,
        )
    }

    pub fn area_mm2(&self) -> f64 {
        f64::from(self.width_mm) * self.height_mm
    }
}

/// A cut-to-fit piece. `geometry` carries the exact outline, which may be
/// non-rectangular after clipping; the scalar fields are its bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomPiece {
    pub width_mm: f64,
    pub height_mm: f64,
    pub x: f64,
    pub y: f64,
    pub geometry: PieceGeometry,
    pub ctype: CustomKind,
    /// Catalog width this piece is cut from (smallest width that covers it).
    pub source_block_width: u32,
    /// Offcut left after the cut; negative only for out-of-spec pieces.
    pub waste_mm: i64,
    pub category: String,
    pub number: u32,
}

impl CustomPiece {
    /// Wrap a polygon as a custom piece, deriving the scalar fields from its
    /// bounds and pricing it against the catalog. Classification defaults to
    /// `Flex` until the tagging pass runs.
    pub fn from_polygon(geometry: Polygon<f64>, catalog: &BlockCatalog) -> Self {
        let (minx, miny, maxx, maxy) = geom::bounds(&geometry);
        let width_mm = geom::snap(maxx - minx);
        let height_mm = geom::snap(maxy - miny);
        let source_block_width = catalog.source_width_for(width_mm);
        Self {
            width_mm,
            height_mm,
            x: geom::snap(minx),
            y: geom::snap(miny),
            geometry: PieceGeometry(geometry),
            ctype: CustomKind::Flex,
            source_block_width,
            waste_mm: i64::from(source_block_width) - width_mm.round() as i64,
            category: String::new(),
            number: 0,
        }
    }

    pub fn area_mm2(&self) -> f64 {
        geom::area(&self.geometry.0)
    }
}

/// Whether a category groups standard blocks or custom pieces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Standard,
    Custom,
}

/// One row of the per-category schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub kind: CategoryKind,
    pub count: usize,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Aggregate figures for a placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementMetrics {
    pub standard_count: usize,
    pub custom_count: usize,
    /// Standard area over placed area.
    pub efficiency_ratio: f64,
    /// Share of wall area not covered by any block.
    pub waste_ratio: f64,
}

impl PlacementMetrics {
    /// Short human-readable digest.
    pub fn summary(&self) -> String {
        format!(
            "Standards: {} | Customs: {} | Efficiency: {:.1}% | Waste: {:.1}%",
            self.standard_count,
            self.custom_count,
            self.efficiency_ratio * 100.0,
            self.waste_ratio * 100.0
        )
    }
}

/// Result of one orchestrator invocation. Blocks are ordered row-major
/// (bottom-to-top, then left-to-right) in both lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub standards: Vec<StandardBlock>,
    pub customs: Vec<CustomPiece>,
    pub wall_bounds: (f64, f64, f64, f64),
    pub wall_area_mm2: f64,
    pub metrics: PlacementMetrics,
    /// True when the wall degenerated (covered by apertures or zero area)
    /// and both lists are empty.
    pub empty: bool,
    /// True when the uncovered area exceeded one smallest-block slice.
    pub coverage_overflow: bool,
}

impl Placement {
    /// Per-category schedule: population and representative dimensions,
    /// ordered by category letter (single letters before extended ones).
    pub fn category_summary(&self) -> Vec<CategorySummary> {
        let mut rows: Vec<CategorySummary> = Vec::new();
        let mut upsert = |category: &str, kind: CategoryKind, w: f64, h: f64| {
            match rows.iter_mut().find(|r| r.category == category) {
                Some(row) => row.count += 1,
                None => rows.push(CategorySummary {
                    category: category.to_string(),
                    kind,
                    count: 1,
                    width_mm: w,
                    height_mm: h,
                }),
            }
        };
        for b in &self.standards {
            upsert(&b.category, CategoryKind::Standard, f64::from(b.width_mm), b.height_mm);
        }
        for c in &self.customs {
            upsert(&c.category, CategoryKind::Custom, c.width_mm, c.height_mm);
        }
        rows.sort_by(|a, b| {
            (a.category.len(), &a.category).cmp(&(b.category.len(), &b.category))
        });
        rows
    }
}
