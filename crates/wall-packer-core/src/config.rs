use std::collections::BTreeMap;
use std::str::FromStr;

use geo::Polygon;
use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};

/// Which end of a row the cursor starts from.
///
/// `Alternate` flips the direction on odd rows to produce a running bond;
/// `Left`/`Right` pin every row to one side, used when a physical anchor wall
/// forces a consistent origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StartingDirection {
    Left,
    Right,
    Alternate,
}

impl FromStr for StartingDirection {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "alternate" | "alt" => Ok(Self::Alternate),
            _ => Err(()),
        }
    }
}

/// Placement algorithm variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Row-by-row greedy with per-row direction alternation (running bond).
    Bidirectional,
    /// Residential variant: fixed direction, optional ground offset, block
    /// widths tied to moraletti stud counts.
    Small,
}

impl FromStr for Algorithm {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bidirectional" | "bidi" => Ok(Self::Bidirectional),
            "small" => Ok(Self::Small),
            _ => Err(()),
        }
    }
}

/// The standard block catalog: a small set of widths, one height, and the
/// letter each width is labeled with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockCatalog {
    /// Standard widths in mm, strictly decreasing.
    pub widths: Vec<u32>,
    /// Block height in mm (one course).
    pub height: u32,
    /// Width → category letter for standard blocks.
    pub size_to_letter: BTreeMap<u32, char>,
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self {
            widths: vec![1239, 826, 413],
            height: 495,
            size_to_letter: BTreeMap::from([(1239, 'A'), (826, 'B'), (413, 'C')]),
        }
    }
}

impl BlockCatalog {
    pub fn validate(&self) -> Result<()> {
        if self.widths.is_empty() {
            return Err(PackError::InvalidCatalog("no block widths".into()));
        }
        if self.height == 0 {
            return Err(PackError::InvalidCatalog("block height must be positive".into()));
        }
        for pair in self.widths.windows(2) {
            if pair[0] <= pair[1] {
                return Err(PackError::InvalidCatalog(format!(
                    "widths must be strictly decreasing (got {} before {})",
                    pair[0], pair[1]
                )));
            }
        }
        if self.widths[self.widths.len() - 1] == 0 {
            return Err(PackError::InvalidCatalog("widths must be positive".into()));
        }
        Ok(())
    }

    /// Largest standard width.
    pub fn max_width(&self) -> u32 {
        self.widths[0]
    }

    /// Smallest standard width.
    pub fn min_width(&self) -> u32 {
        self.widths[self.widths.len() - 1]
    }

    /// Letter for an exact catalog width.
    pub fn letter_for(&self, width: u32) -> Option<char> {
        self.size_to_letter.get(&width).copied()
    }

    /// Letter for an arbitrary width: exact match, else the nearest catalog
    /// width's letter.
    pub fn nearest_letter(&self, width: f64) -> char {
        let rounded = width.round() as i64;
        if let Some(c) = self.size_to_letter.get(&(rounded.max(0) as u32)) {
            return *c;
        }
        self.widths
            .iter()
            .min_by_key(|w| (**w as i64 - rounded).abs())
            .and_then(|w| self.size_to_letter.get(w))
            .copied()
            .unwrap_or('A')
    }

    /// The smallest catalog width that covers `width`, or the largest width
    /// when nothing is big enough. Pieces are cut from this block.
    pub fn source_width_for(&self, width: f64) -> u32 {
        self.widths
            .iter()
            .copied()
            .filter(|w| f64::from(*w) >= width)
            .min()
            .unwrap_or_else(|| self.max_width())
    }
}

/// Moraletti (internal stud) parameters for the small variant. The engine
/// validates and carries these; the stud arithmetic feeds cutting lists
/// downstream, not the geometric placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoralettiConfig {
    pub thickness_mm: u32,
    pub height_mm: u32,
    /// Piedini: lift of the first course above the floor slab.
    pub height_from_ground_mm: u32,
    /// Horizontal spacing between studs.
    pub spacing_mm: u32,
    /// Catalog width → maximum stud count for that block.
    pub counts: BTreeMap<u32, u32>,
}

impl MoralettiConfig {
    /// Tolerance when matching a custom width to a catalog cap.
    const WIDTH_MATCH_TOL_MM: f64 = 50.0;
    /// Absolute cap for widths that match no catalog entry.
    const FALLBACK_MAX: u32 = 5;

    pub fn validate(&self) -> Result<()> {
        if self.spacing_mm == 0 {
            return Err(PackError::InvalidCatalog("moraletti spacing must be positive".into()));
        }
        Ok(())
    }

    /// Stud count for a block of the given width: `floor(width/spacing) + 1`
    /// capped by the per-width maximum. Non-catalog widths adopt the cap of a
    /// catalog width within 50 mm, else an absolute cap of 5.
    pub fn stud_count(&self, width_mm: f64) -> u32 {
        let theoretical = (width_mm / f64::from(self.spacing_mm)).floor() as u32 + 1;
        let rounded = width_mm.round() as i64;
        if rounded >= 0 {
            if let Some(cap) = self.counts.get(&(rounded as u32)) {
                return theoretical.min(*cap);
            }
        }
        let nearest = self
            .counts
            .iter()
            .min_by(|a, b| {
                let da = (f64::from(*a.0) - width_mm).abs();
                let db = (f64::from(*b.0) - width_mm).abs();
                da.total_cmp(&db)
            })
            .filter(|(w, _)| (f64::from(**w) - width_mm).abs() < Self::WIDTH_MATCH_TOL_MM);
        match nearest {
            Some((_, cap)) => theoretical.min(*cap),
            None => theoretical.min(Self::FALLBACK_MAX),
        }
    }
}

/// Numeric thresholds of the engine. Historically module-level constants;
/// carried as an immutable config so hosts can tighten or relax them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Area below which a geometry is treated as degenerate (mm²).
    pub area_eps: f64,
    /// Coordinate comparison tolerance (mm).
    pub coord_eps: f64,
    /// Leftover spans at or below this width are dropped, not emitted (mm).
    pub micro_rest_mm: f64,
    /// Dimension tolerance for custom classification and clustering (mm).
    pub dim_tol_mm: f64,
    /// Snap grid for emitted coordinates (mm).
    pub snap_mm: f64,
    /// Minimum height of the adaptive last band (mm); shorter bands are dropped.
    pub min_adaptive_mm: f64,
    /// Apertures below this area are treated as noise (mm²).
    pub min_aperture_area_mm2: f64,
    /// Apertures covering more than this share of the wall are treated as a
    /// duplicate outline.
    pub max_aperture_ratio: f64,
    /// Minimum share of a candidate rectangle that must land inside the
    /// component for a standard block to be emitted.
    pub coverage_test: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            area_eps: 1e-2,
            coord_eps: 1e-3,
            micro_rest_mm: 5.0,
            dim_tol_mm: 5.0,
            snap_mm: 1.0,
            min_adaptive_mm: 150.0,
            min_aperture_area_mm2: 1_000.0,
            max_aperture_ratio: 0.8,
            coverage_test: 0.95,
        }
    }
}

/// One packing invocation: the wall, its apertures, and every knob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    /// Wall outline in mm; interior rings are treated as keep-out.
    pub wall: Polygon<f64>,
    /// Door/window keep-out polygons. May be empty.
    #[serde(default)]
    pub apertures: Vec<Polygon<f64>>,
    #[serde(default)]
    pub catalog: BlockCatalog,
    #[serde(default = "default_direction")]
    pub starting_direction: StartingDirection,
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    /// Required iff `algorithm` is `Small`.
    #[serde(default)]
    pub moraletti: Option<MoralettiConfig>,
    /// Lift of the first course (small variant only).
    #[serde(default)]
    pub ground_offset_mm: u32,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_direction() -> StartingDirection {
    StartingDirection::Alternate
}

fn default_algorithm() -> Algorithm {
    Algorithm::Bidirectional
}

impl PackRequest {
    pub fn new(wall: Polygon<f64>) -> Self {
        Self {
            wall,
            apertures: Vec::new(),
            catalog: BlockCatalog::default(),
            starting_direction: default_direction(),
            algorithm: default_algorithm(),
            moraletti: None,
            ground_offset_mm: 0,
            engine: EngineConfig::default(),
        }
    }

    /// Create a fluent builder seeded with the wall outline.
    pub fn builder(wall: Polygon<f64>) -> PackRequestBuilder {
        PackRequestBuilder {
            req: Self::new(wall),
        }
    }

    /// Validates catalog and variant constraints.
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;
        match self.algorithm {
            Algorithm::Small => match &self.moraletti {
                Some(m) => m.validate(),
                None => Err(PackError::InvalidCatalog(
                    "small algorithm requires a moraletti configuration".into(),
                )),
            },
            Algorithm::Bidirectional => Ok(()),
        }
    }
}

/// Builder for `PackRequest` for ergonomic construction.
#[derive(Debug, Clone)]
pub struct PackRequestBuilder {
    req: PackRequest,
}

impl PackRequestBuilder {
    pub fn apertures(mut self, v: Vec<Polygon<f64>>) -> Self {
        self.req.apertures = v;
        self
    }
    pub fn aperture(mut self, v: Polygon<f64>) -> Self {
        self.req.apertures.push(v);
        self
    }
    pub fn catalog(mut self, v: BlockCatalog) -> Self {
        self.req.catalog = v;
        self
    }
    pub fn starting_direction(mut self, v: StartingDirection) -> Self {
        self.req.starting_direction = v;
        self
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.req.algorithm = v;
        self
    }
    pub fn moraletti(mut self, v: MoralettiConfig) -> Self {
        self.req.moraletti = Some(v);
        self
    }
    pub fn ground_offset_mm(mut self, v: u32) -> Self {
        self.req.ground_offset_mm = v;
        self
    }
    pub fn engine(mut self, v: EngineConfig) -> Self {
        self.req.engine = v;
        self
    }
    pub fn build(self) -> PackRequest {
        self.req
    }
}
