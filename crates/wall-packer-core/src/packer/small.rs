//! Row loop for the small (residential) variant.
//!
//! Every course starts from the same side, so the packer produces no running
//! bond of its own; the moraletti grid dictates the rhythm instead. The first
//! course may be lifted off the slab by the configured ground offset
//! (piedini), which shifts the whole row lattice and the adaptive band with
//! it. Widths and stud counts come from the caller's moraletti configuration;
//! the packer itself places the same catalog blocks as the bidirectional
//! variant.

use geo::{MultiPolygon, Polygon};
use tracing::debug;

use super::{segment, Direction};
use crate::config::{BlockCatalog, EngineConfig, StartingDirection};
use crate::debug::{DebugEvent, DebugSink};
use crate::geom;
use crate::model::{CustomPiece, StandardBlock};
use crate::rows::RowIter;

pub fn pack(
    wall: &Polygon<f64>,
    keepout: Option<&MultiPolygon<f64>>,
    catalog: &BlockCatalog,
    start: StartingDirection,
    ground_offset_mm: u32,
    cfg: &EngineConfig,
    sink: &dyn DebugSink,
) -> (Vec<StandardBlock>, Vec<CustomPiece>) {
    let (_, miny, _, _) = geom::bounds(wall);
    let base_y = miny + f64::from(ground_offset_mm);
    let direction = Direction::pinned(start);
    let rows = RowIter::new(wall, keepout, f64::from(catalog.height), base_y, cfg);

    let mut standards = Vec::new();
    let mut customs = Vec::new();

    for band in rows {
        debug!(
            row = band.index,
            direction = direction.as_str(),
            components = band.components.len(),
            adaptive = band.adaptive,
            "row_decision"
        );
        sink.record(&DebugEvent::RowDecision {
            row: band.index,
            direction: direction.as_str(),
            components: band.components.len(),
            adaptive: band.adaptive,
        });

        for (i, comp) in band.components.iter().enumerate() {
            let (row_std, row_customs) =
                segment::pack_segment(comp, band.y, band.top, catalog, direction, cfg);
            sink.record(&DebugEvent::SegmentPacking {
                row: band.index,
                segment: i,
                standards: row_std.len(),
                customs: row_customs.len(),
            });
            standards.extend(row_std);
            customs.extend(row_customs);
        }
    }

    (standards, customs)
}
