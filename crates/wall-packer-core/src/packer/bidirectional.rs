//! Row loop for the bidirectional variant.
//!
//! Even rows pack left-to-right, odd rows right-to-left (unless the caller
//! pinned a side), which staggers the vertical joints into a running bond
//! without any artificial offset. The adaptive band reuses the direction of
//! the last full row.

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
    cfg: &EngineConfig,
    sink: &dyn DebugSink,
) -> (Vec<StandardBlock>, Vec<CustomPiece>) {
    let (_, miny, _, _) = geom::bounds(wall);
    let rows = RowIter::new(wall, keepout, f64::from(catalog.height), miny, cfg);
    let complete_rows = rows.complete_rows();

    let mut standards = Vec::new();
    let mut customs = Vec::new();

    for band in rows {
        let direction = if band.adaptive {
            // Same side as the last full row; no alternation in the band.
            Direction::for_row(complete_rows.saturating_sub(1), start)
        } else {
            Direction::for_row(band.index, start)
        };
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
