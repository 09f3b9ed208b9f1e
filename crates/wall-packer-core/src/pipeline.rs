//! Public entry point: validate the request, prepare wall and keep-out,
//! dispatch to the selected variant, post-process, label, and assemble the
//! placement.
//!
//! Only two conditions abort the invocation: an unrepairable wall and an
//! invalid catalog. Everything else (degenerate components, rejected
//! apertures, coverage shortfalls) is handled inline and reflected in the
//! returned placement.

use geo::{MultiPolygon, Polygon};
use tracing::{debug, instrument, warn};

use crate::config::{Algorithm, PackRequest};
use crate::debug::{DebugEvent, DebugSink, NullSink};
use crate::error::Result;
use crate::geom;
use crate::labeling;
use crate::model::{CustomPiece, Placement, PlacementMetrics, StandardBlock};
use crate::packer::{bidirectional, small};
use crate::postprocess;

/// Pack a wall without a debug sink.
#[instrument(skip_all)]
pub fn pack_wall(req: &PackRequest) -> Result<Placement> {
    pack_wall_with_sink(req, &NullSink)
}

/// Pack a wall, reporting engine decisions to `sink`.
pub fn pack_wall_with_sink(req: &PackRequest, sink: &dyn DebugSink) -> Result<Placement> {
    req.validate()?;
    let cfg = &req.engine;

    let wall = geom::repair(&req.wall)?;
    let wall_bounds = geom::bounds(&wall);
    let wall_area = geom::area(&wall);

    let apertures = filter_apertures(req, wall_area, sink);

    // Keep-out: valid apertures plus the wall's own holes.
    let mut keepout_polys = geom::holes(&wall);
    keepout_polys.extend(apertures.iter().cloned());
    let keepout: Option<MultiPolygon<f64>> = if keepout_polys.is_empty() {
        None
    } else {
        Some(geom::union_all(&keepout_polys))
    };

    // Net wall drives clipping and the coverage check: blocks may touch
    // neither the outside of the wall nor any aperture.
    let net_wall = if apertures.is_empty() {
        MultiPolygon::new(vec![wall.clone()])
    } else {
        geom::difference(
            &MultiPolygon::new(vec![wall.clone()]),
            &geom::union_all(&apertures),
        )
    };
    let net_area = geom::area_multi(&net_wall);

    if wall_area < cfg.area_eps || net_area < cfg.area_eps {
        debug!(wall_area, net_area, "nothing to pack");
        return Ok(empty_placement(wall_bounds, wall_area));
    }

    let (mut standards, customs) = match req.algorithm {
        Algorithm::Bidirectional => bidirectional::pack(
            &wall,
            keepout.as_ref(),
            &req.catalog,
            req.starting_direction,
            cfg,
            sink,
        ),
        Algorithm::Small => small::pack(
            &wall,
            keepout.as_ref(),
            &req.catalog,
            req.starting_direction,
            req.ground_offset_mm,
            cfg,
            sink,
        ),
    };

    let report = |step: &'static str, n_std: usize, n_customs: usize| {
        sink.record(&DebugEvent::PostProcessStep {
            step,
            standards: n_std,
            customs: n_customs,
        });
    };

    let (clipped_standards, mut customs) =
        postprocess::clip_blocks_to_wall(standards, customs, &net_wall, &req.catalog, cfg);
    standards = clipped_standards;
    report("clip_to_wall", standards.len(), customs.len());

    let base_y = match req.algorithm {
        Algorithm::Small => wall_bounds.1 + f64::from(req.ground_offset_mm),
        Algorithm::Bidirectional => wall_bounds.1,
    };
    customs = postprocess::merge_customs_row_aware(
        customs,
        &req.catalog,
        f64::from(req.catalog.height),
        base_y,
        cfg,
    );
    report("merge_customs", standards.len(), customs.len());

    customs = postprocess::split_out_of_spec(customs, &req.catalog, cfg);
    report("split_out_of_spec", standards.len(), customs.len());

    postprocess::tag_customs(&mut customs, &req.catalog, cfg);
    report("tag_customs", standards.len(), customs.len());

    postprocess::select_source_blocks(&mut customs, &req.catalog);
    report("select_source_blocks", standards.len(), customs.len());

    // Row-major order regardless of packing direction.
    standards.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)));
    customs.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)));

    labeling::assign_labels(&mut standards, &mut customs, &req.catalog, cfg);

    let standard_area: f64 = standards.iter().map(StandardBlock::area_mm2).sum();
    let custom_area: f64 = customs.iter().map(CustomPiece::area_mm2).sum();
    let placed_area = standard_area + custom_area;
    let metrics = PlacementMetrics {
        standard_count: standards.len(),
        custom_count: customs.len(),
        efficiency_ratio: if placed_area > 0.0 {
            standard_area / placed_area
        } else {
            0.0
        },
        waste_ratio: if wall_area > 0.0 {
            (1.0 - placed_area / wall_area).max(0.0)
        } else {
            0.0
        },
    };
    sink.record(&DebugEvent::Metrics(metrics.clone()));

    // Coverage check: the uncovered net area must stay under one
    // smallest-block slice. A shortfall is a data-quality signal, not an
    // error.
    let uncovered = net_area - placed_area;
    let slice_area = f64::from(req.catalog.min_width()) * f64::from(req.catalog.height);
    let coverage_overflow = uncovered > slice_area;
    if coverage_overflow {
        warn!(
            uncovered_mm2 = uncovered,
            threshold_mm2 = slice_area,
            "coverage overflow: wall not fully tiled"
        );
    }

    Ok(Placement {
        standards,
        customs,
        wall_bounds,
        wall_area_mm2: wall_area,
        metrics,
        empty: false,
        coverage_overflow,
    })
}

fn filter_apertures(
    req: &PackRequest,
    wall_area: f64,
    sink: &dyn DebugSink,
) -> Vec<Polygon<f64>> {
    let cfg = &req.engine;
    let mut valid = Vec::with_capacity(req.apertures.len());
    for (index, aperture) in req.apertures.iter().enumerate() {
        let area = geom::area(aperture);
        let reject = |reason: &'static str| {
            debug!(index, area_mm2 = area, reason, "aperture rejected");
            sink.record(&DebugEvent::ApertureRejected {
                index,
                area_mm2: area,
                reason,
            });
        };
        if wall_area > 0.0 && area / wall_area > cfg.max_aperture_ratio {
            reject("covers most of the wall, likely a duplicate outline");
            continue;
        }
        if area < cfg.min_aperture_area_mm2 {
            reject("below the noise threshold");
            continue;
        }
        match geom::repair(aperture) {
            Ok(p) => valid.push(p),
            Err(_) => reject("unrepairable geometry"),
        }
    }
    valid
}

fn empty_placement(wall_bounds: (f64, f64, f64, f64), wall_area_mm2: f64) -> Placement {
    Placement {
        standards: Vec::new(),
        customs: Vec::new(),
        wall_bounds,
        wall_area_mm2,
        metrics: PlacementMetrics {
            standard_count: 0,
            custom_count: 0,
            efficiency_ratio: 0.0,
            waste_ratio: 1.0,
        },
        empty: true,
        coverage_overflow: false,
    }
}
