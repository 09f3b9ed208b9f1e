use wall_packer_core::prelude::*;

const AREA_TOL: f64 = 1e-2;

fn door_request() -> PackRequest {
    PackRequest::builder(geom::rect(0.0, 0.0, 5000.0, 2475.0))
        .aperture(geom::rect(2000.0, 0.0, 3000.0, 2100.0))
        .build()
}

fn footprints(placement: &Placement) -> Vec<geo::Polygon<f64>> {
    let mut out: Vec<geo::Polygon<f64>> = placement
        .standards
        .iter()
        .map(StandardBlock::footprint)
        .collect();
    out.extend(placement.customs.iter().map(|c| c.geometry.0.clone()));
    out
}

#[test]
fn no_block_enters_the_door() {
    let placement = pack_wall(&door_request()).expect("packing should succeed");
    let door = geom::rect(2000.0, 0.0, 3000.0, 2100.0);

    assert!(placement.metrics.standard_count > 0);
    for fp in footprints(&placement) {
        let overlap = geom::area_multi(&geom::intersect(&fp, &door));
        assert!(overlap <= AREA_TOL, "block overlaps the door by {} mm2", overlap);
    }

    // No standard starts inside the door span below the lintel. (Customs
    // above the lintel may have their bounds origin in that span; the area
    // check above is the binding invariant for them.)
    for block in &placement.standards {
        assert!(
            !(block.x >= 2000.0 && block.x < 3000.0 && block.y < 2100.0),
            "standard at ({}, {}) starts inside the door",
            block.x,
            block.y
        );
    }
}

#[test]
fn door_rows_split_into_two_segments() {
    let placement = pack_wall(&door_request()).expect("packing should succeed");

    // Rows 0..=3 sit fully beside the door: each gets a left and a right
    // segment, and each segment ends in a 348 mm sliver.
    for row in 0..4 {
        let y = row as f64 * 495.0;
        let customs: Vec<_> = placement
            .customs
            .iter()
            .filter(|c| (c.y - y).abs() < 1e-9)
            .collect();
        assert!(
            customs.len() >= 2,
            "row {} should have a sliver on each side of the door, got {}",
            row,
            customs.len()
        );
        let standards = placement
            .standards
            .iter()
            .filter(|b| (b.y - y).abs() < 1e-9)
            .count();
        assert_eq!(standards, 4, "row {} standards", row);
    }
}

#[test]
fn blocks_never_overlap_each_other() {
    let placement = pack_wall(&door_request()).expect("packing should succeed");
    let fps = footprints(&placement);
    for i in 0..fps.len() {
        for j in (i + 1)..fps.len() {
            let overlap = geom::area_multi(&geom::intersect(&fps[i], &fps[j]));
            assert!(
                overlap <= 1.0,
                "blocks {} and {} overlap by {} mm2",
                i,
                j,
                overlap
            );
        }
    }
}

#[test]
fn every_block_stays_inside_the_wall() {
    let placement = pack_wall(&door_request()).expect("packing should succeed");
    let wall = geom::rect(0.0, 0.0, 5000.0, 2475.0);
    for fp in footprints(&placement) {
        let inside = geom::area_multi(&geom::intersect(&fp, &wall));
        assert!(
            (geom::area(&fp) - inside).abs() <= AREA_TOL,
            "block sticks out of the wall"
        );
    }
}
