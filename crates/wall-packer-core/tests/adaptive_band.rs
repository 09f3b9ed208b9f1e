use wall_packer_core::prelude::*;

fn request(width: f64, height: f64) -> PackRequest {
    PackRequest::builder(geom::rect(0.0, 0.0, width, height)).build()
}

#[test]
fn leftover_band_gets_reduced_height_blocks() {
    // Three full courses consume 1485 mm; the remaining 215 mm band is tall
    // enough to pack at reduced height.
    let placement = pack_wall(&request(2478.0, 1700.0)).expect("packing should succeed");

    assert_eq!(placement.metrics.standard_count, 8);
    assert_eq!(placement.metrics.custom_count, 0);

    let full: Vec<_> = placement
        .standards
        .iter()
        .filter(|b| (b.height_mm - 495.0).abs() < 1e-9)
        .collect();
    let band: Vec<_> = placement
        .standards
        .iter()
        .filter(|b| (b.height_mm - 215.0).abs() < 1e-9)
        .collect();
    assert_eq!(full.len(), 6);
    assert_eq!(band.len(), 2);
    for block in &band {
        assert!((block.y - 1485.0).abs() < 1e-9, "band block at y={}", block.y);
        assert_eq!(block.width_mm, 1239);
    }

    assert!(placement.metrics.waste_ratio < 1e-6);
    assert!(!placement.coverage_overflow);
}

#[test]
fn band_below_minimum_is_dropped() {
    // 1600 mm leaves a 115 mm remainder, under the 150 mm minimum: no band,
    // and the uncovered strip is wide enough to trip the coverage check.
    let placement = pack_wall(&request(2478.0, 1600.0)).expect("packing should succeed");

    assert_eq!(placement.metrics.standard_count, 6);
    assert_eq!(placement.metrics.custom_count, 0);
    let top = placement
        .standards
        .iter()
        .map(|b| b.y + b.height_mm)
        .fold(f64::MIN, f64::max);
    assert!((top - 1485.0).abs() < 1e-9, "blocks must stop at the last full course");
    assert!(placement.coverage_overflow, "dropped band should flag the shortfall");
}

#[test]
fn band_blocks_share_standard_letters() {
    let placement = pack_wall(&request(2478.0, 1700.0)).expect("packing should succeed");
    for (i, block) in placement.standards.iter().enumerate() {
        assert_eq!(block.category, "A");
        assert_eq!(block.number, i as u32 + 1);
    }
}
