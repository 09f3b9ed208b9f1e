use wall_packer_core::prelude::*;

fn cfg() -> EngineConfig {
    EngineConfig::default()
}

#[test]
fn full_rows_then_adaptive_band() {
    let wall = geom::rect(0.0, 0.0, 2478.0, 1700.0);
    let cfg = cfg();
    let bands: Vec<RowBand> = RowIter::new(&wall, None, 495.0, 0.0, &cfg).collect();

    assert_eq!(bands.len(), 4);
    for (i, band) in bands.iter().enumerate().take(3) {
        assert_eq!(band.index, i);
        assert!(!band.adaptive);
        assert!((band.height() - 495.0).abs() < 1e-9);
        assert_eq!(band.components.len(), 1);
    }
    let band = &bands[3];
    assert!(band.adaptive);
    assert!((band.y - 1485.0).abs() < 1e-9);
    assert!((band.top - 1700.0).abs() < 1e-9);
}

#[test]
fn short_remainder_yields_no_band() {
    let wall = geom::rect(0.0, 0.0, 2478.0, 1600.0);
    let cfg = cfg();
    let iter = RowIter::new(&wall, None, 495.0, 0.0, &cfg);
    assert!(!iter.has_adaptive_band());
    let bands: Vec<RowBand> = iter.collect();
    assert_eq!(bands.len(), 3);
    assert!(bands.iter().all(|b| !b.adaptive));
}

#[test]
fn keepout_splits_rows_into_ordered_components() {
    let wall = geom::rect(0.0, 0.0, 5000.0, 990.0);
    let door = geom::rect(2000.0, 0.0, 3000.0, 2100.0);
    let keepout = geom::union_all(&[door]);
    let cfg = cfg();
    let bands: Vec<RowBand> = RowIter::new(&wall, Some(&keepout), 495.0, 0.0, &cfg).collect();

    assert_eq!(bands.len(), 2);
    for band in &bands {
        assert_eq!(band.components.len(), 2, "door should split the course");
        let (left_minx, ..) = geom::bounds(&band.components[0]);
        let (right_minx, ..) = geom::bounds(&band.components[1]);
        assert!(left_minx < right_minx, "components must be ordered left to right");
        assert!((left_minx - 0.0).abs() < 1e-6);
        assert!((right_minx - 3000.0).abs() < 1e-6);
    }
}

#[test]
fn lifted_base_shifts_the_lattice() {
    let wall = geom::rect(0.0, 0.0, 2478.0, 1700.0);
    let cfg = cfg();
    let bands: Vec<RowBand> = RowIter::new(&wall, None, 495.0, 95.0, &cfg).collect();

    // 1605 mm above the lift: three full courses, 120 mm leftover dropped.
    assert_eq!(bands.len(), 3);
    assert!((bands[0].y - 95.0).abs() < 1e-9);
    assert!((bands[2].y - 1085.0).abs() < 1e-9);
    assert!(bands.iter().all(|b| !b.adaptive));
}
