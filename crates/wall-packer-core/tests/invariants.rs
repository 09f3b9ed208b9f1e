use rand::{Rng, SeedableRng};
use wall_packer_core::prelude::*;

const AREA_TOL: f64 = 1e-2;

struct Case {
    req: PackRequest,
    wall: geo::Polygon<f64>,
    apertures: Vec<geo::Polygon<f64>>,
}

fn random_case(rng: &mut rand::rngs::StdRng) -> Case {
    let width = rng.gen_range(1500..7000) as f64;
    let height = rng.gen_range(600..3200) as f64;
    let wall = geom::rect(0.0, 0.0, width, height);

    let mut apertures = Vec::new();
    if rng.gen_bool(0.7) && width > 2500.0 && height > 1200.0 {
        let dw = rng.gen_range(400..1000) as f64;
        let dh = (height - 400.0).min(rng.gen_range(800..2200) as f64);
        let dx = rng.gen_range(200..(width - dw - 200.0) as u32) as f64;
        apertures.push(geom::rect(dx, 0.0, dx + dw, dh));
    }

    let req = PackRequest::builder(wall.clone())
        .apertures(apertures.clone())
        .build();
    Case {
        req,
        wall,
        apertures,
    }
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
fn random_walls_hold_all_invariants() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    for case_no in 0..12 {
        let case = random_case(&mut rng);
        let placement = pack_wall(&case.req).expect("packing should succeed");
        let fps = footprints(&placement);

        // No two blocks overlap beyond the floating tolerance.
        for i in 0..fps.len() {
            for j in (i + 1)..fps.len() {
                let overlap = geom::area_multi(&geom::intersect(&fps[i], &fps[j]));
                assert!(
                    overlap <= 1.0,
                    "case {case_no}: blocks {i} and {j} overlap by {overlap} mm2"
                );
            }
        }

        // Every block lies inside the wall and clear of every aperture.
        for (i, fp) in fps.iter().enumerate() {
            let inside = geom::area_multi(&geom::intersect(fp, &case.wall));
            assert!(
                (geom::area(fp) - inside).abs() <= AREA_TOL,
                "case {case_no}: block {i} sticks out of the wall"
            );
            for aperture in &case.apertures {
                let overlap = geom::area_multi(&geom::intersect(fp, aperture));
                assert!(
                    overlap <= AREA_TOL,
                    "case {case_no}: block {i} overlaps an aperture by {overlap} mm2"
                );
            }
        }

        // Customs within spec never exceed the catalog envelope.
        for custom in &placement.customs {
            if custom.ctype != CustomKind::OutOfSpec {
                assert!(
                    custom.width_mm <= 1239.0 + 5.0,
                    "case {case_no}: custom width {} above catalog bound",
                    custom.width_mm
                );
            }
        }
    }
}

#[test]
fn category_numbers_are_dense() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..8 {
        let case = random_case(&mut rng);
        let placement = pack_wall(&case.req).expect("packing should succeed");

        let mut per_category: Vec<(String, Vec<u32>)> = Vec::new();
        let numbers = placement
            .standards
            .iter()
            .map(|b| (b.category.clone(), b.number))
            .chain(placement.customs.iter().map(|c| (c.category.clone(), c.number)));
        for (category, number) in numbers {
            assert!(!category.is_empty(), "block without a category letter");
            match per_category.iter_mut().find(|(c, _)| *c == category) {
                Some((_, ns)) => ns.push(number),
                None => per_category.push((category, vec![number])),
            }
        }
        for (category, mut ns) in per_category {
            ns.sort_unstable();
            let expected: Vec<u32> = (1..=ns.len() as u32).collect();
            assert_eq!(ns, expected, "category {category} numbering has gaps");
        }
    }
}

#[test]
fn source_blocks_are_optimal() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let widths = [1239u32, 826, 413];
    for _ in 0..8 {
        let case = random_case(&mut rng);
        let placement = pack_wall(&case.req).expect("packing should succeed");
        for custom in &placement.customs {
            let expected = widths
                .iter()
                .copied()
                .filter(|w| f64::from(*w) >= custom.width_mm)
                .min()
                .unwrap_or(1239);
            assert_eq!(
                custom.source_block_width, expected,
                "custom of width {} cut from the wrong block",
                custom.width_mm
            );
        }
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(23);
    for _ in 0..4 {
        let case = random_case(&mut rng);
        let a = pack_wall(&case.req).expect("packing should succeed");
        let b = pack_wall(&case.req).expect("packing should succeed");
        let ja = serde_json::to_string(&a).expect("serialize");
        let jb = serde_json::to_string(&b).expect("serialize");
        assert_eq!(ja, jb, "two runs over the same request diverged");
    }
}
