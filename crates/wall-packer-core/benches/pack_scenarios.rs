use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wall_packer_core::prelude::*;

fn plain_request(width: f64, height: f64) -> PackRequest {
    PackRequest::builder(geom::rect(0.0, 0.0, width, height)).build()
}

fn door_request(width: f64, height: f64) -> PackRequest {
    PackRequest::builder(geom::rect(0.0, 0.0, width, height))
        .aperture(geom::rect(width * 0.4, 0.0, width * 0.6, height * 0.85))
        .build()
}

fn bench_pack_scenarios(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_scenarios");

    for (name, w, h) in [
        ("room", 5000.0, 2475.0),
        ("hall", 12000.0, 3300.0),
        ("facade", 24000.0, 6600.0),
    ] {
        group.bench_with_input(BenchmarkId::new("plain", name), &(w, h), |b, &(w, h)| {
            b.iter(|| {
                let req = plain_request(w, h);
                black_box(pack_wall(&req).expect("packing should succeed"))
            });
        });

        group.bench_with_input(BenchmarkId::new("with_door", name), &(w, h), |b, &(w, h)| {
            b.iter(|| {
                let req = door_request(w, h);
                black_box(pack_wall(&req).expect("packing should succeed"))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pack_scenarios);
criterion_main!(benches);
