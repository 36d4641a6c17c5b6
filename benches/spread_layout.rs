use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use parasite_atlas::map::{ClusterKey, GeoPoint, SpreadLayoutEngine, WebMercator};
use parasite_atlas::observations::Observation;
use parasite_atlas::settings::SpreadSettings;

const CENTER: GeoPoint = GeoPoint::new(44.66, -1.17);

fn members(count: usize) -> Vec<Arc<Observation>> {
    (0..count)
        .map(|i| {
            Arc::new(Observation {
                parasite_species: format!("Parasite {i}"),
                host_species: format!("Host {}", i % 5),
                latitude: Some(CENTER.lat),
                longitude: Some(CENTER.lng),
                ..Observation::default()
            })
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let engine = SpreadLayoutEngine::new(SpreadSettings::default()).expect("default settings");
    let projector = WebMercator::new(11.0);
    let key = ClusterKey::from_point(CENTER, 3);
    let mut group = c.benchmark_group("spread_layout");
    for count in [2usize, 12, 60, 300] {
        let members = members(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &members, |b, members| {
            b.iter(|| engine.layout(black_box(&key), CENTER, black_box(members), &projector));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
