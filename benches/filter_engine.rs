use chrono::NaiveTime;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fuelmap::{
    apply, FacetFilterSpec, FallbackGenerator, LatLon, NamedRegion, OperatingHours, PriceRange,
    SortKey, StationLocator, StationNormalizer, BRANDS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_filter_engine(c: &mut Criterion) {
    let generator = FallbackGenerator::new(StationNormalizer::default());
    let mut rng = StdRng::seed_from_u64(1);
    let stations =
        generator.generate(&NamedRegion::greater_melbourne(), BRANDS, 5_000, 0, &mut rng);

    let identity = FacetFilterSpec::default();
    let busy = FacetFilterSpec::default()
        .with_query("shell")
        .with_fuel_types(["Diesel", "Premium 95"])
        .with_amenities(["ATM"])
        .with_price_range(PriceRange::new(150, 170))
        .with_max_distance_km(25.0)
        .with_operating_hours(OperatingHours::OpenNow)
        .evaluated_at(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
        .sorted_by(SortKey::Price);

    c.bench_function("apply_identity", |b| {
        b.iter(|| apply(black_box(&stations), black_box(&identity)))
    });
    c.bench_function("apply_all_facets", |b| {
        b.iter(|| apply(black_box(&stations), black_box(&busy)))
    });

    let locator = StationLocator::new(stations.clone());
    c.bench_function("nearest_10", |b| {
        b.iter(|| locator.query(black_box(LatLon(-37.8136, 144.9631)), 10, 10.0, None))
    });
}

criterion_group!(benches, bench_filter_engine);
criterion_main!(benches);
