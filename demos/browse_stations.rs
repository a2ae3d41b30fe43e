use chrono::NaiveTime;
use fuelmap::{
    FacetFilterSpec, FuelMap, FuelMapError, LatLon, OperatingHours, PriceRange, SortKey,
};

#[tokio::main]
async fn main() -> Result<(), FuelMapError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let map = FuelMap::from_env().await?;
    println!(
        "Loaded {} stations from {:?}",
        map.stations().len(),
        map.source()
    );

    let spec = FacetFilterSpec::default()
        .with_fuel_types(["Diesel"])
        .with_price_range(PriceRange::new(150, 170))
        .with_operating_hours(OperatingHours::OpenNow)
        .evaluated_at(NaiveTime::from_hms_opt(21, 30, 0).unwrap_or_default())
        .sorted_by(SortKey::Price);
    let found = map.search(&spec);
    println!("{} diesel stations open at 21:30 under $1.70:", found.count);
    for station in found.results.iter().take(10) {
        println!(
            "  {:<32} {:>6}  {:>8}  {}",
            station.name,
            station.price_display,
            station.distance_label(),
            station.hours
        );
    }

    let nearby = map
        .nearest()
        .location(LatLon(-37.8136, 144.9631))
        .station_limit(3)
        .call();
    println!("Closest to the CBD:");
    for (station, km) in nearby {
        println!("  {:<32} {:.2} km", station.name, km);
    }

    Ok(())
}
