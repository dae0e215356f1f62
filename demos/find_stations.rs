use ec3::{DistanceRange, Ec3, Ec3Error, Frequency, Province, QueryOutcome, Target, YearSpan};

#[tokio::main]
async fn main() -> Result<(), Ec3Error> {
    env_logger::init();

    let client = Ec3::new().await?;

    // Daily stations within 50 km of downtown Toronto covering 1981-2010.
    let result = client
        .find_stations()
        .provinces(vec![Province::Ontario])
        .target(Target::parse("43.65", Some("79.38"))?)
        .distance(DistanceRange::new(0.0, 50.0))
        .period(YearSpan::new(1981, 2010))
        .frequency(Frequency::Daily)
        .detect_recodes(true)
        .call()?;

    match &result.outcome {
        QueryOutcome::Rows(rows) => {
            println!("Found {} stations", rows.len());
            println!("{}", result.to_dataframe()?);
        }
        QueryOutcome::Empty { stage } => println!("No results! (nothing left after the {stage} filter)"),
    }

    for suggestion in &result.recode_suggestions {
        println!(
            ">> Combination {} at coordinates {} {}",
            suggestion.group,
            suggestion.location.latitude(),
            suggestion.location.longitude()
        );
        for station in &suggestion.stations {
            println!("Station {}: {}", station.id, station.name);
        }
    }
    Ok(())
}
