use ec3::{Ec3, Ec3Error, Frequency, MonthSpan, YearSpan};

#[tokio::main]
async fn main() -> Result<(), Ec3Error> {
    env_logger::init();

    let client = Ec3::new().await?;

    // Hourly data for Toronto (5051), summer of 1965.
    let data = client
        .get_data()
        .stations(vec![5051])
        .frequency(Frequency::Hourly)
        .years(YearSpan::single(1965))
        .months(MonthSpan::new(6, 8)?)
        .call()
        .await?;

    println!("Shape: {:?}", data.shape());
    println!("{}", data.head(Some(5)));
    Ok(())
}
