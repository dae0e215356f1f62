use ec3::{Ec3, Ec3Error};

#[tokio::main]
async fn main() -> Result<(), Ec3Error> {
    // Set RUST_LOG=info to see download progress
    env_logger::init();

    let mut client = Ec3::new().await?;
    let stations = client.update_inventory().await?;
    println!(
        "Station inventory with {} stations written to {}",
        stations,
        client.inventory_path().display()
    );
    Ok(())
}
