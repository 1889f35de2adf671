use mesonet_soil::{HydraulicLookup, Mesonet, MesonetError};

#[tokio::main]
async fn main() -> Result<(), MesonetError> {
    let client = Mesonet::new().await?;

    let lookup = client.hydraulic_params().station("ACME").depth(10).call()?;
    if let HydraulicLookup::DepthFallback { requested, .. } = &lookup {
        println!("No parameters at {requested} cm, showing all depths");
    }
    println!("{}", lookup.to_frame()?);

    let stations = client.station_info().station("ACME").call().await?;
    println!("{}", stations);

    Ok(())
}
