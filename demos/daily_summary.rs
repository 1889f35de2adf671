use mesonet_soil::{generate_date, Mesonet, MesonetError, Variables};
use std::env;

#[tokio::main]
async fn main() -> Result<(), MesonetError> {
    configure_polars_display();
    let client = Mesonet::new().await?;

    let summary = client
        .daily_summary()
        .station("NRMN")
        .date(generate_date(2024, 6, Some(1), None, None)?)
        .variables(Variables::All)
        .call()
        .await?;

    println!("{:#?}", summary);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
