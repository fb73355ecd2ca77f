use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod models;
mod services;
mod utils;

use services::chart_service;
use services::directory_service;
use services::history_service::HistoryClient;
use utils::errors::AppError;
use utils::prompt;

// Everything is blocking by design (console input included), so a single
// worker thread is all the runtime needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ibexplot=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    info!("📈 ibexplot - IBEX35 historic box-plot charts");

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // create_dir_all treats pre-existing directories as success; any other
    // failure is fatal
    std::fs::create_dir_all("data")?;
    std::fs::create_dir_all("output")?;

    let client = HistoryClient::from_env();

    let directory = directory_service::load(&client).await?;
    let company = prompt::select_company(&directory);
    let slug = directory_service::to_url_slug(&company);

    info!("Fetching historic data for '{}'", slug);
    let quotes = client.fetch_history(&slug).await?;
    info!("Parsed {} daily quotes", quotes.len());

    let (specs, colors) = chart_service::build_box_plots(&quotes);
    let path = chart_service::output_path(&company);
    chart_service::render_chart(&specs, &colors, &company, &path)?;

    Ok(())
}
