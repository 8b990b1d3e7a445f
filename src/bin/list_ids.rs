use clap::Parser;
use temperature_table_tools::config::Config;
use temperature_table_tools::services::{render_ids, IdListingService};
use temperature_table_tools::store::DynamoTable;
use tracing::info;

#[derive(Parser)]
#[command(name = "list-ids")]
#[command(about = "List all unique Id values in the temperatures table", long_about = None)]
struct Cli {
    /// Table name (overrides TABLE_NAME)
    #[arg(long)]
    table: Option<String>,

    /// AWS region (overrides AWS_REGION)
    #[arg(long)]
    region: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout only carries the results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.table, cli.region);
    info!("Loaded configuration: {:?}", config);

    let table = DynamoTable::connect(&config).await?;
    let service =
        IdListingService::new(table, config.id_attribute.clone()).with_page_size(config.page_size);
    let ids = service.list_unique_ids().await?;

    print!(
        "{}",
        render_ids(&config.id_attribute, &config.table_name, &config.region, &ids)
    );

    Ok(())
}
