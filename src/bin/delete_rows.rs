use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use temperature_table_tools::config::Config;
use temperature_table_tools::services::{
    AssumeYes, Confirmer, DeleteError, DeleteEvent, DeleteService, StdinConfirmer,
};
use temperature_table_tools::store::DynamoTable;
use tracing::info;

#[derive(Parser)]
#[command(name = "delete-rows")]
#[command(about = "Delete every row with a given Id from the temperatures table", long_about = None)]
struct Cli {
    /// Id value to delete. All rows with this Id will be deleted!
    #[arg(long, env = "ID_TO_DELETE")]
    id: String,

    /// Table name (overrides TABLE_NAME)
    #[arg(long)]
    table: Option<String>,

    /// AWS region (overrides AWS_REGION)
    #[arg(long)]
    region: Option<String>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Only count the matching rows
    #[arg(long)]
    dry_run: bool,
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

    // Spinner is driven from the service's progress events
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} Deleted {pos} rows [{elapsed_precise}]")?,
    );
    let ticker = spinner.clone();
    let service = DeleteService::new(table, config.id_attribute.clone())
        .with_page_size(config.page_size)
        .on_event(move |event| match event {
            DeleteEvent::Confirmed => {
                println!("Deleting rows...");
                ticker.enable_steady_tick(Duration::from_millis(100));
            }
            DeleteEvent::RowDeleted(deleted) => ticker.set_position(deleted as u64),
        });

    if cli.dry_run {
        let count = service.count_matching(&cli.id).await?;
        println!(
            "Would delete {} rows with {} {} from table {} in {}.",
            count, config.id_attribute, cli.id, config.table_name, config.region
        );
        return Ok(());
    }

    let mut confirmer: Box<dyn Confirmer> = if cli.yes {
        println!("{}", service.prompt(&cli.id));
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirmer)
    };

    match service.delete_rows(&cli.id, confirmer.as_mut()).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            println!("{outcome}");
            Ok(())
        }
        Err(e @ DeleteError::Interrupted { .. }) => {
            spinner.abandon();
            println!("Deleted {} rows before stopping.", e.deleted());
            Err(e.into())
        }
        Err(e) => {
            spinner.abandon();
            Err(e.into())
        }
    }
}
