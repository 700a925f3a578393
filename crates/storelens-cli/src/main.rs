mod analyze;
mod stores;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storelens-cli")]
#[command(about = "Storefront insights command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one storefront and print the record as JSON
    Analyze {
        /// Storefront URL, with or without scheme
        url: String,
        /// Run the LLM enhancement pass (requires `OPENAI_API_KEY`)
        #[arg(long)]
        llm: bool,
        /// Persist the record to the database (requires `DATABASE_URL`)
        #[arg(long)]
        save: bool,
    },
    /// List stored storefronts, most recently analyzed first
    Stores {
        /// Maximum number of stores to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("storelens-cli: run with --help to list commands");
        return Ok(());
    };

    let config = if needs_database(&command) {
        storelens_core::load_app_config()?
    } else {
        storelens_core::load_app_config_without_database()?
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Logs go to stderr so `analyze` output stays pipeable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Analyze { url, llm, save } => {
            analyze::run_analyze(&config, &url, llm, save).await?;
        }
        Commands::Stores { limit } => {
            let pool = connect(&config).await?;
            stores::run_stores(&pool, limit.clamp(1, 200)).await?;
        }
        Commands::Migrate => {
            let pool = connect(&config).await?;
            let applied = storelens_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }

    Ok(())
}

/// `analyze` only touches the database when saving.
fn needs_database(command: &Commands) -> bool {
    match command {
        Commands::Analyze { save, .. } => *save,
        Commands::Stores { .. } | Commands::Migrate => true,
    }
}

async fn connect(config: &storelens_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = storelens_db::PoolConfig::from_app_config(config);
    let pool = storelens_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}
