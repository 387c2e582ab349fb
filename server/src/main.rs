use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foodgram_server::config::Config;
use foodgram_server::{api, build_router, db, fixtures, telemetry, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "foodgram")]
#[command(about = "Foodgram recipe-sharing server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print the OpenAPI document and exit
    Openapi,
    /// Load ingredients from a CSV (name,measurement_unit) or JSON file
    ImportIngredients {
        /// Path to a .csv or .json file
        file: PathBuf,
    },
    /// Load tags from a JSON file of {name, color, slug} objects
    ImportTags {
        /// Path to a .json file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Openapi => {
            println!("{}", api::openapi().to_pretty_json()?);
        }
        Commands::Serve => {
            telemetry::init_telemetry()?;
            serve().await?;
        }
        Commands::ImportIngredients { file } => {
            telemetry::init_telemetry()?;
            let mut conn = connect()?;
            let inserted = fixtures::import_ingredients(&mut conn, &file)?;
            println!("Inserted {} ingredients", inserted);
        }
        Commands::ImportTags { file } => {
            telemetry::init_telemetry()?;
            let mut conn = connect()?;
            let inserted = fixtures::import_tags(&mut conn, &file)?;
            println!("Inserted {} tags", inserted);
        }
    }

    Ok(())
}

fn connect() -> Result<db::DbConn> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url)?;
    pool.get().context("Failed to get a database connection")
}

async fn serve() -> Result<()> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url)?;
    let bind_addr = config.bind_addr.clone();

    let app = build_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app).await?;
    Ok(())
}
