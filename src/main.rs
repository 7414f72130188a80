use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use technotes::{api, db};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3500;

#[derive(Parser)]
#[command(name = "technotes")]
#[command(about = "Notes and users REST API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port for HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Database file (defaults to the platform data directory)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
    /// Create or upgrade the database schema and exit
    Migrate {
        /// Database file (defaults to the platform data directory)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let path = match path {
        Some(path) => path,
        None => db::default_path()?,
    };
    tracing::info!("Using database at {}", path.display());

    let db = db::Database::open(&path)?;
    db.migrate()?;
    Ok(db)
}

async fn serve(host: &str, port: u16, database: Option<PathBuf>) -> anyhow::Result<()> {
    let db = open_database(database)?;
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("technotes listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "technotes=debug,technotes_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            database,
        }) => serve(&host, port, database).await?,
        Some(Commands::Migrate { database }) => {
            open_database(database)?;
            println!("Database schema is up to date");
        }
        None => serve(DEFAULT_HOST, DEFAULT_PORT, None).await?,
    }

    Ok(())
}
