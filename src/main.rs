use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prodtree::ai::LocalModelClient;
use prodtree::api::{self, AppState};
use prodtree::store::TreeStore;

#[derive(Parser)]
#[command(name = "prodtree")]
#[command(about = "Product tree analysis and export service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8081")]
        port: u16,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "prodtree=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port: u16) -> anyhow::Result<()> {
    let model = LocalModelClient::from_env();
    if model.enabled() {
        tracing::info!(
            "Local model integration enabled: {} at {}",
            model.model(),
            model.endpoint()
        );
    } else {
        tracing::info!("Local model integration disabled, using internal analysis engine");
    }

    let state = AppState::new(TreeStore::new(), model);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("prodtree server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await,
        None => serve(8081).await,
    }
}
