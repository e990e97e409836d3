//! antguide-web - AntGuide community web service
//!
//! JSON API for the species encyclopedia, nuptial flight log, vendor
//! directory, forum, and suggestion moderation workflow.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use antguide_common::{config, db};
use antguide_web::images::ImageResolver;
use antguide_web::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "antguide-web", about = "AntGuide community web service")]
struct Args {
    /// Root folder for the database (overrides env and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 8420)]
    port: u16,

    /// Skip demo-content seeding on an empty database
    #[arg(long)]
    skip_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!(
        "Starting AntGuide web service (antguide-web) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder).context("Failed to create root folder")?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    // Explicit one-time seeding at startup; request handling never seeds
    if args.skip_seed {
        info!("Demo-content seeding skipped (--skip-seed)");
    } else {
        db::seed_demo_content(&pool)
            .await
            .context("Failed to seed demo content")?;
    }

    let images = ImageResolver::new().context("Failed to build HTTP clients")?;
    let state = AppState::new(pool, images);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("antguide-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
