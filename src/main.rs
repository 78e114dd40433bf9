//! Waymark - goal-progress migration for journal entries

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waymark::{
    classifier::{GoalClassifier, LlmBackend, OpenAiBackend},
    config::Args,
    db::{MigrationDb, MongoClient},
    migration::{report, MigrationRunner},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("waymark={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Waymark - goal progress migration");
    info!("======================================");
    info!("MongoDB: {} (db '{}')", args.mongodb_uri, args.mongodb_db);
    info!("Classifier endpoint: {}", args.base_url());
    info!("Classifier model: {}", args.openai_model);
    info!("Delay per entry: {}ms", args.request_delay_ms);
    info!("This run links unmigrated journal entries to goals and creates");
    info!("one progress record per accepted classification.");
    info!("One classification call is made per entry: large backlogs take");
    info!("time and incur service cost. Interrupting is safe; a re-run");
    info!("resumes with whatever is still unlinked.");
    info!("======================================");

    // Connect to MongoDB; unreachable store is fatal before any processing
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let db = Arc::new(MigrationDb::new(&mongo).await?);

    // Missing credential is a normal condition: the run still completes,
    // every entry resolves to no-match without any service traffic.
    let backend: Option<Arc<dyn LlmBackend>> = match &args.openai_api_key {
        Some(key) => {
            let backend = OpenAiBackend::new(args.base_url(), &args.openai_model, Some(key.clone()));
            if backend.is_available().await {
                info!("Classification backend reachable ({})", backend.id());
            } else {
                warn!("Classification backend did not respond to a probe; calls may fail");
            }
            Some(Arc::new(backend))
        }
        None => {
            warn!("OPENAI_API_KEY not set: entries will be counted, none will be linked");
            None
        }
    };

    let runner = MigrationRunner::new(
        db.clone(),
        db.clone(),
        db,
        GoalClassifier::new(backend),
        Duration::from_millis(args.request_delay_ms),
    );

    let stats = runner.run().await?;

    report::render(&stats);

    Ok(())
}
