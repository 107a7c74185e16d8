use std::sync::Arc;

use tracing::{error, info, warn};

use stash::store::{BlobStore, Database, KeyValueStore, MemoryStore, RedisStore};
use stash::thumbnail::ThumbnailWorker;
use stash::web::AppState;
use stash::{queue, Config};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = stash::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        stash::logging::init_console_only(&config.logging.level);
    }

    info!("STASH file stash server");

    if let Err(e) = run(config).await {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> stash::Result<()> {
    let db = Database::open(&config.database.path).await?;

    let kv: Arc<dyn KeyValueStore> = match &config.redis.url {
        Some(url) => {
            let store = RedisStore::connect(url)?;
            if !store.is_alive().await {
                warn!(url = %url, "redis not reachable at startup");
            }
            Arc::new(store)
        }
        None => {
            warn!("no [redis] url configured, sessions are in-process only");
            Arc::new(MemoryStore::new())
        }
    };

    let blobs = BlobStore::new(&config.storage.path)?;

    let (producer, consumer) = queue::channel();
    let worker = ThumbnailWorker::new(db.pool().clone(), blobs.clone());
    tokio::spawn(async move {
        consumer
            .run(|job| {
                let worker = worker.clone();
                async move { worker.handle(job).await }
            })
            .await;
    });

    let state = AppState::new(db, kv, blobs, producer);
    stash::web::server::serve(state, &config.server).await
}
