//! Roundtable simulation server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roundtable-server
//! cargo run --bin roundtable-server -- --host 0.0.0.0 --port 3000 --data-dir ./data
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use roundtable_server::{
    domain::{RoomRepository, TemplateMessageGenerator, TypingSpeed},
    infrastructure::{
        event_publisher::BroadcastRoomEventPublisher, repository::InMemoryRoomRepository,
        storage::JsonFileStorage,
    },
    scheduler::{SchedulerConfig, TurnScheduler},
    ui::{Server, state::AppState},
};
use roundtable_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "roundtable-server")]
#[command(about = "Investment room simulation server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Directory holding investmentRooms.json
    #[arg(short = 'd', long, default_value = "./data")]
    data_dir: PathBuf,

    /// Characters per second used to pace the speaking phase
    #[arg(long, default_value = "30")]
    typing_speed: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let typing_speed = match TypingSpeed::new(args.typing_speed) {
        Ok(speed) => speed,
        Err(e) => {
            tracing::error!("Invalid --typing-speed: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize dependencies in order:
    // 1. Storage + Repository
    // 2. Event channel
    // 3. Scheduler
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Load rooms from disk
    let clock = Arc::new(SystemClock);
    let storage = Arc::new(JsonFileStorage::new(&args.data_dir));
    tracing::info!("Using data directory {}", storage.dir().display());
    let repository = Arc::new(InMemoryRoomRepository::new(storage, clock.clone()));
    repository.init_rooms().await;

    // 2. Create the event channel shared by the scheduler and WebSocket watchers
    let events = Arc::new(BroadcastRoomEventPublisher::default());

    // 3. Create the scheduler (one session per process)
    let scheduler = Arc::new(TurnScheduler::new(
        repository.clone(),
        events.clone(),
        Arc::new(TemplateMessageGenerator),
        clock,
        SchedulerConfig::default(),
        typing_speed,
    ));
    tracing::info!("Session {} started", scheduler.session_id());

    // 4 & 5. Create and run the server
    let app_state = Arc::new(AppState::new(
        repository.clone(),
        scheduler.clone(),
        events,
    ));
    let result = Server::new(app_state).run(args.host, args.port).await;

    // Stop every room and flush the final state
    scheduler.pause_all().await;
    repository.save_rooms().await;

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
