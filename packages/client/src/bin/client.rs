//! Roundtable watch client with reconnection support.
//!
//! Connects to a Roundtable server, prints the room's conversation as it
//! happens, and accepts commands (`start`, `pause`, `add <type>`, ...) at the
//! prompt. Automatically reconnects on disconnection (max 5 attempts with
//! 5 second interval). Exits when the room is deleted.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roundtable-client -- --room <room-id>
//! cargo run --bin roundtable-client -- -u http://127.0.0.1:8080 --no-animation
//! ```

use clap::Parser;

use roundtable_client::{ClientOptions, run_client};
use roundtable_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roundtable-client")]
#[command(about = "Watch and drive a Roundtable investment room", long_about = None)]
struct Args {
    /// Room to watch (defaults to the first room on the server)
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// Server URL
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Print new messages at once instead of typing them out
    #[arg(long)]
    no_animation: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let options = ClientOptions {
        url: args.url,
        room_id: args.room,
        animate: !args.no_animation,
    };

    // Run the client
    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
