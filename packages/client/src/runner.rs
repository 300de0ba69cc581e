//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use crate::{
    api::ApiClient,
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::{run_watch_session, spawn_line_reader},
    typewriter::Typewriter,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;
const DEFAULT_TYPING_SPEED: u32 = 30;

/// Options from the command line
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Server root, e.g. `http://127.0.0.1:8080`
    pub url: String,
    /// Room to watch; the first listed room when `None`
    pub room_id: Option<String>,
    pub animate: bool,
}

/// Run the watch client with reconnection logic
pub async fn run_client(options: ClientOptions) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::new(&options.url);
    let room_id = match options.room_id {
        Some(room_id) => room_id,
        None => pick_first_room(&api).await?,
    };
    let typewriter = Arc::new(Typewriter::new(options.animate, DEFAULT_TYPING_SPEED));
    let mut input_rx = spawn_line_reader();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to watch room {} at {} (attempt {}/{})",
            room_id,
            api.base_url(),
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_watch_session(&api, &room_id, Arc::clone(&typewriter), &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If the session ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    return Err(Box::new(e));
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

async fn pick_first_room(api: &ApiClient) -> Result<String, ClientError> {
    let rooms = api.list_rooms().await?;
    let first = rooms
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::RoomNotFound("(no rooms on server)".to_string()))?;
    tracing::info!("No room given, watching '{}' ({})", first.title, first.id);
    Ok(first.id)
}
