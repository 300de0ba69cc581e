//! WebSocket watch session management.

use std::{io::Write, sync::Arc};

use futures_util::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use roundtable_server::infrastructure::dto::websocket::ServerEvent;

use crate::{
    api::ApiClient,
    command::Command,
    error::ClientError,
    formatter::MessageFormatter,
    typewriter::Typewriter,
    ui::{PROMPT, redisplay_prompt},
    watch::{Render, WatchState},
};

/// Spawn the blocking readline thread; lines arrive on the returned channel.
///
/// The thread outlives reconnects, so it is started once per process.
pub fn spawn_line_reader() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Watch `room_id` until the user quits (`Ok`) or the connection ends (`Err`)
pub async fn run_watch_session(
    api: &ApiClient,
    room_id: &str,
    typewriter: Arc<Typewriter>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    // 存在確認を HTTP で行い、削除済みの Room とネットワーク断を区別する
    api.get_room(room_id).await?;
    if let Ok(speed) = api.typing_speed().await {
        typewriter.set_speed(speed);
    }

    let url = api.watch_url(room_id);
    let (mut ws_stream, _response) = connect_async(&url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Watching room {}", room_id);
    println!("\nType 'help' for commands. Press Ctrl+D to exit.\n");

    // Spawn a task to render incoming events
    let room_id_for_read = room_id.to_string();
    let typewriter_for_read = Arc::clone(&typewriter);
    let mut read_task = tokio::spawn(async move {
        let mut state = WatchState::new();

        while let Some(message) = ws_stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            for render in state.apply(event) {
                                render_output(render, &typewriter_for_read).await;
                            }
                        }
                        Err(_) => print!("{}", MessageFormatter::format_raw_message(&text)),
                    }
                    redisplay_prompt();
                    if state.is_deleted() {
                        return ClientError::RoomNotFound(room_id_for_read);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        ClientError::ConnectionError("Connection lost".to_string())
    });

    // If either side completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            match read_result {
                Ok(error) => Err(error),
                Err(e) => Err(ClientError::ConnectionError(e.to_string())),
            }
        }
        command_result = command_loop(api, room_id, &typewriter, input_rx) => {
            read_task.abort();
            command_result
        }
    }
}

async fn render_output(render: Render, typewriter: &Typewriter) {
    match render {
        Render::Print(text) => print!("{}", text),
        Render::Typed { header, content } => {
            print!("{}", header);
            if let Err(e) = typewriter.type_out(&mut std::io::stdout(), &content).await {
                tracing::warn!("Failed to write message: {}", e);
            }
        }
    }
}

/// Read prompt lines until `quit` or end of input
async fn command_loop(
    api: &ApiClient,
    room_id: &str,
    typewriter: &Typewriter,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    while let Some(line) = input_rx.recv().await {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                redisplay_prompt();
                continue;
            }
        };
        if command == Command::Quit {
            return Ok(());
        }

        match execute_command(api, room_id, typewriter, command).await {
            Ok(output) => print!("{}", output),
            Err(ClientError::RoomNotFound(id)) => return Err(ClientError::RoomNotFound(id)),
            Err(e @ (ClientError::Http(_) | ClientError::ConnectionError(_))) => return Err(e),
            Err(e) => println!("{}", e),
        }
        std::io::stdout().flush().ok();
        redisplay_prompt();
    }

    // 入力が閉じた（Ctrl+C / Ctrl+D）場合は正常終了
    Ok(())
}

/// Run one prompt command against the server, returning what to print
async fn execute_command(
    api: &ApiClient,
    room_id: &str,
    typewriter: &Typewriter,
    command: Command,
) -> Result<String, ClientError> {
    let output = match command {
        Command::Start => {
            api.start_simulation(room_id).await?;
            String::new()
        }
        Command::Pause => {
            api.pause_simulation(room_id).await?;
            String::new()
        }
        Command::Add(agent_type) => {
            let agent_id = api.add_agent(room_id, &agent_type).await?;
            format!("Added agent {}\n", agent_id)
        }
        Command::Remove(agent_id) => {
            api.remove_agent(room_id, &agent_id).await?;
            format!("Removed agent {}\n", agent_id)
        }
        Command::Speed(chars_per_second) => {
            let speed = api.set_typing_speed(chars_per_second).await?;
            typewriter.set_speed(speed);
            format!("Typing speed set to {} chars/sec\n", speed)
        }
        Command::Agents => {
            let room = api.get_room(room_id).await?;
            MessageFormatter::format_agents(&room.agents)
        }
        Command::Help => MessageFormatter::format_help(),
        Command::Quit => String::new(),
    };
    Ok(output)
}
