//! Cubedeck Daemon
//!
//! Main daemon process for the Cubedeck view layer.
//!
//! Responsibilities:
//! - Own the view state and the attribute animator
//! - Process frontend events and queries over IPC
//! - Drive animation ticks while attributes are in flight
//! - Play the one-shot entry animations at startup
//! - Persist user preferences

mod config;
mod load;
mod regions;
mod view;

use anyhow::{Context, Result};
use config::{Config, Prefs};
use cubedeck_core_view::{Attribute, WindowSize};
use cubedeck_ipc::{IpcCommand, IpcResponse, MAX_IPC_MESSAGE_SIZE};
use load::ENTRY_EFFECT_DURATION_MS;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use view::AppView;

/// Events that the daemon event loop processes.
enum DaemonEvent {
    /// An IPC command from a frontend or CLI client.
    IpcCommand {
        cmd: IpcCommand,
        responder: oneshot::Sender<IpcResponse>,
    },
    /// A one-shot entry animation finished playing.
    EntryEffectDone(load::EntryEffect),
    /// Animation tick (16ms intervals while attributes are in flight).
    AnimationTick,
    /// Shutdown signal.
    Shutdown,
}

/// Animation tick interval in milliseconds (~60 FPS).
const ANIMATION_TICK_MS: u64 = 16;

/// IPC read timeout - clients must send within this period.
const IPC_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Map an IPC command onto the view's transition entry points.
fn handle_command(view: &mut AppView, cmd: IpcCommand) -> IpcResponse {
    match cmd {
        IpcCommand::Resize { width, height } => match WindowSize::new(width, height) {
            Ok(window) => {
                view.resized(window);
                debug!("Window resized to {}x{}", window.width, window.height);
                IpcResponse::Ok
            }
            Err(e) => IpcResponse::error(format!("Invalid window size: {}", e)),
        },
        IpcCommand::ToggleFooter => {
            if view.loading() {
                return IpcResponse::error("View is still loading");
            }
            view.toggle_footer();
            info!("Footer toggled -> open: {}", view.state().footer_open);
            IpcResponse::Ok
        }
        IpcCommand::ResizeFooter { height } => {
            if view.loading() {
                return IpcResponse::error("View is still loading");
            }
            if !height.is_finite() {
                return IpcResponse::error(format!("Invalid footer height: {}", height));
            }
            view.resize_footer(height);
            IpcResponse::Ok
        }
        IpcCommand::SetTheaterMode { on } => {
            view.set_theater_mode(on);
            info!("Theater mode {}", if on { "enabled" } else { "disabled" });
            IpcResponse::Ok
        }
        IpcCommand::SetScramble { scramble } => {
            view.set_scramble(scramble.as_deref());
            IpcResponse::Ok
        }
        IpcCommand::SetMemo { memo } => {
            view.set_memo(memo.as_deref());
            IpcResponse::Ok
        }
        IpcCommand::SetPb { pb } => {
            view.set_pb(pb.as_deref());
            IpcResponse::Ok
        }
        IpcCommand::SetTime { time } => {
            view.set_time(time.as_deref());
            IpcResponse::Ok
        }
        IpcCommand::SetTimeBlinking { blinking } => {
            view.set_time_blinking(blinking);
            IpcResponse::Ok
        }
        IpcCommand::BlinkTime => {
            view.blink_time();
            IpcResponse::Ok
        }
        IpcCommand::SetPuzzles { puzzles } => {
            view.set_puzzles(puzzles);
            IpcResponse::Ok
        }
        IpcCommand::SetActivePuzzle { name } => {
            view.set_active_puzzle(&name);
            IpcResponse::Ok
        }
        IpcCommand::SetPuzzleName { name } => {
            view.set_puzzle_name(&name);
            IpcResponse::Ok
        }
        IpcCommand::RemovePuzzle { name } => {
            view.remove_puzzle(&name);
            IpcResponse::Ok
        }
        IpcCommand::ClosePuzzles => {
            view.close_puzzles();
            IpcResponse::Ok
        }
        IpcCommand::TimeAdded { time_ms, memo_ms } => {
            debug!("Time added: {}ms (memo: {:?})", time_ms, memo_ms);
            view.time_added();
            IpcResponse::Ok
        }
        IpcCommand::QueryLayout => {
            let attrs = view.snapshot();
            IpcResponse::Layout {
                footer_height: attrs.get(Attribute::FooterHeight),
                footer_closedness: attrs.get(Attribute::FooterClosedness),
                footer_offset: attrs.get(Attribute::FooterOffset),
                footer_opacity: attrs.get(Attribute::FooterOpacity),
                header_offset: attrs.get(Attribute::HeaderOffset),
                header_opacity: attrs.get(Attribute::HeaderOpacity),
                memo_opacity: attrs.get(Attribute::MemoOpacity),
                pb_opacity: attrs.get(Attribute::PbOpacity),
                scramble_opacity: attrs.get(Attribute::ScrambleOpacity),
                middle_height: attrs.get(Attribute::MiddleHeight),
                middle_y: attrs.get(Attribute::MiddleY),
                time_size: attrs.get(Attribute::TimeSize),
                time_y: attrs.get(Attribute::TimeY),
                animating: view.is_animating(),
            }
        }
        IpcCommand::QueryState => {
            let state = view.state();
            IpcResponse::ViewState {
                footer_height: state.footer_height,
                footer_open: state.footer_open,
                footer_visible: state.footer_visible,
                header_visible: state.header_visible,
                memo_visible: state.memo_visible,
                pb_available: state.pb_available,
                pb_visible: state.pb_visible,
                scramble_available: state.scramble_available,
                scramble_visible: state.scramble_visible,
                theater_mode: view.theater_mode(),
                loading: view.loading(),
            }
        }
        IpcCommand::Stop => IpcResponse::Ok,
    }
}

/// Run the IPC server, accepting connections and dispatching commands.
async fn run_ipc_server(listener: TcpListener, event_tx: mpsc::Sender<DaemonEvent>) {
    loop {
        let stream = match listener.accept().await {
            Ok((stream, _addr)) => stream,
            Err(e) => {
                error!("Failed to accept client connection: {}", e);
                continue;
            }
        };

        debug!("Client connected");

        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, event_tx).await {
                warn!("Client handler error: {}", e);
            }
        });
    }
}

/// Handle a single client connection: one command, one response.
async fn handle_client(stream: TcpStream, event_tx: mpsc::Sender<DaemonEvent>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let limited_reader = reader.take(MAX_IPC_MESSAGE_SIZE as u64);
    let mut reader = BufReader::new(limited_reader);
    let mut line = String::new();

    // Read command (single line of JSON) with timeout and size bound
    let read_result = tokio::time::timeout(IPC_READ_TIMEOUT, reader.read_line(&mut line)).await;
    let bytes_read = match read_result {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            // Timeout: client did not send in time, silently close
            return Ok(());
        }
    };
    if bytes_read == 0 {
        return Ok(()); // Client disconnected
    }

    let line = line.trim();
    debug!("Received command: {}", line);

    let cmd: IpcCommand = match serde_json::from_str(line) {
        Ok(cmd) => cmd,
        Err(e) => {
            let response = IpcResponse::error(format!("Invalid command: {}", e));
            write_response(&mut writer, &response).await?;
            return Ok(());
        }
    };

    // Stop gets special handling after the response is delivered.
    let is_stop = matches!(cmd, IpcCommand::Stop);

    let (resp_tx, resp_rx) = oneshot::channel();
    if event_tx
        .send(DaemonEvent::IpcCommand {
            cmd,
            responder: resp_tx,
        })
        .await
        .is_err()
    {
        let response = IpcResponse::error("Daemon is shutting down");
        write_response(&mut writer, &response).await?;
        return Ok(());
    }

    let response = match resp_rx.await {
        Ok(resp) => resp,
        Err(_) => IpcResponse::error("Failed to get response from daemon"),
    };
    write_response(&mut writer, &response).await?;

    if is_stop {
        let _ = event_tx.send(DaemonEvent::Shutdown).await;
    }

    Ok(())
}

/// Serialize a response onto the wire, newline-terminated.
async fn write_response(
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    response: &IpcResponse,
) -> Result<()> {
    let response_json = match serde_json::to_string(response) {
        Ok(json) => json + "\n",
        Err(e) => {
            warn!("Failed to serialize IPC response: {}", e);
            "{\"status\":\"error\",\"message\":\"Internal serialization error\"}\n".to_string()
        }
    };
    writer.write_all(response_json.as_bytes()).await?;
    Ok(())
}

/// Check if another daemon instance is already running by probing the
/// listen address.
async fn check_already_running(addr: &str) -> bool {
    TcpStream::connect(addr).await.is_ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (needed for log level)
    let mut config = Config::load().unwrap_or_else(|e| {
        // Can't use tracing yet, fall back to eprintln
        eprintln!("Failed to load configuration: {}. Using defaults.", e);
        Config::default()
    });

    // Initialize logging with configured log level
    let log_level = match config.behavior.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // default fallback for invalid values
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Validate and clamp config values
    let config_warnings = config.validate();
    for w in &config_warnings {
        warn!("Config: {} - {}", w.field, w.message);
    }

    info!("Cubedeck daemon starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.listen_addr.clone();

    // Check if another instance is already running
    if check_already_running(&addr).await {
        error!(
            "Another cubedeck daemon is already running ({} is in use)",
            addr
        );
        return Ok(());
    }

    // Load user preferences
    let prefs = Prefs::load();
    info!(
        "Preferences loaded: footer_open={}, footer_height={}",
        prefs.footer_open, prefs.footer_height
    );

    // Initialize the view with the configured window size
    let window = WindowSize::new(config.window.width, config.window.height)
        .context("Invalid configured window size")?;
    let state = Arc::new(Mutex::new(AppView::new(window, prefs)));

    info!(
        "View initialized: {}x{}, footer visible: {}",
        window.width,
        window.height,
        state.lock().await.state().footer_visible
    );

    // Create event channel
    let (event_tx, mut event_rx) = mpsc::channel::<DaemonEvent>(100);

    // Schedule the one-shot entry animations; each completion comes back
    // through the event loop and decrements the load barrier.
    {
        let view = state.lock().await;
        for effect in view.entry_effects() {
            let effect_tx = event_tx.clone();
            tokio::spawn(async move {
                let total = effect.delay_ms() + ENTRY_EFFECT_DURATION_MS;
                tokio::time::sleep(Duration::from_millis(total)).await;
                let _ = effect_tx.send(DaemonEvent::EntryEffectDone(effect)).await;
            });
        }
        info!("Playing {} entry animations", view.entry_effects().len());
    }

    // Spawn IPC server
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind IPC address {}", addr))?;
    let ipc_tx = event_tx.clone();
    tokio::spawn(async move {
        run_ipc_server(listener, ipc_tx).await;
    });

    info!("IPC server listening on {}", addr);

    // Install Ctrl+C handler so terminal kill triggers graceful shutdown
    {
        let shutdown_tx = event_tx.clone();
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Ctrl+C received, initiating shutdown...");
                let _ = shutdown_tx.send(DaemonEvent::Shutdown).await;
            }
        });
    }

    info!("Ready. Use cubedeck-cli to send commands.");

    // Animation timer handle - spawned and cancelled as needed
    let mut animation_timer_handle: Option<tokio::task::JoinHandle<()>> = None;
    let animation_running = Arc::new(std::sync::atomic::AtomicBool::new(false));

    // Helper function to start animation timer if not already running
    fn start_animation_timer(
        animation_tx: mpsc::Sender<DaemonEvent>,
        animation_running: Arc<std::sync::atomic::AtomicBool>,
    ) -> tokio::task::JoinHandle<()> {
        animation_running.store(true, std::sync::atomic::Ordering::SeqCst);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_millis(ANIMATION_TICK_MS));
            loop {
                interval.tick().await;
                if !animation_running.load(std::sync::atomic::Ordering::SeqCst) {
                    break;
                }
                if animation_tx.send(DaemonEvent::AnimationTick).await.is_err() {
                    break; // Channel closed
                }
            }
        })
    }

    // Main event loop
    loop {
        let event = match event_rx.recv().await {
            Some(e) => e,
            None => break,
        };

        match event {
            DaemonEvent::IpcCommand { cmd, responder } => {
                let should_animate = {
                    let mut view = state.lock().await;
                    let response = handle_command(&mut view, cmd);
                    // Log if client disconnected before receiving response
                    if responder.send(response).is_err() {
                        debug!("Client disconnected before receiving IPC response");
                    }
                    view.is_animating()
                };

                // Start animation timer if needed
                if should_animate && !animation_running.load(std::sync::atomic::Ordering::SeqCst) {
                    animation_timer_handle = Some(start_animation_timer(
                        event_tx.clone(),
                        animation_running.clone(),
                    ));
                }
            }
            DaemonEvent::EntryEffectDone(effect) => {
                let mut view = state.lock().await;
                if view.entry_effect_done(effect) {
                    info!("Entry animations complete, view ready");
                }
            }
            DaemonEvent::AnimationTick => {
                let still_animating = {
                    let mut view = state.lock().await;
                    view.tick(ANIMATION_TICK_MS as f64)
                };

                // Stop animation timer if all animations complete
                if !still_animating {
                    animation_running.store(false, std::sync::atomic::Ordering::SeqCst);
                    if let Some(handle) = animation_timer_handle.take() {
                        handle.abort();
                    }
                    debug!("All animations complete");
                }
            }
            DaemonEvent::Shutdown => {
                info!("Shutdown signal received");
                // Persist preferences one final time before exiting
                {
                    let view = state.lock().await;
                    view.prefs().save();
                }
                break;
            }
        }
    }

    // Stop the animation timer if still running
    animation_running.store(false, std::sync::atomic::Ordering::SeqCst);
    if let Some(handle) = animation_timer_handle.take() {
        handle.abort();
    }

    info!("Cubedeck daemon stopped");
    Ok(())
}
