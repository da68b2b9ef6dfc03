//! Cubedeck CLI
//!
//! Command-line interface for controlling the Cubedeck view daemon.
//!
//! Commands are sent to the daemon as line-delimited JSON over the
//! loopback IPC socket; the daemon's response is printed to stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cubedeck_ipc::{IpcCommand, IpcResponse, DEFAULT_ADDR};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(name = "cubedeck-cli")]
#[command(author, version, about = "Control the Cubedeck view daemon")]
struct Cli {
    /// Daemon address to connect to
    #[arg(long, default_value = DEFAULT_ADDR)]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report a new window size
    Resize {
        /// Window width in pixels
        width: f64,
        /// Window height in pixels
        height: f64,
    },
    /// Footer panel commands
    Footer {
        #[command(subcommand)]
        action: FooterAction,
    },
    /// Theater mode (everything hidden but the time)
    Theater {
        #[command(subcommand)]
        action: SwitchAction,
    },
    /// Update the scramble sequence
    Scramble {
        #[command(subcommand)]
        action: ValueAction,
    },
    /// Update the memo time
    Memo {
        #[command(subcommand)]
        action: ValueAction,
    },
    /// Update the personal-best label
    Pb {
        #[command(subcommand)]
        action: ValueAction,
    },
    /// Timer text commands
    Time {
        #[command(subcommand)]
        action: TimeAction,
    },
    /// Puzzle dropdown commands
    Puzzle {
        #[command(subcommand)]
        action: PuzzleAction,
    },
    /// Record a completed solve
    TimeAdded {
        /// Solve time in milliseconds
        time_ms: u64,
        /// Memorization time in milliseconds
        #[arg(long)]
        memo_ms: Option<u64>,
    },
    /// Query daemon state
    Query {
        #[command(subcommand)]
        what: QueryType,
    },
    /// Stop the daemon
    Stop,
}

#[derive(Subcommand)]
enum FooterAction {
    /// Toggle between open and collapsed
    Toggle,
    /// Drag the resize handle to a height
    Resize {
        /// Requested height in pixels
        height: f64,
    },
}

#[derive(Subcommand)]
enum SwitchAction {
    /// Enable
    On,
    /// Disable
    Off,
}

#[derive(Subcommand)]
enum ValueAction {
    /// Set a new value
    Set {
        value: String,
    },
    /// Clear the value (fades the element out)
    Clear,
}

#[derive(Subcommand)]
enum TimeAction {
    /// Set the timer text
    Set {
        value: String,
    },
    /// Clear the timer text
    Clear,
    /// Start or stop the editing blinker
    Blinking {
        #[arg(value_parser = clap::value_parser!(bool))]
        on: bool,
    },
    /// Advance the editing blinker by one phase
    Blink,
}

#[derive(Subcommand)]
enum PuzzleAction {
    /// Replace the puzzle list
    SetAll {
        names: Vec<String>,
    },
    /// Select the active puzzle
    SetActive {
        name: String,
    },
    /// Rename the active puzzle
    Rename {
        name: String,
    },
    /// Remove a puzzle from the dropdown
    Remove {
        name: String,
    },
    /// Close the dropdown
    Close,
}

#[derive(Subcommand)]
enum QueryType {
    /// Get the current attribute snapshot
    Layout,
    /// Get the discrete view state
    State,
}

/// Translate the parsed CLI invocation into a wire command.
fn build_command(command: Commands) -> IpcCommand {
    match command {
        Commands::Resize { width, height } => IpcCommand::Resize { width, height },
        Commands::Footer { action } => match action {
            FooterAction::Toggle => IpcCommand::ToggleFooter,
            FooterAction::Resize { height } => IpcCommand::ResizeFooter { height },
        },
        Commands::Theater { action } => IpcCommand::SetTheaterMode {
            on: matches!(action, SwitchAction::On),
        },
        Commands::Scramble { action } => IpcCommand::SetScramble {
            scramble: match action {
                ValueAction::Set { value } => Some(value),
                ValueAction::Clear => None,
            },
        },
        Commands::Memo { action } => IpcCommand::SetMemo {
            memo: match action {
                ValueAction::Set { value } => Some(value),
                ValueAction::Clear => None,
            },
        },
        Commands::Pb { action } => IpcCommand::SetPb {
            pb: match action {
                ValueAction::Set { value } => Some(value),
                ValueAction::Clear => None,
            },
        },
        Commands::Time { action } => match action {
            TimeAction::Set { value } => IpcCommand::SetTime { time: Some(value) },
            TimeAction::Clear => IpcCommand::SetTime { time: None },
            TimeAction::Blinking { on } => IpcCommand::SetTimeBlinking { blinking: on },
            TimeAction::Blink => IpcCommand::BlinkTime,
        },
        Commands::Puzzle { action } => match action {
            PuzzleAction::SetAll { names } => IpcCommand::SetPuzzles { puzzles: names },
            PuzzleAction::SetActive { name } => IpcCommand::SetActivePuzzle { name },
            PuzzleAction::Rename { name } => IpcCommand::SetPuzzleName { name },
            PuzzleAction::Remove { name } => IpcCommand::RemovePuzzle { name },
            PuzzleAction::Close => IpcCommand::ClosePuzzles,
        },
        Commands::TimeAdded { time_ms, memo_ms } => IpcCommand::TimeAdded { time_ms, memo_ms },
        Commands::Query { what } => match what {
            QueryType::Layout => IpcCommand::QueryLayout,
            QueryType::State => IpcCommand::QueryState,
        },
        Commands::Stop => IpcCommand::Stop,
    }
}

/// Send one command and read the daemon's single-line response.
async fn send_command(addr: &str, cmd: &IpcCommand) -> Result<IpcResponse> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to daemon at {} (is it running?)", addr))?;
    let (reader, mut writer) = stream.into_split();

    let json = serde_json::to_string(cmd)? + "\n";
    writer.write_all(json.as_bytes()).await?;

    let mut line = String::new();
    BufReader::new(reader)
        .read_line(&mut line)
        .await
        .context("Failed to read response from daemon")?;

    serde_json::from_str(line.trim()).context("Invalid response from daemon")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = build_command(cli.command);

    match send_command(&cli.addr, &cmd).await? {
        IpcResponse::Ok => println!("ok"),
        IpcResponse::Error { message } => {
            eprintln!("error: {}", message);
            std::process::exit(1);
        }
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }

    Ok(())
}
