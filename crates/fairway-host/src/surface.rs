//! A text rendering surface: pointer commands in, JSON lines out.
//!
//! Input lines look like `down 120 300`, `up 450 310`, `replay`, `restart` or
//! `quit`. Blank lines and lines starting with `#` are skipped.

use std::io::Write;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use fairway_core::game_trait::{GameEvent, GameMetadata};
use fairway_core::input::BoardInput;
use fairway_core::protocol::{ProtocolError, decode_frame};
use fairway_golf::GolfState;

use crate::session::{GameBroadcast, GameCommand};

#[derive(Debug)]
pub enum SurfaceError {
    UnknownCommand(String),
    BadArguments { command: String, reason: String },
    Protocol(ProtocolError),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(c) => write!(f, "unknown command: {c}"),
            Self::BadArguments { command, reason } => write!(f, "{command}: {reason}"),
            Self::Protocol(e) => write!(f, "frame error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

impl From<ProtocolError> for SurfaceError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<serde_json::Error> for SurfaceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for SurfaceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Where frames and events end up.
pub trait Surface {
    fn present_metadata(&mut self, metadata: &GameMetadata) -> Result<(), SurfaceError>;

    fn present_frame(&mut self, state: &GolfState) -> Result<(), SurfaceError>;

    fn present_event(&mut self, event: &GameEvent) -> Result<(), SurfaceError>;
}

/// Parse one input line. `Ok(None)` means the line carries no command.
pub fn parse_command(line: &str) -> Result<Option<GameCommand>, SurfaceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let command = match word.to_ascii_lowercase().as_str() {
        "down" => {
            let (x, y) = parse_point(word, &args)?;
            GameCommand::Input(BoardInput::PointerDown { x, y })
        },
        "up" => {
            let (x, y) = parse_point(word, &args)?;
            GameCommand::Input(BoardInput::PointerUp { x, y })
        },
        "replay" => {
            expect_no_args(word, &args)?;
            GameCommand::Input(BoardInput::Replay)
        },
        "restart" => {
            expect_no_args(word, &args)?;
            GameCommand::Restart
        },
        "quit" | "exit" => {
            expect_no_args(word, &args)?;
            GameCommand::Stop
        },
        _ => return Err(SurfaceError::UnknownCommand(word.to_string())),
    };
    Ok(Some(command))
}

fn parse_point(command: &str, args: &[&str]) -> Result<(f64, f64), SurfaceError> {
    let bad = |reason: String| SurfaceError::BadArguments {
        command: command.to_string(),
        reason,
    };
    let [x, y] = args else {
        return Err(bad(format!("expected 2 coordinates, got {}", args.len())));
    };
    let x: f64 = x.parse().map_err(|_| bad(format!("invalid x coordinate {x:?}")))?;
    let y: f64 = y.parse().map_err(|_| bad(format!("invalid y coordinate {y:?}")))?;
    Ok((x, y))
}

fn expect_no_args(command: &str, args: &[&str]) -> Result<(), SurfaceError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(SurfaceError::BadArguments {
            command: command.to_string(),
            reason: format!("takes no arguments, got {}", args.len()),
        })
    }
}

/// Read command lines until EOF, `quit`, or the session goes away.
///
/// Malformed lines are logged and skipped. EOF sends `Drain` so a scripted
/// final shot still plays out; `quit` sends `Stop`.
pub async fn forward_commands<R>(reader: R, cmd_tx: mpsc::UnboundedSender<GameCommand>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read command line");
                break;
            },
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                let stop = command == GameCommand::Stop;
                if cmd_tx.send(command).is_err() || stop {
                    return;
                }
            },
            Ok(None) => {},
            Err(e) => tracing::warn!(line = %line, error = %e, "Dropped malformed command"),
        }
    }
    let _ = cmd_tx.send(GameCommand::Drain);
}

/// Hand one broadcast to `surface`. Returns `false` once the game has ended.
pub fn present_broadcast<S: Surface>(
    surface: &mut S,
    broadcast: &GameBroadcast,
) -> Result<bool, SurfaceError> {
    match broadcast {
        GameBroadcast::Started(metadata) => surface.present_metadata(metadata)?,
        GameBroadcast::Frame(data) => {
            let state: GolfState = decode_frame(data)?;
            surface.present_frame(&state)?;
        },
        GameBroadcast::Event(event) => surface.present_event(event)?,
        GameBroadcast::GameEnded => return Ok(false),
    }
    Ok(true)
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum OutputLine<'a> {
    Game { name: &'a str, description: &'a str },
    Frame { state: &'a GolfState },
    Event { event: &'a GameEvent },
}

/// Writes one JSON object per line to any writer.
pub struct JsonLinesSurface<W: Write> {
    out: W,
    echo_events: bool,
}

impl<W: Write> JsonLinesSurface<W> {
    pub fn new(out: W, echo_events: bool) -> Self {
        Self { out, echo_events }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &OutputLine<'_>) -> Result<(), SurfaceError> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Surface for JsonLinesSurface<W> {
    fn present_metadata(&mut self, metadata: &GameMetadata) -> Result<(), SurfaceError> {
        self.write_line(&OutputLine::Game {
            name: &metadata.name,
            description: &metadata.description,
        })
    }

    fn present_frame(&mut self, state: &GolfState) -> Result<(), SurfaceError> {
        self.write_line(&OutputLine::Frame { state })
    }

    fn present_event(&mut self, event: &GameEvent) -> Result<(), SurfaceError> {
        if !self.echo_events {
            return Ok(());
        }
        self.write_line(&OutputLine::Event { event })
    }
}
