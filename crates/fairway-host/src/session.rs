use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use fairway_core::game_trait::{FairwayGame, GameEvent, GameMetadata};
use fairway_core::input::BoardInput;
use fairway_core::protocol::wrap_payload;

/// Commands sent from a surface to the game task.
#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    Input(BoardInput),
    /// Put the board back to its starting state, whatever it is doing.
    Restart,
    /// Let any shot in flight finish, then stop. Sent when input runs out.
    Drain,
    Stop,
}

/// Broadcasts sent from the game task to the surface.
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    /// Sent once, before the first frame.
    Started(GameMetadata),
    /// Version-prefixed MessagePack state frame.
    Frame(Bytes),
    Event(GameEvent),
    /// The game task has exited.
    GameEnded,
}

/// Counters returned when the game task exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks_run: u64,
    /// One per shot; a shot never gets a second timer.
    pub timers_armed: u32,
}

/// Spawn the game task.
/// Returns the command sender, broadcast receiver and task handle.
pub fn spawn_game_session(
    mut game: Box<dyn FairwayGame>,
) -> (
    mpsc::UnboundedSender<GameCommand>,
    mpsc::UnboundedReceiver<GameBroadcast>,
    JoinHandle<SessionSummary>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle =
        tokio::spawn(async move { run_game_session(&mut *game, cmd_rx, broadcast_tx).await });

    (cmd_tx, broadcast_rx, handle)
}

/// Own the game and drive it from commands and a per-shot tick timer.
///
/// The timer exists only while the game reports `is_ticking()`: it is armed on
/// the input that starts a shot and dropped on the tick that ends it. Once
/// draining, commands are no longer read and the loop exits when the shot
/// settles.
pub async fn run_game_session(
    game: &mut dyn FairwayGame,
    mut cmd_rx: mpsc::UnboundedReceiver<GameCommand>,
    broadcast_tx: mpsc::UnboundedSender<GameBroadcast>,
) -> SessionSummary {
    game.init();
    let metadata = game.metadata();
    tracing::info!(game = %metadata.name, "Game session started");

    let mut summary = SessionSummary::default();
    let mut timer: Option<Interval> = None;
    let mut draining = false;
    let _ = broadcast_tx.send(GameBroadcast::Started(metadata.clone()));
    broadcast_frame(game, &broadcast_tx);

    loop {
        tokio::select! {
            _ = next_tick(&mut timer) => {
                summary.ticks_run += 1;
                let events = game.update();
                broadcast_frame(game, &broadcast_tx);
                broadcast_events(events, &broadcast_tx);

                if !game.is_ticking() {
                    timer = None;
                    tracing::debug!(ticks = summary.ticks_run, "Tick timer cancelled");
                    if draining {
                        break;
                    }
                }
            }
            cmd = cmd_rx.recv(), if !draining => {
                match cmd {
                    Some(GameCommand::Input(input)) => {
                        let events = game.apply_input(&input);
                        if events.is_empty() {
                            continue;
                        }
                        broadcast_events(events, &broadcast_tx);
                        broadcast_frame(game, &broadcast_tx);

                        if game.is_ticking() && timer.is_none() {
                            timer = Some(arm_timer(game));
                            summary.timers_armed += 1;
                        }
                    },
                    Some(GameCommand::Restart) => {
                        game.init();
                        timer = None;
                        broadcast_frame(game, &broadcast_tx);
                    },
                    Some(GameCommand::Drain) => {
                        if timer.is_none() {
                            break;
                        }
                        tracing::debug!("Draining until the shot settles");
                        draining = true;
                    },
                    Some(GameCommand::Stop) | None => {
                        break;
                    },
                }
            }
        }
    }

    tracing::info!(
        ticks = summary.ticks_run,
        shots = summary.timers_armed,
        "Game session ended"
    );
    let _ = broadcast_tx.send(GameBroadcast::GameEnded);
    summary
}

/// First tick fires one full period after the shot, not immediately.
fn arm_timer(game: &dyn FairwayGame) -> Interval {
    let period = game.tick_interval();
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        },
        None => std::future::pending::<()>().await,
    }
}

fn broadcast_frame(game: &dyn FairwayGame, broadcast_tx: &mpsc::UnboundedSender<GameBroadcast>) {
    match wrap_payload(&game.serialize_state()) {
        Ok(frame) => {
            let _ = broadcast_tx.send(GameBroadcast::Frame(Bytes::from(frame)));
        },
        Err(e) => tracing::error!(error = %e, "Failed to encode state frame"),
    }
}

fn broadcast_events(events: Vec<GameEvent>, broadcast_tx: &mpsc::UnboundedSender<GameBroadcast>) {
    for event in events {
        let _ = broadcast_tx.send(GameBroadcast::Event(event));
    }
}
