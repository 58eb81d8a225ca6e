use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use fairway_core::game_trait::FairwayGame;
use fairway_golf::MiniGolf;
use fairway_host::config::HostConfig;
use fairway_host::session::spawn_game_session;
use fairway_host::surface::{JsonLinesSurface, forward_commands, present_broadcast};

#[tokio::main]
async fn main() {
    // stdout carries frames; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = HostConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let game = MiniGolf::with_config(config.golf());
    tracing::info!(
        game = %game.metadata().name,
        tick_ms = config.golf().tick_ms,
        "Fairway starting"
    );

    let (cmd_tx, mut broadcast_rx, handle) = spawn_game_session(Box::new(game));
    let input_task = tokio::spawn(forward_commands(BufReader::new(tokio::io::stdin()), cmd_tx));

    let mut surface = JsonLinesSurface::new(std::io::stdout(), config.echo_events);
    while let Some(broadcast) = broadcast_rx.recv().await {
        match present_broadcast(&mut surface, &broadcast) {
            Ok(true) => {},
            Ok(false) => break,
            Err(e) => tracing::error!(error = %e, "Failed to present broadcast"),
        }
    }

    input_task.abort();
    match handle.await {
        Ok(summary) => tracing::info!(
            ticks = summary.ticks_run,
            shots = summary.timers_armed,
            "Fairway stopped"
        ),
        Err(e) => tracing::error!(error = %e, "Game session task failed"),
    }
}
