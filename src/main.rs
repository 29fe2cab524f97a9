mod config;
mod stdio;

use std::{error::Error, io};

use minesweeper_plugin::{HostEvent, MinesweeperPlugin};
use tracing::info;

use crate::{
    config::Settings,
    stdio::{JsonLinesHost, dispatch, serve},
};

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let settings = Settings::from_env();
    info!(
        "Starting minesweeper host: {}x{} with {} mines, {:?} placement",
        settings.params.width, settings.params.height, settings.params.mines, settings.placement
    );

    let host = JsonLinesHost::new(io::stdout().lock());
    let mut plugin =
        MinesweeperPlugin::with_rng(host, settings.rng()).with_placement(settings.placement);

    dispatch(&mut plugin, HostEvent::Open)?;
    for event in settings.initial_events() {
        dispatch(&mut plugin, event)?;
    }

    serve(io::stdin().lock(), &mut plugin)?;

    dispatch(&mut plugin, HostEvent::Close)?;
    info!("Input closed, shutting down");
    Ok(())
}
