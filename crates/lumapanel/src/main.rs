//! Lumapanel - Lighting visualization and control panel
//!
//! Binds the OSC listener, wires the inbound event queue to the tick loop
//! and runs until the operator quits. Failing to acquire the listening
//! endpoint is the only fatal startup error; everything else falls back and
//! keeps the panel alive.

#![warn(missing_docs)]

mod app;
mod logging;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossbeam_channel::unbounded;
use lumapanel_control::{OscListener, OscSender};
use lumapanel_io::AppConfig;
use std::io::BufRead;
use std::net::ToSocketAddrs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use view::LogView;

fn main() -> Result<()> {
    logging::init();

    let config = AppConfig::load();
    info!(
        "listening on {}, engine at {}:{}",
        config.listen_addr(),
        config.remote_ip,
        config.send_port
    );

    let (events_tx, events_rx) = unbounded();

    let mut listener = OscListener::bind(config.listen_addr(), events_tx)
        .with_context(|| format!("failed to bind OSC listener on {}", config.listen_addr()))?;
    listener.spawn().context("failed to start OSC listener")?;

    let remote = (config.remote_ip.as_str(), config.send_port)
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve engine address {}", config.remote_ip))?
        .next()
        .with_context(|| format!("no address for engine host {}", config.remote_ip))?;
    let sender = OscSender::new(remote, config.max_frame_rate_hz)
        .context("failed to create OSC sender")?;

    let project_path = config.project_path.clone();
    let mut app = App::new(config, events_rx, sender, Box::new(LogView::default()));
    if let Some(path) = project_path {
        app.load_project(std::path::Path::new(&path));
    }
    app.announce();

    // Quit on Enter or stdin EOF; the loop checks the flag between ticks
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        std::thread::Builder::new()
            .name("stdin-watcher".to_string())
            .spawn(move || {
                let mut line = String::new();
                let _ = std::io::stdin().lock().read_line(&mut line);
                stop.store(true, Ordering::Relaxed);
            })
            .context("failed to start stdin watcher")?;
    }

    info!("panel running, press Enter to quit");
    app.run(&stop);

    listener.shutdown();
    info!("shutdown complete");
    Ok(())
}
