// SPDX-License-Identifier: MPL-2.0

//! Network speed overlay
//!
//! Polls the system's cumulative network counters once per second and shows
//! download and upload speed as two color-coded labels on a click-through
//! layer surface in the top-left corner. The panel applet toggles or exits
//! it through the shared cosmic-config entry.

mod config;
mod overlay;
mod speed;

use config::Config;
use overlay::{LayerOverlay, OverlayApp, OverlayPresenter};
use speed::{NOMINAL_TICK, SpeedSampler, SysinfoCounters};
use std::time::Duration;

use smithay_client_toolkit::reexports::{
    calloop::{
        EventLoop,
        timer::{TimeoutAction, Timer},
    },
    calloop_wayland_source::WaylandSource,
};
use wayland_client::{Connection, globals::registry_queue_init};

/// How often the shared config is checked for applet requests
const CONFIG_POLL_INTERVAL: Duration = Duration::from_millis(500);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let sampler = SpeedSampler::initialize(SysinfoCounters::new())
        .inspect_err(|err| log::error!("cannot read network counters: {err}"))?;

    // Start visible and drop any exit request left over from a previous run.
    let (config_handler, config) = match Config::load() {
        Ok((handler, loaded)) => {
            let config = Config {
                overlay_visible: true,
                exit_requested: false,
                overlay_running: true,
                ..loaded
            };
            config.store(&handler);
            (Some(handler), config)
        }
        Err(err) => {
            log::warn!("running without panel applet integration: {err}");
            (None, Config::default())
        }
    };

    log::info!(
        "overlay starting at x={}, y={}",
        config.overlay_x,
        config.overlay_y
    );

    // Connect to Wayland
    let conn = Connection::connect_to_env()?;
    let (globals, event_queue) = registry_queue_init::<OverlayApp>(&conn)?;
    let qh = event_queue.handle();

    let surface = LayerOverlay::bind(&globals, &qh, (config.overlay_y, config.overlay_x))?;
    let presenter = OverlayPresenter::new(sampler, surface);
    let mut app = OverlayApp::new(&globals, &qh, presenter, config, config_handler);

    let mut event_loop: EventLoop<OverlayApp> = EventLoop::try_new()?;
    let loop_handle = event_loop.handle();

    WaylandSource::new(conn, event_queue)
        .insert(loop_handle.clone())
        .map_err(|err| err.error)?;

    // Fixed 1 Hz tick, rescheduled after each run without drift correction
    loop_handle
        .insert_source(Timer::from_duration(NOMINAL_TICK), |_, _, app| {
            app.presenter.tick();
            TimeoutAction::ToDuration(NOMINAL_TICK)
        })
        .map_err(|err| err.error)?;

    loop_handle
        .insert_source(Timer::from_duration(CONFIG_POLL_INTERVAL), |_, _, app| {
            app.poll_config();
            TimeoutAction::ToDuration(CONFIG_POLL_INTERVAL)
        })
        .map_err(|err| err.error)?;

    while !app.exit {
        event_loop.dispatch(Duration::from_millis(100), &mut app)?;
    }

    app.finish();
    log::info!("overlay exited");
    Ok(())
}
