use std::time::Duration;

use futures_util::StreamExt;
use log::{debug, info, log_enabled, warn, Level};
use panel::{ActionDispatcher, Backend, Clock, Effect, Event, Room, StateStream, SyncTarget};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::timeout;

mod backend;
pub use backend::MqttBackend;

mod config;
pub use config::panel_config;

mod error;
pub use error::Error;

mod input;
pub use input::{parse_line, read_input};

pub type Result<T> = std::result::Result<T, Error>;

/// Seeds the dispatcher from the hub, or leaves the defaults in place and
/// starts offline when the hub fails or does not answer within `wait`.
/// Returns whether the state was loaded.
pub async fn load_initial_state<B, C>(
    dispatcher: &mut ActionDispatcher<C>,
    backend: &B,
    wait: Duration,
) -> bool
where
    B: Backend + ?Sized,
    C: Clock,
{
    match timeout(wait, backend.get_initial_state()).await {
        Ok(Ok(initial)) => {
            info!("received initial state");
            dispatcher.seed(&initial);
            true
        }
        Ok(Err(err)) => {
            warn!("unable to fetch initial state, starting offline: {err}");
            dispatcher.set_offline(true);
            false
        }
        Err(_) => {
            warn!("initial state request timed out, starting offline");
            dispatcher.set_offline(true);
            false
        }
    }
}

/// The panel's event loop. Returns once every event producer is gone.
pub async fn run_panel<C: Clock>(
    mut dispatcher: ActionDispatcher<C>,
    mut events: UnboundedReceiver<Event>,
) {
    while let Some(event) = events.recv().await {
        let effect = dispatcher.handle(event);

        if effect == Effect::None {
            continue;
        }

        info!("{effect:?}");
        log_snapshot(&dispatcher);
    }

    debug!("event loop finished");
}

pub async fn forward_updates(mut updates: StateStream, events: UnboundedSender<Event>) {
    while let Some(update) = updates.next().await {
        if events.send(Event::Remote(update)).is_err() {
            return;
        }
    }

    warn!("state update stream ended");
}

fn log_snapshot<C>(dispatcher: &ActionDispatcher<C>) {
    if !log_enabled!(Level::Debug) {
        return;
    }

    let master = dispatcher.master_snapshot();
    debug!(
        "screen {}, lights master {}, heating master {}{}",
        dispatcher.current_screen(),
        master.lights_master,
        master.heating_master,
        if dispatcher.is_offline() { ", offline" } else { "" }
    );

    for room in Room::ALL {
        let light = dispatcher.sync_status(SyncTarget::RoomLight(room));

        if room.is_heated() {
            debug!(
                "  {}: {} (light {light:?}, heating {:?})",
                room.name(),
                dispatcher.status_label(room).replace('\n', " "),
                dispatcher.sync_status(SyncTarget::RoomHeating(room))
            );
        } else {
            debug!(
                "  {}: {} (light {light:?})",
                room.name(),
                dispatcher.status_label(room)
            );
        }
    }
}
