use std::sync::Arc;

use eliana::{
    forward_updates, load_initial_state, panel_config, read_input, run_panel, MqttBackend,
};
use panel::{ActionDispatcher, Backend, SyncWorker};
use transport::connect_mqtt;

use log::{error, info};
use tokio::io::BufReader;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task;

type ErasedError = Box<dyn std::error::Error + Send + Sync + 'static>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), ErasedError> {
    pretty_env_logger::init_timed();

    info!("eliana version {VERSION}");

    let config = panel_config(|name| std::env::var(name).ok())?;
    let client_id = std::env::var("PANEL_CLIENT_ID").unwrap_or_else(|_| "eliana".to_string());

    let mqtt_address = std::env::var("MQTT_ADDRESS").expect("set ENV variable MQTT_ADDRESS");
    let mqtt_username = std::env::var("MQTT_USER").expect("set ENV variable MQTT_USER");
    let mqtt_password = std::env::var("MQTT_PASS").expect("set ENV variable MQTT_PASS");
    let mqtt_client = connect_mqtt(mqtt_address, mqtt_username, mqtt_password, &client_id).await?;
    info!("connected mqtt as {client_id}");

    let (backend, router_handle) = MqttBackend::start(mqtt_client, client_id).await?;
    let backend = Arc::new(backend);

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (sync_tx, sync_rx) = mpsc::unbounded_channel();

    let mut dispatcher = ActionDispatcher::new(config, sync_tx);

    load_initial_state(&mut dispatcher, backend.as_ref(), config.retry.timeout).await;

    let worker = SyncWorker::new(backend.clone(), config.retry, sync_rx, events_tx.clone());
    task::spawn(worker.run());
    task::spawn(forward_updates(
        backend.subscribe_state_changes(),
        events_tx.clone(),
    ));

    let input_handle = task::spawn(read_input(BufReader::new(tokio::io::stdin()), events_tx));
    let panel_handle = task::spawn(run_panel(dispatcher, events_rx));

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = panel_handle => {},
        result = input_handle => match result? {
            Ok(()) => info!("input closed, exiting..."),
            Err(err) => error!("Error reading input: {err}"),
        },
        _ = router_handle => { error!("mqtt router stopped, exiting...") },
        _ = sigterm.recv() => { info!("got SIGTERM, exiting...") },
    };

    Ok(())
}
