use std::time::Duration;

use log::debug;
use paho_mqtt as mqtt;

/// Connects an MQTT v5 client; v5 is required for response-topic properties.
pub async fn connect_mqtt(
    address: String,
    username: String,
    password: String,
    client_id: &str,
) -> mqtt::Result<mqtt::AsyncClient> {
    let secure = address.starts_with("ssl://") || address.starts_with("mqtts://");

    let create_opts = mqtt::CreateOptionsBuilder::new()
        .server_uri(address)
        .client_id(client_id)
        .mqtt_version(mqtt::MQTT_VERSION_5)
        .finalize();

    let client = mqtt::AsyncClient::new(create_opts)?;

    let mut conn_opts = mqtt::ConnectOptionsBuilder::new_v5();
    conn_opts
        .keep_alive_interval(Duration::from_secs(30))
        .clean_start(false)
        .user_name(username)
        .password(password);

    if secure {
        conn_opts.ssl_options(mqtt::SslOptions::new());
    }

    client.connect(conn_opts.finalize()).await?;
    debug!("connected to mqtt as {client_id}");

    Ok(client)
}
