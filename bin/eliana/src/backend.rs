use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{stream, Stream, StreamExt};
use log::{debug, error, info, trace, warn};
use paho_mqtt::{AsyncClient as MqClient, Message, MessageBuilder, Properties};
use paho_mqtt::{PropertyCode, QOS_1};
use panel::{Ack, Backend, BackendError, StateStream};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{self, JoinHandle};
use tokio_stream::wrappers::UnboundedReceiverStream;
use transport::action::{Action, ActionRequest, ActionResponse, ActionResult};
use transport::state::{StateRequest, StateResponse, StateUpdate};
use transport::{HeatingTarget, Target, Topic};
use uuid::Uuid;

use crate::Result;

enum Reply {
    State(StateResponse),
    Action(ActionResult),
}

type Pending = Arc<Mutex<HashMap<Uuid, oneshot::Sender<Reply>>>>;

fn lock(pending: &Pending) -> MutexGuard<'_, HashMap<Uuid, oneshot::Sender<Reply>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unavailable(err: impl fmt::Display) -> BackendError {
    BackendError::Unavailable(err.to_string())
}

/// Forgets a request once its caller stops waiting, answered or not.
struct PendingGuard<'a> {
    pending: &'a Pending,
    id: Uuid,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.id);
    }
}

/// Hub backend speaking MQTT v5 request/response.
///
/// Requests carry a `ResponseTopic` property naming this panel's response
/// topic. A router task matches responses to waiting requests by id and
/// forwards pushed state changes.
pub struct MqttBackend {
    mqtt: MqClient,
    client_id: String,
    pending: Pending,
    updates: Mutex<Option<mpsc::UnboundedReceiver<StateUpdate>>>,
}

impl MqttBackend {
    pub async fn start(mut mqtt: MqClient, client_id: String) -> Result<(Self, JoinHandle<()>)> {
        let stream = mqtt.get_stream(None);

        let topics = vec![
            Topic::State.to_string(),
            Topic::StateResponse(client_id.clone()).to_string(),
            Topic::ActionResponse(client_id.clone()).to_string(),
        ];
        mqtt.subscribe_many(&topics, &vec![QOS_1; topics.len()])
            .await?;

        info!("subscribed to topics: {topics:?}");

        let pending = Pending::default();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        let router = Router {
            pending: pending.clone(),
            updates: updates_tx,
        };
        let handle = task::spawn(route(mqtt.clone(), stream, topics, router));

        let backend = Self {
            mqtt,
            client_id,
            pending,
            updates: Mutex::new(Some(updates_rx)),
        };

        Ok((backend, handle))
    }

    async fn request<T>(
        &self,
        id: Uuid,
        topic: Topic,
        response_topic: Topic,
        payload: &T,
    ) -> std::result::Result<Reply, BackendError>
    where
        T: Serialize + Sync,
    {
        let payload = serde_json::to_vec(payload).map_err(unavailable)?;

        let mut props = Properties::new();
        props
            .push_string(PropertyCode::ResponseTopic, &response_topic.to_string())
            .map_err(unavailable)?;

        let message = MessageBuilder::new()
            .topic(topic.to_string())
            .properties(props)
            .payload(payload)
            .qos(QOS_1)
            .finalize();

        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(id, tx);
        let _guard = PendingGuard {
            pending: &self.pending,
            id,
        };

        self.mqtt.publish(message).await.map_err(unavailable)?;
        trace!("published {id} to {topic}");

        rx.await
            .map_err(|_| BackendError::Unavailable("response router stopped".to_string()))
    }

    async fn perform(&self, action: Action) -> std::result::Result<Ack, BackendError> {
        let request = ActionRequest {
            action_id: Uuid::new_v4(),
            action,
        };
        let response_topic = Topic::ActionResponse(self.client_id.clone());

        debug!("requesting {action:?} as {}", request.action_id);

        let reply = self
            .request(
                request.action_id,
                Topic::ActionRequest,
                response_topic,
                &request,
            )
            .await?;

        match reply {
            Reply::Action(ActionResult::Success) => Ok(Ack),
            Reply::Action(ActionResult::Failure) => Err(BackendError::Rejected),
            Reply::State(_) => Err(unavailable("state response to an action request")),
        }
    }
}

#[async_trait]
impl Backend for MqttBackend {
    async fn get_initial_state(&self) -> std::result::Result<StateResponse, BackendError> {
        let request = StateRequest {
            request_id: Uuid::new_v4(),
        };
        let response_topic = Topic::StateResponse(self.client_id.clone());

        let reply = self
            .request(
                request.request_id,
                Topic::StateRequest,
                response_topic,
                &request,
            )
            .await?;

        match reply {
            Reply::State(response) => Ok(response),
            Reply::Action(_) => Err(unavailable("action response to a state request")),
        }
    }

    async fn set_light(&self, target: Target, level: u8) -> std::result::Result<Ack, BackendError> {
        self.perform(Action::SetLight { target, level }).await
    }

    async fn set_heating(
        &self,
        target: Target,
        heating: HeatingTarget,
    ) -> std::result::Result<Ack, BackendError> {
        self.perform(Action::SetHeating { target, heating }).await
    }

    fn subscribe_state_changes(&self) -> StateStream {
        let updates = self
            .updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match updates {
            Some(updates) => UnboundedReceiverStream::new(updates).boxed(),
            None => {
                warn!("state changes are already subscribed");
                stream::empty().boxed()
            }
        }
    }
}

struct Router {
    pending: Pending,
    updates: mpsc::UnboundedSender<StateUpdate>,
}

impl Router {
    fn dispatch(&self, topic: &str, payload: &[u8]) {
        let topic = match Topic::from_str(topic) {
            Ok(topic) => topic,
            Err(err) => {
                warn!("message on unexpected topic {topic}: {err}");
                return;
            }
        };

        let result = match &topic {
            Topic::State => serde_json::from_slice(payload).map(|update| self.forward(update)),
            Topic::StateResponse(_) => serde_json::from_slice(payload)
                .map(|response: StateResponse| {
                    self.reply(response.request_id, Reply::State(response))
                }),
            Topic::ActionResponse(_) => serde_json::from_slice(payload)
                .map(|response: ActionResponse| {
                    self.reply(response.action_id, Reply::Action(response.result))
                }),
            Topic::StateRequest | Topic::ActionRequest => {
                trace!("ignoring request on {topic}");
                Ok(())
            }
        };

        if let Err(err) = result {
            error!("unable to parse message on {topic}: {err}");
        }
    }

    fn forward(&self, update: StateUpdate) {
        trace!("state update: {update:?}");

        if self.updates.send(update).is_err() {
            debug!("nobody listens for state updates");
        }
    }

    fn reply(&self, id: Uuid, reply: Reply) {
        let tx = lock(&self.pending).remove(&id);

        match tx {
            Some(tx) => {
                if tx.send(reply).is_err() {
                    debug!("request {id} was abandoned");
                }
            }
            None => debug!("no request waits for {id}"),
        }
    }
}

async fn route<S>(mqtt: MqClient, mut stream: S, topics: Vec<String>, router: Router)
where
    S: Stream<Item = Option<Message>> + Unpin,
{
    while let Some(msg_opt) = stream.next().await {
        if let Some(msg) = msg_opt {
            router.dispatch(msg.topic(), msg.payload());
        } else {
            error!("Lost MQTT connection. Attempting reconnect.");

            while let Err(err) = mqtt.reconnect().await {
                error!("Error MQTT reconnecting: {err}");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            if let Err(err) = mqtt
                .subscribe_many(&topics, &vec![QOS_1; topics.len()])
                .await
            {
                error!("Error resubscribing: {err}");
            }

            info!("Reconnected to MQTT");
        }
    }
}

#[cfg(test)]
mod tests {
    use panel::{MasterToggles, Room};
    use serde_json::json;

    use super::*;

    fn router() -> (Router, mpsc::UnboundedReceiver<StateUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let router = Router {
            pending: Pending::default(),
            updates,
        };

        (router, rx)
    }

    fn wait_for(router: &Router, id: Uuid) -> oneshot::Receiver<Reply> {
        let (tx, rx) = oneshot::channel();
        lock(&router.pending).insert(id, tx);
        rx
    }

    fn payload(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_state_update_is_forwarded() {
        let (router, mut rx) = router();

        router.dispatch(
            "panel/state",
            &payload(json!({ "room_light": { "room": "kitchen", "level": 40 } })),
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            StateUpdate::RoomLight {
                room: Room::Kitchen,
                level: 40
            }
        );
    }

    #[test]
    fn test_state_response_reaches_request() {
        let (router, _) = router();
        let id = Uuid::new_v4();
        let mut rx = wait_for(&router, id);

        router.dispatch(
            "panel/state/response/eliana",
            &payload(json!({
                "request_id": id,
                "master": { "lights_master": true, "heating_master": false },
                "rooms": {}
            })),
        );

        match rx.try_recv() {
            Ok(Reply::State(response)) => {
                assert_eq!(response.request_id, id);
                assert_eq!(
                    response.master,
                    MasterToggles {
                        lights_master: true,
                        heating_master: false
                    }
                );
            }
            _ => panic!("expected a state reply"),
        }
        assert!(lock(&router.pending).is_empty());
    }

    #[test]
    fn test_action_response_reaches_request() {
        let (router, _) = router();
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut rx = wait_for(&router, id);
        let mut other_rx = wait_for(&router, other);

        router.dispatch(
            "panel/action/response/eliana",
            &payload(json!({ "action_id": id, "result": "failure" })),
        );

        assert!(matches!(
            rx.try_recv(),
            Ok(Reply::Action(ActionResult::Failure))
        ));
        assert!(other_rx.try_recv().is_err());
        assert_eq!(lock(&router.pending).len(), 1);
    }

    #[test]
    fn test_garbage_is_ignored() {
        let (router, mut rx) = router();
        let id = Uuid::new_v4();
        let mut reply = wait_for(&router, id);

        router.dispatch("panel/state", b"not json");
        router.dispatch("elsewhere/state", &payload(json!({ "master_lights": true })));
        router.dispatch(
            "panel/action/response/eliana",
            &payload(json!({ "action_id": Uuid::new_v4(), "result": "success" })),
        );

        assert!(rx.try_recv().is_err());
        assert!(reply.try_recv().is_err());
    }

    #[test]
    fn test_pending_guard_forgets_request() {
        let pending = Pending::default();
        let id = Uuid::new_v4();
        let (tx, _rx) = oneshot::channel();
        lock(&pending).insert(id, tx);

        drop(PendingGuard {
            pending: &pending,
            id,
        });

        assert!(lock(&pending).is_empty());
    }
}
