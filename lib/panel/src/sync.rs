use std::collections::VecDeque;

use log::{debug, error, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{sleep, timeout};
use transport::{HeatingTarget, Target};
use uuid::Uuid;

use crate::{Ack, Backend, BackendError, Event, RetryPolicy, SyncTarget};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SyncCommand {
    Light(u8),
    Heating(HeatingTarget),
}

/// A local change that still has to reach the hub.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SyncRequest {
    pub id: Uuid,
    pub target: SyncTarget,
    pub command: SyncCommand,
}

impl SyncRequest {
    pub fn new(target: SyncTarget, command: SyncCommand) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            command,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyncOutcome {
    pub request: SyncRequest,
    pub result: Result<Ack, BackendError>,
    pub attempts: u32,
}

impl From<SyncTarget> for Target {
    fn from(target: SyncTarget) -> Self {
        match target {
            SyncTarget::MasterLights | SyncTarget::MasterHeating => Target::Master,
            SyncTarget::RoomLight(room) | SyncTarget::RoomHeating(room) => Target::Room(room),
        }
    }
}

/// Delivers sync requests to the backend one at a time, in the order they were
/// queued, and reports each outcome back to the event loop.
///
/// A request is dropped without an outcome once a newer request for the same
/// target is queued, so only the latest value of a target reaches the hub.
pub struct SyncWorker<B> {
    backend: B,
    policy: RetryPolicy,
    requests: UnboundedReceiver<SyncRequest>,
    backlog: VecDeque<SyncRequest>,
    events: UnboundedSender<Event>,
}

impl<B: Backend> SyncWorker<B> {
    pub fn new(
        backend: B,
        policy: RetryPolicy,
        requests: UnboundedReceiver<SyncRequest>,
        events: UnboundedSender<Event>,
    ) -> Self {
        Self {
            backend,
            policy,
            requests,
            backlog: VecDeque::new(),
            events,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.next_request().await {
            let Some(outcome) = self.perform(request).await else {
                continue;
            };

            if self.events.send(Event::SyncCompleted(outcome)).is_err() {
                debug!("event loop is gone, stopping sync worker");
                return;
            }
        }

        debug!("sync queue closed");
    }

    async fn next_request(&mut self) -> Option<SyncRequest> {
        loop {
            self.drain_queue();

            match self.backlog.pop_front() {
                Some(request) if self.is_superseded(&request) => {
                    debug!("skipping superseded {:?} for {:?}", request.command, request.target);
                }
                Some(request) => return Some(request),
                None => {
                    let request = self.requests.recv().await?;
                    self.backlog.push_back(request);
                }
            }
        }
    }

    fn drain_queue(&mut self) {
        while let Ok(request) = self.requests.try_recv() {
            self.backlog.push_back(request);
        }
    }

    fn is_superseded(&self, request: &SyncRequest) -> bool {
        self.backlog
            .iter()
            .any(|queued| queued.target == request.target)
    }

    /// Returns `None` when a newer request for the same target shows up
    /// between attempts.
    async fn perform(&mut self, request: SyncRequest) -> Option<SyncOutcome> {
        let mut attempt = 1;

        loop {
            if attempt > 1 {
                self.drain_queue();

                if self.is_superseded(&request) {
                    debug!(
                        "abandoning {:?} for {:?} after {} attempts, superseded",
                        request.command,
                        request.target,
                        attempt - 1
                    );
                    return None;
                }
            }

            let result = match timeout(self.policy.timeout, self.send(&request)).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout),
            };

            match result {
                Ok(ack) => {
                    info!("synced {:?} for {:?}", request.command, request.target);

                    return Some(SyncOutcome {
                        request,
                        result: Ok(ack),
                        attempts: attempt,
                    });
                }
                Err(BackendError::Rejected) => {
                    error!("hub rejected {:?} for {:?}", request.command, request.target);

                    return Some(SyncOutcome {
                        request,
                        result: Err(BackendError::Rejected),
                        attempts: attempt,
                    });
                }
                Err(err) if attempt >= self.policy.max_attempts => {
                    error!(
                        "giving up on {:?} for {:?} after {attempt} attempts: {err}",
                        request.command, request.target
                    );

                    return Some(SyncOutcome {
                        request,
                        result: Err(err),
                        attempts: attempt,
                    });
                }
                Err(err) => {
                    let delay = self.policy.backoff(attempt);
                    warn!("sync attempt {attempt} failed: {err}, retrying in {delay:?}");

                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn send(&self, request: &SyncRequest) -> Result<Ack, BackendError> {
        let target = Target::from(request.target);

        match request.command {
            SyncCommand::Light(level) => self.backend.set_light(target, level).await,
            SyncCommand::Heating(heating) => self.backend.set_heating(target, heating).await,
        }
    }
}
