use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use transport::state::{StateResponse, StateUpdate};
use transport::{HeatingTarget, Target};

use crate::BackendError;

pub type StateStream = BoxStream<'static, StateUpdate>;

/// Acknowledgement of an accepted light or heating command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ack;

/// The home-automation hub as seen from the panel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_initial_state(&self) -> Result<StateResponse, BackendError>;

    async fn set_light(&self, target: Target, level: u8) -> Result<Ack, BackendError>;

    async fn set_heating(
        &self,
        target: Target,
        heating: HeatingTarget,
    ) -> Result<Ack, BackendError>;

    /// Changes pushed by the hub. The stream can be taken once; later calls
    /// return an empty stream.
    fn subscribe_state_changes(&self) -> StateStream;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn get_initial_state(&self) -> Result<StateResponse, BackendError> {
        (**self).get_initial_state().await
    }

    async fn set_light(&self, target: Target, level: u8) -> Result<Ack, BackendError> {
        (**self).set_light(target, level).await
    }

    async fn set_heating(
        &self,
        target: Target,
        heating: HeatingTarget,
    ) -> Result<Ack, BackendError> {
        (**self).set_heating(target, heating).await
    }

    fn subscribe_state_changes(&self) -> StateStream {
        (**self).subscribe_state_changes()
    }
}
