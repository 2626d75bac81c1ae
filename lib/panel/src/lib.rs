mod backend;
pub use backend::{Ack, Backend, StateStream};

mod clock;
pub use clock::{Clock, ManualClock, MonotonicClock};

mod config;
pub use config::{Config, HeatingRange, RetryPolicy};

mod control;
pub use control::ControlId;

mod dispatcher;
pub use dispatcher::{ActionDispatcher, Effect, Event};

mod error;
pub use error::{BackendError, Error, ValidationError};

mod gesture;
pub use gesture::{Gesture, GestureClassifier, HOLD_THRESHOLD};

mod screen;
pub use screen::{Screen, ScreenStack};

mod store;
pub use store::{DeviceStateStore, SyncStatus, SyncTarget};

mod sync;
pub use sync::{SyncCommand, SyncOutcome, SyncRequest, SyncWorker};

pub use transport::{HeatingTarget, MasterToggles, Room, RoomConfig, RoomState};

pub type Result<T> = std::result::Result<T, Error>;
