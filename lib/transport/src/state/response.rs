use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{MasterToggles, Room, RoomState};

/// Full home state as known by the hub, sent once when the panel starts.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Response {
    pub request_id: uuid::Uuid,
    pub master: MasterToggles,
    pub rooms: BTreeMap<Room, RoomState>,
}
