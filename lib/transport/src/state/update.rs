use serde::{Deserialize, Serialize};

use crate::{HeatingTarget, Room};

/// A change pushed by the hub, e.g. because another client switched a light.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Update {
    MasterLights(bool),
    MasterHeating(bool),
    RoomLight { room: Room, level: u8 },
    RoomHeating { room: Room, heating: HeatingTarget },
}
