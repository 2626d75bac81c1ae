use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Room;

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum HeatingTarget {
    Off,
    Degrees(f32),
}

impl HeatingTarget {
    pub fn is_off(&self) -> bool {
        matches!(self, HeatingTarget::Off)
    }
}

impl fmt::Display for HeatingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatingTarget::Off => write!(f, "off"),
            HeatingTarget::Degrees(value) if value.fract() == 0.0 => write!(f, "{value:.0}°C"),
            HeatingTarget::Degrees(value) => write!(f, "{value:.1}°C"),
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RoomState {
    pub light_level: u8,
    pub heating_target: HeatingTarget,
}

impl RoomState {
    pub const fn new(light_level: u8, heating_target: HeatingTarget) -> Self {
        Self {
            light_level,
            heating_target,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MasterToggles {
    pub lights_master: bool,
    pub heating_master: bool,
}

/// What a light or heating command applies to: the whole home or one room.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Master,
    Room(Room),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Master => write!(f, "master"),
            Target::Room(room) => write!(f, "{room}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_heating_target_serialization() {
        assert_eq!(serde_json::to_value(HeatingTarget::Off).unwrap(), json!("off"));
        assert_eq!(
            serde_json::to_value(HeatingTarget::Degrees(21.5)).unwrap(),
            json!({ "degrees": 21.5 })
        );

        let target: HeatingTarget = serde_json::from_value(json!({ "degrees": 24 })).unwrap();
        assert_eq!(target, HeatingTarget::Degrees(24.0));
    }

    #[test]
    fn test_heating_target_display() {
        assert_eq!(HeatingTarget::Off.to_string(), "off");
        assert_eq!(HeatingTarget::Degrees(24.0).to_string(), "24°C");
        assert_eq!(HeatingTarget::Degrees(21.5).to_string(), "21.5°C");
    }

    #[test]
    fn test_target_serialization() {
        assert_eq!(serde_json::to_value(Target::Master).unwrap(), json!("master"));
        assert_eq!(
            serde_json::to_value(Target::Room(Room::Kitchen)).unwrap(),
            json!({ "room": "kitchen" })
        );
    }

    #[test]
    fn test_room_state_deserialization() {
        let json = json!({
            "light_level": 50,
            "heating_target": { "degrees": 24.0 },
        });

        let state: RoomState = serde_json::from_value(json).unwrap();
        assert_eq!(state, RoomState::new(50, HeatingTarget::Degrees(24.0)));
    }
}
