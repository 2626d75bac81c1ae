use serde::{Deserialize, Serialize};
use str_derive::Str;

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Room {
    Bedroom,
    LivingRoom,
    Entrance,
    Hallway,
    Kitchen,
}

/// Static description of a room as shown on the panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoomConfig {
    pub room: Room,
    pub name: &'static str,
    pub heated: bool,
}

static ROOMS: [RoomConfig; 5] = [
    RoomConfig {
        room: Room::Bedroom,
        name: "Bedroom",
        heated: true,
    },
    RoomConfig {
        room: Room::LivingRoom,
        name: "Living Room",
        heated: true,
    },
    RoomConfig {
        room: Room::Entrance,
        name: "Entrance",
        heated: false,
    },
    RoomConfig {
        room: Room::Hallway,
        name: "Hallway",
        heated: false,
    },
    RoomConfig {
        room: Room::Kitchen,
        name: "Kitchen",
        heated: false,
    },
];

impl Room {
    pub fn config(&self) -> &'static RoomConfig {
        &ROOMS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn is_heated(&self) -> bool {
        self.config().heated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_config_table_matches_rooms() {
        for room in Room::ALL {
            assert_eq!(room.config().room, room);
        }
    }

    #[test]
    fn test_only_bedroom_and_living_room_are_heated() {
        let heated: Vec<Room> = Room::ALL.into_iter().filter(Room::is_heated).collect();
        assert_eq!(heated, vec![Room::Bedroom, Room::LivingRoom]);
    }

    #[test]
    fn test_names() {
        assert_eq!(Room::LivingRoom.name(), "Living Room");
        assert_eq!(Room::Kitchen.name(), "Kitchen");
    }

    #[test]
    fn test_str() {
        assert_eq!(Room::LivingRoom.to_string(), "living_room");
        assert_eq!(Room::from_str("hallway").unwrap(), Room::Hallway);
        assert!(Room::from_str("garage").is_err());
    }
}
