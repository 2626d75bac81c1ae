use std::fmt;
use std::str::FromStr;

use serde::de::{value, Error};
use transport::Room;

use crate::Screen;

/// Identity of an interactive element on the panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    HotZone(Room),
    MasterLight,
    MasterHeating,
    Back,
    LightUp(Room),
    LightDown(Room),
    HeatingUp(Room),
    HeatingDown(Room),
    HeatingPower(Room),
}

impl ControlId {
    pub fn room(&self) -> Option<Room> {
        match self {
            ControlId::HotZone(room)
            | ControlId::LightUp(room)
            | ControlId::LightDown(room)
            | ControlId::HeatingUp(room)
            | ControlId::HeatingDown(room)
            | ControlId::HeatingPower(room) => Some(*room),
            ControlId::MasterLight | ControlId::MasterHeating | ControlId::Back => None,
        }
    }

    /// Whether the control is drawn on `screen`.
    pub fn is_on(&self, screen: Screen) -> bool {
        match self {
            ControlId::HotZone(_) | ControlId::MasterLight | ControlId::MasterHeating => {
                screen == Screen::Home
            }
            ControlId::Back => true,
            ControlId::LightUp(room) | ControlId::LightDown(room) => screen.room() == Some(*room),
            ControlId::HeatingUp(room)
            | ControlId::HeatingDown(room)
            | ControlId::HeatingPower(room) => screen.room() == Some(*room) && room.is_heated(),
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::HotZone(room) => write!(f, "hot_zone/{room}"),
            ControlId::MasterLight => write!(f, "master_light"),
            ControlId::MasterHeating => write!(f, "master_heating"),
            ControlId::Back => write!(f, "back"),
            ControlId::LightUp(room) => write!(f, "light_up/{room}"),
            ControlId::LightDown(room) => write!(f, "light_down/{room}"),
            ControlId::HeatingUp(room) => write!(f, "heating_up/{room}"),
            ControlId::HeatingDown(room) => write!(f, "heating_down/{room}"),
            ControlId::HeatingPower(room) => write!(f, "heating_power/{room}"),
        }
    }
}

impl FromStr for ControlId {
    type Err = value::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "master_light" => return Ok(ControlId::MasterLight),
            "master_heating" => return Ok(ControlId::MasterHeating),
            "back" => return Ok(ControlId::Back),
            _ => (),
        }

        let (kind, room) = s
            .split_once('/')
            .ok_or_else(|| value::Error::custom(format!("unknown control `{s}`")))?;
        let room = Room::from_str(room)?;

        match kind {
            "hot_zone" => Ok(ControlId::HotZone(room)),
            "light_up" => Ok(ControlId::LightUp(room)),
            "light_down" => Ok(ControlId::LightDown(room)),
            "heating_up" => Ok(ControlId::HeatingUp(room)),
            "heating_down" => Ok(ControlId::HeatingDown(room)),
            "heating_power" => Ok(ControlId::HeatingPower(room)),
            _ => Err(value::Error::custom(format!("unknown control kind `{kind}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            ControlId::from_str("hot_zone/kitchen").unwrap(),
            ControlId::HotZone(Room::Kitchen)
        );
        assert_eq!(
            ControlId::from_str("heating_power/living_room").unwrap(),
            ControlId::HeatingPower(Room::LivingRoom)
        );
        assert_eq!(ControlId::from_str("back").unwrap(), ControlId::Back);

        assert!(ControlId::from_str("hot_zone/garage").is_err());
        assert!(ControlId::from_str("dimmer/kitchen").is_err());
        assert!(ControlId::from_str("kitchen").is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let controls = [
            ControlId::HotZone(Room::Hallway),
            ControlId::MasterHeating,
            ControlId::LightDown(Room::Entrance),
            ControlId::HeatingUp(Room::Bedroom),
        ];

        for control in controls {
            assert_eq!(ControlId::from_str(&control.to_string()).unwrap(), control);
        }
    }

    #[test]
    fn test_screen_placement() {
        assert!(ControlId::HotZone(Room::Kitchen).is_on(Screen::Home));
        assert!(!ControlId::HotZone(Room::Kitchen).is_on(Screen::Kitchen));

        assert!(ControlId::Back.is_on(Screen::Kitchen));
        assert!(ControlId::Back.is_on(Screen::Home));

        assert!(ControlId::LightUp(Room::Kitchen).is_on(Screen::Kitchen));
        assert!(!ControlId::LightUp(Room::Kitchen).is_on(Screen::Hallway));

        assert!(ControlId::HeatingPower(Room::Bedroom).is_on(Screen::Bedroom));
        assert!(!ControlId::HeatingPower(Room::Kitchen).is_on(Screen::Kitchen));
    }
}
