use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use str_derive::Str;
use transport::Room;

use crate::{Error, Result};

#[derive(Copy, Clone, Debug, Deserialize, Serialize, Str, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    Bedroom,
    LivingRoom,
    Entrance,
    Hallway,
    Kitchen,
}

impl Screen {
    /// The room shown on this screen, `None` for the home overview.
    pub fn room(&self) -> Option<Room> {
        match self {
            Screen::Home => None,
            Screen::Bedroom => Some(Room::Bedroom),
            Screen::LivingRoom => Some(Room::LivingRoom),
            Screen::Entrance => Some(Room::Entrance),
            Screen::Hallway => Some(Room::Hallway),
            Screen::Kitchen => Some(Room::Kitchen),
        }
    }
}

impl From<Room> for Screen {
    fn from(room: Room) -> Self {
        match room {
            Room::Bedroom => Screen::Bedroom,
            Room::LivingRoom => Screen::LivingRoom,
            Room::Entrance => Screen::Entrance,
            Room::Hallway => Screen::Hallway,
            Room::Kitchen => Screen::Kitchen,
        }
    }
}

/// Navigation history. `Home` sits at the bottom and is never popped.
#[derive(Clone, Debug)]
pub struct ScreenStack {
    history: Vec<Screen>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self {
            history: vec![Screen::Home],
        }
    }

    pub fn current(&self) -> Screen {
        *self.history.last().unwrap_or(&Screen::Home)
    }

    pub fn navigate_to(&mut self, screen: Screen) {
        debug!("navigate {} -> {}", self.current(), screen);
        self.history.push(screen);
    }

    pub fn navigate_to_named(&mut self, name: &str) -> Result<Screen> {
        let screen = Screen::from_str(name).map_err(|_| Error::UnknownScreen(name.to_string()))?;
        self.navigate_to(screen);
        Ok(screen)
    }

    pub fn go_back(&mut self) -> Screen {
        if self.history.len() > 1 {
            self.history.pop();
        }

        self.current()
    }

    /// Screens from the bottom of the stack to the visible one.
    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self::new()
    }
}
