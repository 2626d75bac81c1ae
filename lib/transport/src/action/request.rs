use serde::{Deserialize, Serialize};

use crate::{HeatingTarget, Target};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Request {
    pub action_id: uuid::Uuid,
    pub action: Action,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SetLight { target: Target, level: u8 },
    SetHeating { target: Target, heating: HeatingTarget },
}
