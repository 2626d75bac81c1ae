use std::fmt;
use std::str::FromStr;

use serde::de::{value, Error};

const PREFIX: &str = "panel";

/// MQTT topics shared by the panel and the automation hub.
///
/// Response topics carry the id of the panel that sent the request, so that
/// several panels can share one broker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Topic {
    State,
    StateRequest,
    StateResponse(String),
    ActionRequest,
    ActionResponse(String),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Topic::State => write!(f, "{PREFIX}/state"),
            Topic::StateRequest => write!(f, "{PREFIX}/state/request"),
            Topic::StateResponse(client_id) => write!(f, "{PREFIX}/state/response/{client_id}"),
            Topic::ActionRequest => write!(f, "{PREFIX}/action/request"),
            Topic::ActionResponse(client_id) => {
                write!(f, "{PREFIX}/action/response/{client_id}")
            }
        }
    }
}

impl FromStr for Topic {
    type Err = value::Error;

    fn from_str(s: &str) -> std::result::Result<Topic, Self::Err> {
        const ERROR_MSG: &str = "supported topics are panel/state, panel/state/request, \
            panel/action/request, panel/state/response/<id> and panel/action/response/<id>";

        let path = s
            .strip_prefix(PREFIX)
            .and_then(|s| s.strip_prefix('/'))
            .ok_or_else(|| value::Error::custom(ERROR_MSG))?;

        match path {
            "state" => Ok(Topic::State),
            "state/request" => Ok(Topic::StateRequest),
            "action/request" => Ok(Topic::ActionRequest),
            _ => match path.rsplit_once('/') {
                Some(("state/response", id)) if !id.is_empty() => {
                    Ok(Topic::StateResponse(id.to_string()))
                }
                Some(("action/response", id)) if !id.is_empty() => {
                    Ok(Topic::ActionResponse(id.to_string()))
                }
                _ => Err(value::Error::custom(ERROR_MSG)),
            },
        }
    }
}
