use std::fmt;

use transport::Room;

use crate::ControlId;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Validation(ValidationError),
    MissingPressState(ControlId),
    UnknownScreen(String),
    Backend(BackendError),
    InvalidConfig(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    LightLevel(i32),
    HeatingTarget { value: f32, min: f32, max: f32 },
    NotHeated(Room),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    Unavailable(String),
    Timeout,
    Rejected,
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation error: {err}"),
            Self::MissingPressState(control) => {
                write!(f, "release on {control} without a matching press")
            }
            Self::UnknownScreen(name) => write!(f, "unknown screen `{name}`"),
            Self::Backend(err) => write!(f, "backend error: {err}"),
            Self::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LightLevel(level) => write!(f, "light level {level} is outside 0..=100"),
            Self::HeatingTarget { value, min, max } => {
                write!(f, "heating target {value}°C is outside {min}..={max}")
            }
            Self::NotHeated(room) => write!(f, "room {room} has no heating"),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "backend unavailable: {reason}"),
            Self::Timeout => write!(f, "backend timed out"),
            Self::Rejected => write!(f, "backend rejected the request"),
        }
    }
}

impl std::error::Error for Error {}

impl std::error::Error for ValidationError {}

impl std::error::Error for BackendError {}
