pub mod action {
    mod request;
    mod response;

    pub use request::Action;
    pub use request::Request as ActionRequest;
    pub use response::ActionResult;
    pub use response::Response as ActionResponse;
}

pub mod state {
    mod request;
    mod response;
    mod update;

    pub use request::Request as StateRequest;
    pub use response::Response as StateResponse;
    pub use update::Update as StateUpdate;
}

mod device;
pub use device::{HeatingTarget, MasterToggles, RoomState, Target};

mod room;
pub use room::{Room, RoomConfig};

mod topic;
pub use topic::Topic;

mod mqtt;
pub use mqtt::connect_mqtt;
