use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Response {
    pub action_id: uuid::Uuid,
    pub result: ActionResult,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Success,
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::uuid;

    #[test]
    fn test_failure_deserialization() {
        let json = json!({
            "action_id": "e0f2c0a6-3a3b-4c8c-9c7d-4f8e0a7d8d4f",
            "result": "failure",
        });

        let response: Response = serde_json::from_value(json).unwrap();
        assert_eq!(
            response.action_id,
            uuid!("E0F2C0A6-3A3B-4C8C-9C7D-4F8E0A7D8D4F")
        );
        assert_eq!(response.result, ActionResult::Failure);
    }
}
