//! Uniform structured responses for remote callers.
//!
//! Every tool answers with a JSON object carrying at least `success` and
//! `message`; operation data is merged in at the top level:
//!
//! ```json
//! {"success": true, "message": "Created instruction a1b2c3d4", "instruction": {...}}
//! {"success": false, "message": "Instruction ffffffff not found", "error_kind": "not_found"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WorkflowError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ToolResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Map::new(),
        }
    }

    /// A response whose success flag comes from the operation itself,
    /// e.g. an execution step that ran but failed.
    pub fn outcome(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Converts a workflow error into a failed response.
    pub fn failure(error: &WorkflowError) -> Self {
        let mut data = Map::new();
        data.insert("error_kind".to_string(), Value::from(error.kind()));
        Self {
            success: false,
            message: error.to_string(),
            data,
        }
    }

    /// Adds a serialized field to the response.
    pub fn with<T: Serialize>(mut self, key: &str, value: &T) -> Result<Self> {
        self.data.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Merges the fields of a serialized struct into the response.
    ///
    /// Values that do not serialize to an object land under `data`.
    pub fn with_fields<T: Serialize>(mut self, value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => self.data.extend(fields),
            other => {
                self.data.insert("data".to_string(), other);
            }
        }
        Ok(self)
    }

    /// Collapses an operation result, turning errors into failed responses.
    pub fn from_result(result: Result<Self>) -> Self {
        result.unwrap_or_else(|e| Self::failure(&e))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_is_flattened() {
        let response = ToolResponse::ok("Listed 0 instructions")
            .with("instructions", &Vec::<String>::new())
            .unwrap();
        let json: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json["success"], Value::Bool(true));
        assert_eq!(json["instructions"], Value::Array(vec![]));
    }

    #[test]
    fn test_fields_are_merged() {
        #[derive(Serialize)]
        struct Branches {
            current_branch: Option<String>,
            branches: Vec<String>,
        }

        let response = ToolResponse::ok("Listed branches")
            .with_fields(&Branches {
                current_branch: Some("main".to_string()),
                branches: vec!["main".to_string()],
            })
            .unwrap();
        assert_eq!(response.data["current_branch"], Value::from("main"));
        assert_eq!(response.data["branches"][0], Value::from("main"));

        let response = ToolResponse::ok("n").with_fields(&3).unwrap();
        assert_eq!(response.data["data"], Value::from(3));
    }

    #[test]
    fn test_errors_become_failed_responses() {
        let response =
            ToolResponse::from_result(Err(WorkflowError::instruction_not_found("ffffffff")));
        assert!(!response.success);
        assert_eq!(response.message, "Instruction ffffffff not found");
        assert_eq!(response.data["error_kind"], Value::from("not_found"));
    }
}
