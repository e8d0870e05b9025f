//! Wire types for the `scripts.run` endpoint: the request body and the returned operation.

use serde::Serialize;
use serde_json::Value;

/// A call to one function of one script project.
///
/// The script id travels in the URL path, so it is skipped when the request
/// is serialized as the JSON body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    #[serde(skip)]
    script_id: String,
    function: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    dev_mode: bool,
}

impl InvocationRequest {
    pub fn new(script_id: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            script_id: script_id.into(),
            function: function.into(),
            parameters: Vec::new(),
            dev_mode: false,
        }
    }

    /// Positional arguments handed to the remote function, in order.
    pub fn with_parameters(mut self, parameters: Vec<Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Run the most recently saved code instead of the deployed version.
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }
}

/// One script execution attempt as reported by the API.
///
/// `error` and `response` stay dynamically typed so that a body breaking the
/// documented shape still reaches the classifier, which reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub done: Option<bool>,
    pub error: Option<Value>,
    pub response: Option<Value>,
}

impl Operation {
    /// Never fails. A body that is not an object yields an empty operation;
    /// `null` fields count as absent.
    pub fn from_value(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self::default();
        };
        let mut take = |key: &str| fields.remove(key).filter(|v| !v.is_null());
        Self {
            done: take("done").and_then(|v| v.as_bool()),
            error: take("error"),
            response: take("response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_omits_script_id_and_defaults() {
        let req = InvocationRequest::new("abc123", "getFoldersUnderRoot");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({ "function": "getFoldersUnderRoot" }));
    }

    #[test]
    fn request_body_carries_parameters_and_dev_mode() {
        let req = InvocationRequest::new("abc123", "sum")
            .with_parameters(vec![json!(1), json!("two")])
            .with_dev_mode(true);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({ "function": "sum", "parameters": [1, "two"], "devMode": true })
        );
    }

    #[test]
    fn operation_keeps_error_shape_for_the_classifier() {
        let op = Operation::from_value(json!({ "done": true, "error": { "code": 3, "details": null } }));
        assert_eq!(op.done, Some(true));
        assert_eq!(op.error, Some(json!({ "code": 3, "details": null })));
        assert!(op.response.is_none());

        let op = Operation::from_value(json!({ "error": "boom", "done": "yes" }));
        assert_eq!(op.error, Some(json!("boom")));
        assert_eq!(op.done, None);
    }

    #[test]
    fn non_object_body_is_an_empty_operation() {
        assert_eq!(Operation::from_value(json!(["not", "an", "operation"])), Operation::default());
        assert_eq!(Operation::from_value(json!({ "error": null })), Operation::default());
    }
}
