//! Classifies a finished script run and renders it for display.

use std::{collections::HashMap, fmt};

use serde::Serialize;
use serde_json::Value;

use crate::{
    client::TransportError,
    execution::Operation,
};

/// The API answered with a shape its documented contract does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedPayload {
    #[error("script error carried no details entry")]
    MissingDetails,
    #[error("script error details is a {0}, expected a list")]
    DetailsNotList(&'static str),
    #[error("script error details lack a string errorMessage")]
    MissingErrorMessage,
    #[error("scriptStackTraceElements is a {0}, expected a list")]
    StackTraceNotList(&'static str),
    #[error("successful operation carried no result")]
    MissingResult,
    #[error("result is a {0}, expected a mapping")]
    ResultNotMapping(&'static str),
}

/// One frame of a remote script's stack trace. `line_number` is `None` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub function: String,
    pub line_number: Option<i64>,
}

impl StackFrame {
    fn from_element(element: &Value) -> Self {
        Self {
            function: element
                .get("function")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            line_number: element.get("lineNumber").and_then(Value::as_i64),
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(line) => write!(f, "{}: {}", self.function, line),
            None => write!(f, "{}: unknown", self.function),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The call never produced a script result.
    TransportFailure { message: String },
    /// The script ran and raised.
    ScriptFailure {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_type: Option<String>,
        stack_frames: Vec<StackFrame>,
    },
    /// The script returned a keyed result set. Iteration order is unspecified.
    Success { entries: HashMap<String, Value> },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }
}

/// Decide which of the three outcomes a finished call represents.
///
/// Precedence is strict: a transport error wins over everything, then an
/// operation error, then the response. Only the first `details` entry of an
/// operation error is read.
pub fn classify(
    transport_error: Option<&TransportError>,
    operation_error: Option<&Value>,
    response: Option<&Value>,
) -> Result<InvocationOutcome, MalformedPayload> {
    if let Some(err) = transport_error {
        return Ok(InvocationOutcome::TransportFailure { message: err.to_string() });
    }
    if let Some(error) = operation_error {
        return script_failure(error);
    }
    success(response)
}

/// Classify the result of [`crate::client::ScriptsClient::run`].
pub fn classify_operation(
    result: Result<Operation, TransportError>,
) -> Result<InvocationOutcome, MalformedPayload> {
    match result {
        Err(err) => classify(Some(&err), None, None),
        Ok(op) => classify(None, op.error.as_ref(), op.response.as_ref()),
    }
}

fn script_failure(error: &Value) -> Result<InvocationOutcome, MalformedPayload> {
    let detail = match error.get("details") {
        None | Some(Value::Null) => return Err(MalformedPayload::MissingDetails),
        Some(Value::Array(details)) => details.first().ok_or(MalformedPayload::MissingDetails)?,
        Some(other) => return Err(MalformedPayload::DetailsNotList(kind(other))),
    };
    let message = detail
        .get("errorMessage")
        .and_then(Value::as_str)
        .ok_or(MalformedPayload::MissingErrorMessage)?
        .to_string();
    let error_type = detail
        .get("errorType")
        .and_then(Value::as_str)
        .map(str::to_string);

    // Scripts that fail before starting have no trace.
    let stack_frames = match detail.get("scriptStackTraceElements") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(elements)) => elements.iter().map(StackFrame::from_element).collect(),
        Some(other) => return Err(MalformedPayload::StackTraceNotList(kind(other))),
    };

    Ok(InvocationOutcome::ScriptFailure { message, error_type, stack_frames })
}

fn success(response: Option<&Value>) -> Result<InvocationOutcome, MalformedPayload> {
    match response.and_then(|r| r.get("result")) {
        None => Err(MalformedPayload::MissingResult),
        Some(Value::Object(map)) => Ok(InvocationOutcome::Success {
            entries: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }),
        Some(other) => Err(MalformedPayload::ResultNotMapping(kind(other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Every line is newline-terminated. Success entries follow the map's
/// iteration order, which differs between runs.
impl fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationOutcome::TransportFailure { message } => {
                writeln!(f, "The API returned the error: {}", message)
            }
            InvocationOutcome::ScriptFailure { message, stack_frames, .. } => {
                writeln!(f, "Script error message: {}", message)?;
                for frame in stack_frames {
                    writeln!(f, "\t{}", frame)?;
                }
                Ok(())
            }
            InvocationOutcome::Success { entries } if entries.is_empty() => {
                writeln!(f, "No folders returned!")
            }
            InvocationOutcome::Success { entries } => {
                writeln!(f, "Folders under your root folder:")?;
                for (id, folder) in entries {
                    match folder {
                        Value::String(name) => writeln!(f, "\t{} ({})", name, id)?,
                        other => writeln!(f, "\t{} ({})", other, id)?,
                    }
                }
                Ok(())
            }
        }
    }
}

pub fn format(outcome: &InvocationOutcome) -> String {
    outcome.to_string()
}
