//! Run a function in a hosted Apps Script project and classify what came back.

pub mod client;
pub mod config;
pub mod execution;
pub mod outcome;
pub mod printer;

pub use client::{ScriptsClient, TransportError};
pub use execution::{InvocationRequest, Operation};
pub use outcome::{classify, classify_operation, InvocationOutcome, MalformedPayload, StackFrame};
