//! Shared provider-neutral types for the agentflow workspace: the message
//! model, tool schema, generation options, streaming event protocol, and
//! per-request tenant context. Every other crate in this workspace depends
//! on this one; it depends on nothing workspace-local.

pub mod context;
pub mod error;
pub mod message;
pub mod options;
pub mod stream_event;
pub mod tool_schema;

pub use context::{RequestContext, DEFAULT_TENANT};
pub use error::ErrorCode;
pub use message::{Message, MessageFilter, Role, ToolCallDescriptor};
pub use options::{GenerationOptions, ResponseFormat, StreamConfig};
pub use stream_event::{StreamEvent, StreamEventKind};
pub use tool_schema::{ParameterSpec, ParameterType, ToolDefinition};
