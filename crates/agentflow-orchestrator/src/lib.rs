//! Ties memory, tools, and provider adapters together into the tool-calling
//! loop: the only crate in the workspace that depends on all three.

pub mod batch;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod streaming;
pub mod summarizer;

pub use batch::{BatchOrchestrator, BatchOutcome};
pub use dispatch::{dispatch_all, outcomes_to_messages, ToolOutcome};
pub use error::{OrchestratorError, Result};
pub use history::{build_messages, build_plain_text};
pub use streaming::StreamingOrchestrator;
pub use summarizer::ProviderSummarizer;
