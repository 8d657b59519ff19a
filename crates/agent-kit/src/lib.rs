//! Core agent primitives shared by the Assistant workspace.
//! The crate exposes a simple agent runtime that plans tool calls through a
//! pluggable language-model client and executes schema-described tools
//! provided by the host application.

pub mod language_model;
pub mod openai;
pub mod orchestrator;
pub mod tool;

pub use language_model::{LanguageModelClient, LanguageModelResponse, ModelOptions};
pub use openai::OpenAiClient;
pub use orchestrator::{
    AgentConfig, AgentEvent, AgentOrchestrator, AgentResult, PlanStep, ToolInvocation,
};
pub use tool::{Tool, ToolDescription, ToolError, ToolResult};

pub const DEFAULT_AGENT_MAX_STEPS: usize = 8;
