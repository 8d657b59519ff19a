//! Assistant entry point: wires the configured tool backend and model client
//! into the agent runtime and runs one task from the command line.

use std::sync::Arc;

use agent_kit::{AgentEvent, OpenAiClient};
use anyhow::{anyhow, Result};
use assistant_core::AssistantRuntime;
use tool_router::{RoutingPolicy, ToolRouter};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let task = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if task.trim().is_empty() {
        return Err(anyhow!("usage: assistant <task>"));
    }

    let router = ToolRouter::from_env()?;
    let policy = RoutingPolicy::default();
    info!(backend = ?router.backend(&policy), "starting assistant");

    let model = Arc::new(OpenAiClient::from_env()?);
    let mut runtime = AssistantRuntime::builder(model)
        .with_weather_provider(router.weather_provider(&policy)?)
        .with_page_backend(router.page_backend(&policy)?)
        .build();

    let result = runtime.run(&task).await?;

    for event in &result.events {
        match event {
            AgentEvent::ToolCall { name, args } => {
                info!(tool = %name, args = %serde_json::to_string(args).unwrap_or_default(), "tool call");
            }
            AgentEvent::ToolResult { name, .. } => {
                info!(tool = %name, "tool result received");
            }
            AgentEvent::ModelResponse { .. } => {}
        }
    }

    match result.final_answer {
        Some(answer) => println!("{answer}"),
        None => println!("(the assistant stopped without reaching a final answer)"),
    }

    Ok(())
}
