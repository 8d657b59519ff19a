use std::sync::Arc;

use agent_kit::{
    AgentConfig, AgentOrchestrator, AgentResult, LanguageModelClient, Tool, ToolDescription,
};
use anyhow::Result;

use crate::pages::PageBackend;
use crate::tools::{CreatePageTool, FileUploadTool, ProcessFileTool, WeatherTool};
use crate::weather::WeatherProvider;

/// Assistant runtime: the agent loop wired to the product tool set.
pub struct AssistantRuntime {
    orchestrator: AgentOrchestrator,
}

impl AssistantRuntime {
    pub fn builder(model: Arc<dyn LanguageModelClient>) -> AssistantRuntimeBuilder {
        AssistantRuntimeBuilder::new(model)
    }

    pub async fn run(&mut self, task: &str) -> Result<AgentResult> {
        self.orchestrator.run_task(task).await
    }

    pub fn tool_descriptions(&self) -> Vec<ToolDescription> {
        self.orchestrator.tool_descriptions()
    }
}

pub struct AssistantRuntimeBuilder {
    model: Arc<dyn LanguageModelClient>,
    config: AgentConfig,
    weather: Option<Arc<dyn WeatherProvider>>,
    pages: Option<Arc<dyn PageBackend>>,
    extra_tools: Vec<Arc<dyn Tool>>,
}

impl AssistantRuntimeBuilder {
    fn new(model: Arc<dyn LanguageModelClient>) -> Self {
        Self {
            model,
            config: AgentConfig::default(),
            weather: None,
            pages: None,
            extra_tools: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_weather_provider(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    pub fn with_page_backend(mut self, backend: Arc<dyn PageBackend>) -> Self {
        self.pages = Some(backend);
        self
    }

    pub fn register_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.extra_tools.push(tool);
        self
    }

    pub fn build(self) -> AssistantRuntime {
        let mut orchestrator = AgentOrchestrator::new(self.model, self.config);
        if let Some(weather) = self.weather {
            orchestrator.register_tool(Arc::new(WeatherTool::new(weather)));
        }
        orchestrator.register_tool(Arc::new(FileUploadTool::new()));
        if let Some(pages) = self.pages {
            orchestrator.register_tool(Arc::new(CreatePageTool::new(pages.clone())));
            orchestrator.register_tool(Arc::new(ProcessFileTool::new(pages)));
        }
        for tool in self.extra_tools {
            orchestrator.register_tool(tool);
        }
        AssistantRuntime { orchestrator }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::LocalPages;
    use agent_kit::{AgentEvent, LanguageModelResponse, ModelOptions};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use tokio::sync::Mutex as TokioMutex;
    use workflow_bridge::WeatherReport;

    struct ScriptedModel {
        responses: TokioMutex<VecDeque<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<String>) -> Arc<Self> {
            Arc::new(Self {
                responses: TokioMutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl LanguageModelClient for ScriptedModel {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &ModelOptions,
        ) -> anyhow::Result<LanguageModelResponse> {
            let mut guard = self.responses.lock().await;
            let next = guard
                .pop_front()
                .expect("scripted model ran out of responses");
            Ok(LanguageModelResponse::new(next))
        }
    }

    struct FixedWeather;

    #[async_trait]
    impl WeatherProvider for FixedWeather {
        async fn current_weather(&self, location: &str) -> anyhow::Result<WeatherReport> {
            Ok(WeatherReport {
                temperature: 18.0,
                feels_like: 16.5,
                humidity: 70.0,
                wind_speed: 12.0,
                wind_gust: 20.0,
                conditions: "Overcast".to_string(),
                location: location.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn answers_weather_questions_through_the_tool() {
        let model = ScriptedModel::new(vec![
            json!({
                "type": "tool",
                "name": "weather.current",
                "args": { "location": "Boston" }
            })
            .to_string(),
            json!({
                "type": "finish",
                "answer": "It is 18 degrees and overcast in Boston."
            })
            .to_string(),
        ]);

        let mut runtime = AssistantRuntime::builder(model)
            .with_weather_provider(Arc::new(FixedWeather))
            .build();

        let result = runtime
            .run("What's the weather like in Boston?")
            .await
            .expect("assistant runtime should succeed");

        assert_eq!(
            result.final_answer,
            Some("It is 18 degrees and overcast in Boston.".to_string())
        );
        let observation = result
            .events
            .iter()
            .find_map(|event| match event {
                AgentEvent::ToolResult { name, result } if name == "weather.current" => {
                    Some(result.clone())
                }
                _ => None,
            })
            .expect("weather tool observation expected");
        assert_eq!(observation["temperature"], 18.0);
        assert_eq!(observation["location"], "Boston");
    }

    #[tokio::test]
    async fn registers_the_full_tool_set_in_order() {
        let model = ScriptedModel::new(vec![]);
        let runtime = AssistantRuntime::builder(model)
            .with_weather_provider(Arc::new(FixedWeather))
            .with_page_backend(Arc::new(LocalPages::new()))
            .build();

        let names: Vec<String> = runtime
            .tool_descriptions()
            .into_iter()
            .map(|description| description.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "weather.current",
                "files.upload",
                "pages.create",
                "files.process"
            ]
        );
    }

    #[tokio::test]
    async fn page_flow_creates_then_processes() {
        let pages = Arc::new(LocalPages::new());
        let model = ScriptedModel::new(vec![
            json!({
                "type": "tool",
                "name": "pages.create",
                "args": { "pageType": "file-processor", "title": "Reports" }
            })
            .to_string(),
            json!({
                "type": "tool",
                "name": "files.process",
                "args": {
                    "fileContent": "QSBzaG9ydCBmaWxl",
                    "fileName": "notes.txt",
                    "fileType": "text/plain",
                    "prompt": "make a tldr",
                    "pageId": "page_1_abcdefghi"
                }
            })
            .to_string(),
            json!({
                "type": "finish",
                "answer": "Created the page and summarized the file."
            })
            .to_string(),
        ]);

        let mut runtime = AssistantRuntime::builder(model)
            .with_weather_provider(Arc::new(FixedWeather))
            .with_page_backend(pages)
            .build();

        let result = runtime
            .run("Make a page and summarize my file")
            .await
            .expect("assistant runtime should succeed");

        assert!(!result.halted);
        let processing = result
            .events
            .iter()
            .find_map(|event| match event {
                AgentEvent::ToolResult { name, result } if name == "files.process" => {
                    Some(result.clone())
                }
                _ => None,
            })
            .expect("processing observation expected");
        assert_eq!(processing["result"], "TLDR Generated");
    }

    #[tokio::test]
    async fn invalid_tool_arguments_abort_the_run() {
        let model = ScriptedModel::new(vec![json!({
            "type": "tool",
            "name": "weather.current",
            "args": { "location": "" }
        })
        .to_string()]);

        let mut runtime = AssistantRuntime::builder(model)
            .with_weather_provider(Arc::new(FixedWeather))
            .build();

        let err = runtime.run("Weather please").await;
        assert!(err.is_err(), "blank location should fail the tool call");
        let err_text = format!("{}", err.unwrap_err());
        assert!(
            err_text.contains("weather.current"),
            "error message should name the tool: {err_text}"
        );
    }
}
