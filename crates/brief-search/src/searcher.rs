//! Search orchestration: dispatch, execute, summarize
//!
//! One search runs two model turns. The dispatch turn offers the web tools
//! and lets the model pick queries for the keyword; the searcher then runs
//! every requested call and collects the transcripts. The summarize turn
//! gets the transcripts and produces the final digest. The outcome is always
//! a single JSON object on stdout, whatever happened.

use crate::error::Result;
use crate::registry::ToolRegistry;
use crate::tools::{WebFetchTool, WebSearchTool};
use crate::web::{WebClient, WebConfig};
use brief_llm::{ChatProvider, ChatRequest, Message, OllamaConfig, OllamaProvider};
use brief_util::truncate_chars;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Model used when `SEARCH_MODEL` is not set
pub const DEFAULT_SEARCH_MODEL: &str = "gemini-3-flash-preview:cloud";

/// Character budget for one tool transcript handed to the summarize turn
const TOOL_RESULT_BUDGET: usize = 8_000;

/// System prompt of the dispatch turn
const DISPATCH_PROMPT: &str = "**调用工具搜索关键词**";

/// System prompt of the summarize turn
const SUMMARIZE_PROMPT: &str = "指令：请你根据我提供的搜索结果，生成简短、客观的摘要。\n\
    条件判断：如果搜寻的关键词属于事件，还需按时间顺序考察事件的起因、经过和后续发展.\n\
    限制：仅总结内容，自身不需要对搜索结果进行分析或评价";

/// Outcome of one search, rendered as a single JSON object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// The model searched and the transcripts were summarized
    Success {
        keyword: String,
        summary: String,
        status: String,
    },
    /// The model answered the dispatch turn without calling any tool
    NoToolCall { keyword: String, status: String },
    /// The search failed; the error message rides along with the keyword
    Failed { keyword: String, error: String },
}

impl SearchOutcome {
    /// Create a success outcome
    pub fn success(keyword: impl Into<String>, summary: impl Into<String>) -> Self {
        SearchOutcome::Success {
            keyword: keyword.into(),
            summary: summary.into(),
            status: "success".to_string(),
        }
    }

    /// Create a no-tool-call outcome
    pub fn no_tool_call(keyword: impl Into<String>) -> Self {
        SearchOutcome::NoToolCall {
            keyword: keyword.into(),
            status: "no_tool_call".to_string(),
        }
    }

    /// Create a failure outcome
    pub fn failed(keyword: impl Into<String>, error: impl Into<String>) -> Self {
        SearchOutcome::Failed {
            keyword: keyword.into(),
            error: error.into(),
        }
    }

    /// Render as one compact JSON object, non-ASCII text kept as-is
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"failed to encode search outcome"}"#.to_string())
    }
}

/// Configuration for the searcher
#[derive(Debug, Clone)]
pub struct SearcherConfig {
    /// Model the dispatch and summarize turns run on
    pub model: String,

    /// Chat provider configuration
    pub ollama: OllamaConfig,

    /// Web API configuration
    pub web: WebConfig,
}

impl SearcherConfig {
    /// Create a new config over the given web API settings
    pub fn new(web: WebConfig) -> Self {
        Self {
            model: DEFAULT_SEARCH_MODEL.to_string(),
            ollama: OllamaConfig::new(),
            web,
        }
    }

    /// Create config from environment variables
    ///
    /// Requires `OLLAMA_API_KEY` for the web API. Optionally reads the model
    /// from `SEARCH_MODEL` and the chat host from `OLLAMA_HOST`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model: std::env::var("SEARCH_MODEL")
                .unwrap_or_else(|_| DEFAULT_SEARCH_MODEL.to_string()),
            ollama: OllamaConfig::from_env(),
            web: WebConfig::from_env()?,
        })
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Tool-orchestrated web searcher
pub struct Searcher {
    provider: Arc<dyn ChatProvider>,
    registry: ToolRegistry,
    model: String,
}

impl Searcher {
    /// Create a searcher over an existing provider and registry
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        registry: ToolRegistry,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            registry,
            model: model.into(),
        }
    }

    /// Create a searcher with its own provider and the two web tools
    pub fn with_config(config: SearcherConfig) -> Result<Self> {
        let provider = Arc::new(OllamaProvider::with_config(config.ollama)?);
        let web = Arc::new(WebClient::with_config(config.web)?);

        let registry = ToolRegistry::new();
        registry.register(Arc::new(WebSearchTool::new(web.clone())));
        registry.register(Arc::new(WebFetchTool::new(web)));

        Ok(Self::new(provider, registry, config.model))
    }

    /// Create a searcher from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(SearcherConfig::from_env()?)
    }

    /// Run one search; never fails, errors become a failure outcome
    pub async fn search(&self, keyword: &str) -> SearchOutcome {
        info!(keyword, "Running search");
        match self.run(keyword).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(keyword, error = %e, "Search failed");
                SearchOutcome::failed(keyword, e.to_string())
            }
        }
    }

    async fn run(&self, keyword: &str) -> Result<SearchOutcome> {
        let dispatch = ChatRequest::builder(&self.model)
            .add_message(Message::system(DISPATCH_PROMPT))
            .add_message(Message::user(format!("keyword:{keyword}")))
            .tools(self.registry.definitions())
            .build();
        let response = self.provider.chat(dispatch).await?;

        if !response.message.has_tool_calls() {
            return Ok(SearchOutcome::no_tool_call(keyword));
        }

        let mut transcripts = Vec::new();
        for call in &response.message.tool_calls {
            let name = &call.function.name;
            let content = match self.registry.get(name) {
                Some(tool) => {
                    let output = tool.execute(call.function.arguments.clone()).await?;
                    truncate_chars(&output.to_string(), TOOL_RESULT_BUDGET)
                }
                None => {
                    warn!(tool = %name, "Model requested an unknown tool");
                    format!("未找到工具 {name}")
                }
            };
            transcripts.push(content);
        }

        let summarize = ChatRequest::builder(&self.model)
            .add_message(Message::system(SUMMARIZE_PROMPT))
            .add_message(Message::user(format!(
                "关键词:{keyword} 搜索结果：\n{}",
                transcripts.join("\n\n")
            )))
            .build();
        let final_response = self.provider.chat(summarize).await?;

        Ok(SearchOutcome::success(
            keyword,
            final_response.message.content,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::Tool;
    use async_trait::async_trait;
    use brief_llm::{ChatResponse, FunctionCall, LlmError, Role, ToolCall};
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedProvider {
        responses: Mutex<VecDeque<ChatResponse>>,
        captured: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<ChatResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                captured: Mutex::new(Vec::new()),
            }
        }

        fn captured(&self) -> Vec<ChatRequest> {
            self.captured.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn chat(&self, request: ChatRequest) -> brief_llm::Result<ChatResponse> {
            self.captured.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::RequestFailed("script exhausted".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        async fn chat(&self, _request: ChatRequest) -> brief_llm::Result<ChatResponse> {
            Err(LlmError::RequestFailed("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value) -> crate::Result<Value> {
            Ok(params)
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    struct LongTool;

    #[async_trait]
    impl Tool for LongTool {
        async fn execute(&self, _params: Value) -> crate::Result<Value> {
            Ok(Value::String("结".repeat(20_000)))
        }

        fn name(&self) -> &str {
            "long"
        }

        fn description(&self) -> &str {
            "Answer with a very long text"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    fn tool_call_response(name: &str, arguments: Value) -> ChatResponse {
        ChatResponse {
            model: "test-model".to_string(),
            message: Message {
                role: Role::Assistant,
                content: String::new(),
                tool_calls: vec![ToolCall {
                    function: FunctionCall {
                        name: name.to_string(),
                        arguments,
                    },
                }],
                tool_name: None,
            },
            done: true,
            done_reason: None,
        }
    }

    fn text_response(content: &str) -> ChatResponse {
        ChatResponse {
            model: "test-model".to_string(),
            message: Message::assistant(content),
            done: true,
            done_reason: Some("stop".to_string()),
        }
    }

    fn echo_registry() -> ToolRegistry {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry
    }

    #[tokio::test]
    async fn test_no_tool_call_outcome() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_response("直接回答")]));
        let searcher = Searcher::new(provider, echo_registry(), "test-model");

        let outcome = searcher.search("平安银行").await;
        assert_eq!(outcome, SearchOutcome::no_tool_call("平安银行"));
        assert_eq!(
            outcome.to_json(),
            r#"{"keyword":"平安银行","status":"no_tool_call"}"#
        );
    }

    #[tokio::test]
    async fn test_success_flow_feeds_transcripts_to_summarize_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_response("echo", json!({"query": "平安银行"})),
            text_response("摘要正文"),
        ]));
        let searcher = Searcher::new(provider.clone(), echo_registry(), "test-model");

        let outcome = searcher.search("平安银行").await;
        assert_eq!(outcome, SearchOutcome::success("平安银行", "摘要正文"));

        let captured = provider.captured();
        assert_eq!(captured.len(), 2);

        // The dispatch turn offers the registry's tools.
        assert_eq!(captured[0].messages[0].content, "**调用工具搜索关键词**");
        assert_eq!(captured[0].messages[1].content, "keyword:平安银行");
        assert_eq!(captured[0].tools.as_ref().map(Vec::len), Some(1));

        // The summarize turn gets the transcript and no tools.
        assert!(captured[1].tools.is_none());
        assert_eq!(
            captured[1].messages[1].content,
            "关键词:平安银行 搜索结果：\n{\"query\":\"平安银行\"}"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_transcript_line() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_response("nonexistent", json!({})),
            text_response("摘要"),
        ]));
        let searcher = Searcher::new(provider.clone(), echo_registry(), "test-model");

        let outcome = searcher.search("测试").await;
        assert_eq!(outcome, SearchOutcome::success("测试", "摘要"));

        let captured = provider.captured();
        assert_eq!(
            captured[1].messages[1].content,
            "关键词:测试 搜索结果：\n未找到工具 nonexistent"
        );
    }

    #[tokio::test]
    async fn test_long_tool_output_is_truncated() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(LongTool));
        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_response("long", json!({})),
            text_response("摘要"),
        ]));
        let searcher = Searcher::new(provider.clone(), registry, "test-model");

        searcher.search("测试").await;

        let captured = provider.captured();
        let content = &captured[1].messages[1].content;
        let transcript = content.strip_prefix("关键词:测试 搜索结果：\n").unwrap();
        assert_eq!(transcript.chars().count(), 8_000);
    }

    #[tokio::test]
    async fn test_provider_error_becomes_failure_outcome() {
        let searcher = Searcher::new(Arc::new(FailingProvider), echo_registry(), "test-model");

        let outcome = searcher.search("平安银行").await;
        match outcome {
            SearchOutcome::Failed { keyword, error } => {
                assert_eq!(keyword, "平安银行");
                assert!(error.contains("connection refused"));
            }
            other => panic!("Expected failure outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_json_shapes() {
        assert_eq!(
            SearchOutcome::success("词", "要点").to_json(),
            r#"{"keyword":"词","summary":"要点","status":"success"}"#
        );
        assert_eq!(
            SearchOutcome::failed("词", "boom").to_json(),
            r#"{"keyword":"词","error":"boom"}"#
        );
    }

    #[test]
    fn test_searcher_config_from_env() {
        unsafe {
            std::env::set_var("OLLAMA_API_KEY", "searcher-key");
            std::env::set_var("SEARCH_MODEL", "qwen3");
        }
        let config = SearcherConfig::from_env().unwrap();
        assert_eq!(config.model, "qwen3");
        assert_eq!(config.web.api_key, "searcher-key");

        unsafe {
            std::env::remove_var("SEARCH_MODEL");
        }
        let config = SearcherConfig::from_env().unwrap();
        assert_eq!(config.model, DEFAULT_SEARCH_MODEL);

        unsafe {
            std::env::remove_var("OLLAMA_API_KEY");
        }
        assert!(SearcherConfig::from_env().is_err());
    }
}
