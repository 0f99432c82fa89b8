//! Client for locally hosted language-model servers.
//!
//! Configuration is via environment variables:
//! - `PRODTREE_MODEL_ENDPOINT` - Base URL (default: `http://localhost:11434`)
//! - `PRODTREE_MODEL_NAME` - Model to request (default: `llama3.2:3b`)
//! - `PRODTREE_MODEL_TIMEOUT` - Request timeout in seconds (default: 30)
//! - `PRODTREE_AI_ENABLED` - Set to `false` to skip the model entirely
//!
//! Endpoints on port 11434 speak the Ollama generate API; anything else
//! is assumed to be OpenAI-compatible (LM Studio, vLLM, and friends).
//! Every failure is soft: the chat handler falls back to the rule-based
//! analyzer.

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::analysis::count_in_order;
use crate::models::ProductTree;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2:3b";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Local model client errors.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model integration is disabled")]
    Disabled,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server returned {status}: {body}")]
    Server {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed model response")]
    Malformed,
}

/// HTTP client for a local inference server.
#[derive(Debug, Clone)]
pub struct LocalModelClient {
    endpoint: String,
    model: String,
    timeout: Duration,
    enabled: bool,
    client: Client,
}

impl LocalModelClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let endpoint = std::env::var("PRODTREE_MODEL_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let model =
            std::env::var("PRODTREE_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = std::env::var("PRODTREE_MODEL_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let enabled = std::env::var("PRODTREE_AI_ENABLED")
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        Self::new(endpoint, model, Duration::from_secs(timeout), enabled)
    }

    /// Create with explicit configuration.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        enabled: bool,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            timeout,
            enabled,
            client: Client::new(),
        }
    }

    /// A client that never talks to a server. Chat requests go straight
    /// to the rule-based analyzer; used by tests.
    pub fn disabled() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, Duration::from_secs(1), false)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a response to `message`, with tree context
    /// folded into the prompt when a snapshot is available.
    pub async fn generate(
        &self,
        message: &str,
        tree: Option<&ProductTree>,
    ) -> Result<String, ModelError> {
        if !self.enabled {
            return Err(ModelError::Disabled);
        }
        let prompt = build_prompt(message, tree);
        if self.endpoint.ends_with("11434") {
            self.generate_ollama(&prompt).await
        } else {
            self.generate_openai(&prompt).await
        }
    }

    async fn generate_ollama(&self, prompt: &str) -> Result<String, ModelError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.7,
                "top_p": 0.9,
                "num_predict": 1000,
            },
        });
        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        let payload = self.read_json(response).await?;
        payload
            .get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ModelError::Malformed)
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String, ModelError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert product management assistant specializing \
                                in product tree analysis and strategic insights.",
                },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.7,
            "max_tokens": 1000,
        });
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        let payload = self.read_json(response).await?;
        payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ModelError::Malformed)
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ModelError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Model server error: {} - {}", status, body);
            return Err(ModelError::Server { status, body });
        }
        Ok(response.json().await?)
    }

    /// Connection probe backing the test endpoint. Always returns a
    /// status object, never an error.
    pub async fn probe(&self) -> Value {
        if !self.enabled {
            return json!({
                "status": "disabled",
                "message": "AI integration is disabled",
            });
        }
        match self
            .generate("Hello, can you respond with 'AI model is working'?", None)
            .await
        {
            Ok(response) => {
                let preview: String = if response.chars().count() > 100 {
                    response.chars().take(100).collect::<String>() + "..."
                } else {
                    response
                };
                json!({
                    "status": "connected",
                    "model": self.model,
                    "endpoint": self.endpoint,
                    "test_response": preview,
                })
            }
            Err(e) => json!({
                "status": "error",
                "message": e.to_string(),
                "endpoint": self.endpoint,
            }),
        }
    }
}

/// Fold the user question and tree statistics into a single prompt.
fn build_prompt(message: &str, tree: Option<&ProductTree>) -> String {
    let mut prompt = format!(
        "You are an expert product management assistant specializing in product tree \
         analysis and strategic insights. You help teams understand their product \
         hierarchy, identify issues, and suggest improvements.\n\n\
         USER QUESTION: {}\n\n",
        message
    );

    if let Some(tree) = tree.filter(|t| !t.nodes.is_empty()) {
        let _ = write!(
            prompt,
            "PRODUCT TREE CONTEXT:\nYou have access to a product tree with {} nodes. \
             Here's the structure:\n\n",
            tree.nodes.len()
        );

        let describe = |counts: Vec<(String, usize)>| {
            counts
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let types = describe(count_in_order(
            tree.nodes.iter().map(|n| n.node_type.as_str()),
        ));
        let statuses = describe(count_in_order(
            tree.nodes.iter().map(|n| n.status_or_unknown()),
        ));
        let priorities = describe(count_in_order(
            tree.nodes.iter().map(|n| n.priority_or_unset()),
        ));
        let _ = write!(
            prompt,
            "TREE STRUCTURE:\n- Node Types: {}\n- Status Distribution: {}\n\
             - Priority Distribution: {}\n\n",
            types, statuses, priorities
        );

        prompt.push_str("SAMPLE NODES:\n");
        for node in tree.nodes.iter().take(5) {
            let _ = writeln!(
                prompt,
                "- {}: {} (Status: {}, Priority: {})",
                node.node_type,
                if node.title.is_empty() { "Untitled" } else { &node.title },
                node.status_or_unknown(),
                node.priority_or_unset()
            );
        }
        if tree.nodes.len() > 5 {
            let _ = writeln!(prompt, "... and {} more nodes", tree.nodes.len() - 5);
        }

        prompt.push_str(
            "\nANALYSIS GUIDELINES:\n\
             1. Provide specific insights based on the actual data provided\n\
             2. Identify patterns, issues, or opportunities in the product tree\n\
             3. Suggest concrete improvements or next steps\n\
             4. Be data-driven and reference specific nodes when relevant\n\
             5. Keep responses concise but actionable\n\
             6. Use product tree terminology (products, goals, jobs, work items)\n\n\
             CRUD OPERATIONS:\n\
             You can help users manage their product tree by:\n\
             - Creating new nodes (products, goals, jobs, work items)\n\
             - Updating existing nodes (status, priority, team, owner, etc.)\n\
             - Deleting nodes that are no longer needed\n\
             - Viewing detailed information about any node\n\n",
        );
    }

    prompt.push_str(
        "RESPONSE FORMAT:\n\
         - Start with a direct answer to the user's question\n\
         - Provide specific insights based on the data\n\
         - Include actionable recommendations if appropriate\n\
         - Keep the response under 200 words unless more detail is specifically requested\n\n\
         Please provide a helpful, data-driven response:",
    );

    prompt
}
