use crate::llm_client::LlmClient;

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; handlers must check this
    /// before building a prompt or touching the network.
    pub llm: Option<LlmClient>,
}
