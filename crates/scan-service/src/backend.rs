use async_trait::async_trait;
use scan_types::GroundingSource;
use serde_json::Value;

use crate::error::Result;

/// One structured-output request to the hosted model.
#[derive(Debug, Clone)]
pub struct ModelCall {
    pub model: String,
    pub prompt: String,
    pub schema: Value,
    pub thinking_budget: Option<u32>,
    pub grounding: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: Option<String>,
    pub sources: Vec<GroundingSource>,
}

#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, call: ModelCall) -> Result<ModelReply>;
}
